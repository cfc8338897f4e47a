//! Catalog listing and price-code preview.

use pricebook_core::AppConfig;
use pricebook_pricing::catalog::display_quality;
use pricebook_pricing::{
    available_brands, available_qualities, brand_of, format_brl, resolve_code, CatalogFilter,
    PriceOverrides,
};

use crate::source::{load_sources, SourceArgs};

/// Print the visible catalog, filtered, with the price each product would be
/// quoted at.
///
/// # Errors
///
/// Returns an error if the product sheet cannot be loaded.
pub(crate) async fn run_products(
    config: &AppConfig,
    source: &SourceArgs,
    filter: &CatalogFilter,
    code: Option<&str>,
) -> anyhow::Result<()> {
    let sources = load_sources(config, source, code.is_some()).await?;
    let overrides = code.map_or_else(PriceOverrides::default, |c| {
        resolve_code(c, &sources.catalog, &sources.codes)
    });

    let visible: Vec<_> = sources.catalog.visible_products().collect();
    println!("brands: {}", available_brands(visible.iter().copied()).join(", "));
    println!("qualities: {}", available_qualities(visible.iter().copied()).join(", "));
    println!();

    let listed = filter.apply(&sources.catalog);
    for product in &listed {
        let price = overrides.unit_price(product);
        let marker = if product.has_promotion() { " *promo*" } else { "" };
        println!(
            "{:<12} {:<14} {:<28} {:<10} {:<8} {:>14}{marker}",
            product.id,
            product.sku,
            product.model,
            brand_of(&product.model).unwrap_or_default(),
            display_quality(&product.quality_grade),
            format_brl(price),
        );
    }
    println!();
    println!(
        "{} of {} products listed",
        listed.len(),
        sources.catalog.len()
    );
    Ok(())
}

/// Resolve a partner code and print every product whose price it changes.
///
/// # Errors
///
/// Returns an error if the product sheet cannot be loaded.
pub(crate) async fn run_price_code(
    config: &AppConfig,
    source: &SourceArgs,
    code: &str,
) -> anyhow::Result<()> {
    let sources = load_sources(config, source, true).await?;
    let overrides = resolve_code(code, &sources.catalog, &sources.codes);

    if overrides.is_empty() {
        println!("code '{code}' applies no price changes");
        return Ok(());
    }

    let baseline = PriceOverrides::default();
    let mut changed = 0usize;
    for product in sources.catalog.visible_products() {
        let before = baseline.unit_price(product);
        let after = overrides.unit_price(product);
        if before != after {
            changed += 1;
            println!(
                "{:<14} {:<28} {:>14} -> {:>14}",
                product.sku,
                product.model,
                format_brl(before),
                format_brl(after),
            );
        }
    }
    println!("code '{code}' changes {changed} prices");
    Ok(())
}
