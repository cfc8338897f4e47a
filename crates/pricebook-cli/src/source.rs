//! Loading the product and code sheets for a command.
//!
//! Each sheet comes from a local CSV export when a path is given, otherwise
//! from the configured spreadsheet. Both sheets are loaded concurrently.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use pricebook_core::{AppConfig, Catalog, PriceCodeBook, Product};
use pricebook_pricing::Cart;
use pricebook_sheet::{ingest_price_codes, ingest_products, SheetClient};

/// Where to read the sheets from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct SourceArgs {
    /// Read the product sheet from a local CSV export instead of fetching it
    #[arg(long, value_name = "PATH")]
    pub products_file: Option<PathBuf>,
    /// Read the code sheet from a local CSV export instead of fetching it
    #[arg(long, value_name = "PATH")]
    pub codes_file: Option<PathBuf>,
}

pub(crate) struct Sources {
    pub catalog: Catalog,
    pub codes: PriceCodeBook,
}

async fn read_or_fetch(
    client: Option<&SheetClient>,
    config: &AppConfig,
    sheet_name: &str,
    file: Option<&Path>,
) -> anyhow::Result<String> {
    if let Some(path) = file {
        return tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()));
    }

    let spreadsheet_id = config.require_spreadsheet_id()?;
    let client = client.context("sheet client was not built")?;
    let text = client
        .fetch_sheet(spreadsheet_id, sheet_name)
        .await
        .with_context(|| format!("failed to fetch sheet {sheet_name}"))?;
    Ok(text)
}

/// Loads the catalog and, when `with_codes` is set, the code book.
///
/// A code sheet that fails to load is logged and replaced by an empty book,
/// so prices fall back to the catalog instead of failing the command.
///
/// # Errors
///
/// Returns an error if the product sheet cannot be read or fetched, or if a
/// fetch is needed and no spreadsheet id is configured.
pub(crate) async fn load_sources(
    config: &AppConfig,
    args: &SourceArgs,
    with_codes: bool,
) -> anyhow::Result<Sources> {
    let needs_fetch =
        args.products_file.is_none() || (with_codes && args.codes_file.is_none());
    let client = if needs_fetch {
        Some(
            SheetClient::new(
                config.request_timeout_secs,
                &config.user_agent,
                config.max_retries,
                config.retry_backoff_base_secs,
            )
            .context("failed to build sheet client")?,
        )
    } else {
        None
    };

    let products = read_or_fetch(
        client.as_ref(),
        config,
        &config.product_sheet,
        args.products_file.as_deref(),
    );
    let codes = async {
        if with_codes {
            Some(
                read_or_fetch(
                    client.as_ref(),
                    config,
                    &config.code_sheet,
                    args.codes_file.as_deref(),
                )
                .await,
            )
        } else {
            None
        }
    };
    let (products, codes) = tokio::join!(products, codes);

    let catalog = ingest_products(&products?);
    let codes = match codes {
        Some(Ok(text)) => ingest_price_codes(&text),
        Some(Err(e)) => {
            tracing::warn!(error = %format!("{e:#}"), "price codes unavailable; using catalog prices");
            PriceCodeBook::default()
        }
        None => PriceCodeBook::default(),
    };

    Ok(Sources { catalog, codes })
}

/// Finds a product by id or SKU (case- and accent-insensitive), looking in
/// the catalog first and then in the cart.
pub(crate) fn find_product<'a>(
    catalog: &'a Catalog,
    cart: &'a Cart,
    key: &str,
) -> Option<&'a Product> {
    let key = key.trim();
    let matches = |p: &Product| {
        p.id == key || pricebook_core::fold_text(&p.sku) == pricebook_core::fold_text(key)
    };
    catalog
        .products
        .iter()
        .find(|p| matches(p))
        .or_else(|| cart.lines().iter().map(|l| &l.product).find(|p| matches(p)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_product_by_id_or_sku() {
        let catalog = ingest_products("SKU,MODELO,VALOR\nIP11-IN,IP 11,10\nSMA10,SM A10,20");
        let cart = Cart::new();
        assert_eq!(
            find_product(&catalog, &cart, "product-2").map(|p| p.sku.as_str()),
            Some("SMA10")
        );
        assert_eq!(
            find_product(&catalog, &cart, " ip11-in ").map(|p| p.id.as_str()),
            Some("product-1")
        );
        assert!(find_product(&catalog, &cart, "nope").is_none());
    }

    #[test]
    fn find_product_falls_back_to_cart_lines() {
        let old = ingest_products("SKU,MODELO,VALOR\nOLD-1,LG K10,10");
        let mut cart = Cart::new();
        cart.set_quantity(&old.products[0], 2);

        let current = ingest_products("SKU,MODELO,VALOR");
        assert_eq!(
            find_product(&current, &cart, "OLD-1").map(|p| p.model.as_str()),
            Some("LG K10")
        );
    }
}
