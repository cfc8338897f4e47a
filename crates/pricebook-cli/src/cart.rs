//! Cart command handlers.
//!
//! The cart lives in the configured JSON file; every mutating command loads
//! it, applies one change, and saves it back.

use clap::Subcommand;
use pricebook_core::AppConfig;
use pricebook_pricing::{
    format_brl, parse_quantity_input, resolve_code, Cart, CartStore, PriceOverrides,
};

use crate::source::{find_product, load_sources, SourceArgs};

/// Sub-commands available under `cart`.
#[derive(Debug, Subcommand)]
pub enum CartCommands {
    /// Show cart lines and total
    Show {
        /// Partner code to price the cart with
        #[arg(long)]
        code: Option<String>,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Set a product's quantity (0 or non-numeric removes it)
    Set {
        /// Product id or SKU
        product: String,
        /// New quantity
        #[arg(allow_hyphen_values = true)]
        quantity: String,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Add units (bundles, for bundle-only products)
    Inc {
        /// Product id or SKU
        product: String,
        #[arg(long, default_value = "1")]
        step: u32,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Remove units (bundles, for bundle-only products)
    Dec {
        /// Product id or SKU
        product: String,
        #[arg(long, default_value = "1")]
        step: u32,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Add one of every product matching a SKU list
    AddEach {
        /// Product ids or SKUs
        #[arg(required = true)]
        products: Vec<String>,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Re-read product prices from the sheet
    Refresh {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Remove every line
    Clear,
}

fn load_cart(store: &CartStore) -> anyhow::Result<Cart> {
    Ok(Cart::restore(store.load()?))
}

fn print_cart(cart: &Cart, overrides: &PriceOverrides) {
    if cart.is_empty() {
        println!("cart is empty");
        return;
    }
    for line in cart.resolved_lines(overrides) {
        println!(
            "{:<12} {:<28} {:>5} x {:>14} = {:>14}",
            line.product.id,
            line.product.model,
            line.quantity,
            format_brl(line.unit_price),
            format_brl(line.subtotal),
        );
    }
    println!(
        "{} items, total {}",
        cart.item_count(),
        format_brl(cart.total(overrides))
    );
}

/// Dispatch a `cart` sub-command.
///
/// # Errors
///
/// Returns an error if the cart file cannot be read or written, the sheets
/// cannot be loaded, or a named product does not exist.
pub(crate) async fn run_cart(config: &AppConfig, command: CartCommands) -> anyhow::Result<()> {
    let store = CartStore::new(&config.cart_path);
    let mut cart = load_cart(&store)?;

    match command {
        CartCommands::Show { code, source } => {
            let overrides = match code.as_deref() {
                Some(code) => {
                    let sources = load_sources(config, &source, true).await?;
                    cart.refresh_products(&sources.catalog.products);
                    resolve_code(code, &sources.catalog, &sources.codes)
                }
                None => PriceOverrides::default(),
            };
            print_cart(&cart, &overrides);
            return Ok(());
        }
        CartCommands::Set {
            product,
            quantity,
            source,
        } => {
            let sources = load_sources(config, &source, false).await?;
            let found = find_product(&sources.catalog, &cart, &product)
                .ok_or_else(|| anyhow::anyhow!("product '{product}' not found"))?
                .clone();
            let stored = cart.set_quantity(&found, parse_quantity_input(&quantity));
            println!("{} -> {stored}", found.model);
        }
        CartCommands::Inc {
            product,
            step,
            source,
        } => {
            let sources = load_sources(config, &source, false).await?;
            let found = find_product(&sources.catalog, &cart, &product)
                .ok_or_else(|| anyhow::anyhow!("product '{product}' not found"))?
                .clone();
            let stored = cart.increment(&found, step);
            println!("{} -> {stored}", found.model);
        }
        CartCommands::Dec {
            product,
            step,
            source,
        } => {
            let sources = load_sources(config, &source, false).await?;
            let found = find_product(&sources.catalog, &cart, &product)
                .ok_or_else(|| anyhow::anyhow!("product '{product}' not found"))?
                .clone();
            let stored = cart.decrement(&found, step);
            println!("{} -> {stored}", found.model);
        }
        CartCommands::AddEach { products, source } => {
            let sources = load_sources(config, &source, false).await?;
            let mut found = Vec::with_capacity(products.len());
            for key in &products {
                match find_product(&sources.catalog, &cart, key) {
                    Some(p) => found.push(p.clone()),
                    None => tracing::warn!(product = %key, "skipping unknown product"),
                }
            }
            cart.add_one_of_each(&found);
            println!("added {} products", found.len());
        }
        CartCommands::Refresh { source } => {
            let sources = load_sources(config, &source, false).await?;
            let rebound = cart.refresh_products(&sources.catalog.products);
            println!("refreshed {rebound} of {} lines", cart.len());
        }
        CartCommands::Clear => {
            cart.clear();
            println!("cart cleared");
        }
    }

    store.save(&cart.snapshot())?;
    Ok(())
}
