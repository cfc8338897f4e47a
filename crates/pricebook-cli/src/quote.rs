//! Quote command handlers.

use std::path::PathBuf;

use chrono::Utc;
use clap::Subcommand;
use pricebook_core::AppConfig;
use pricebook_pricing::{
    format_brl, resolve_code, write_quote_spreadsheet, Cart, CartStore, PriceOverrides, Quote,
    QuoteStore,
};

use crate::source::{load_sources, SourceArgs};

/// Sub-commands available under `quote`.
#[derive(Debug, Subcommand)]
pub enum QuoteCommands {
    /// Price the current cart, save it as a numbered quote, and clear the cart
    Create {
        /// Partner code to price the quote with
        #[arg(long)]
        code: Option<String>,
        /// Directory for the spreadsheet export
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Keep the cart after saving the quote
        #[arg(long)]
        keep_cart: bool,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// List saved quotes
    List,
    /// Show one saved quote and its share link
    Show {
        /// Quote number
        number: u32,
    },
}

fn print_quote(quote: &Quote) {
    println!(
        "quote #{} ({}) {}",
        quote.number,
        quote.created_at.format("%Y-%m-%d %H:%M"),
        quote.price_code.as_deref().unwrap_or("")
    );
    print!("{}", quote.share_text());
    println!("share: {}", quote.share_url());
}

/// Dispatch a `quote` sub-command.
///
/// # Errors
///
/// Returns an error if the cart is empty, the stores cannot be read or
/// written, or the spreadsheet export fails.
pub(crate) async fn run_quote(config: &AppConfig, command: QuoteCommands) -> anyhow::Result<()> {
    let quotes = QuoteStore::new(&config.quotes_path);

    match command {
        QuoteCommands::Create {
            code,
            out_dir,
            keep_cart,
            source,
        } => {
            let carts = CartStore::new(&config.cart_path);
            let mut cart = Cart::restore(carts.load()?);
            if cart.is_empty() {
                anyhow::bail!("cart is empty; nothing to quote");
            }

            let sources = load_sources(config, &source, code.is_some()).await?;
            let rebound = cart.refresh_products(&sources.catalog.products);
            if rebound < cart.len() {
                tracing::warn!(
                    rebound,
                    lines = cart.len(),
                    "some cart products are no longer in the catalog; using saved prices"
                );
            }
            let overrides = code.as_deref().map_or_else(PriceOverrides::default, |c| {
                resolve_code(c, &sources.catalog, &sources.codes)
            });

            let quote = quotes.create(cart.resolved_lines(&overrides), Utc::now(), code.as_deref())?;
            let path = write_quote_spreadsheet(&quote, &out_dir)?;

            if !keep_cart {
                cart.clear();
            }
            carts.save(&cart.snapshot())?;

            print_quote(&quote);
            println!("spreadsheet: {}", path.display());
        }
        QuoteCommands::List => {
            let all = quotes.load_all()?;
            if all.is_empty() {
                println!("no quotes saved");
            }
            for quote in &all {
                println!(
                    "#{:<5} {} {:>4} items {:>14}",
                    quote.number,
                    quote.created_at.format("%Y-%m-%d"),
                    quote.item_count(),
                    format_brl(quote.total),
                );
            }
        }
        QuoteCommands::Show { number } => {
            let quote = quotes
                .find(number)?
                .ok_or_else(|| anyhow::anyhow!("quote #{number} not found"))?;
            print_quote(&quote);
        }
    }

    Ok(())
}
