mod cart;
mod products;
mod quote;
mod source;

use clap::{Parser, Subcommand};
use pricebook_pricing::CatalogFilter;
use tracing_subscriber::EnvFilter;

use crate::cart::CartCommands;
use crate::quote::QuoteCommands;
use crate::source::SourceArgs;

#[derive(Debug, Parser)]
#[command(name = "pricebook")]
#[command(about = "Catalog pricing and quote builder")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List visible products with their quoted prices
    Products {
        /// Only these brands (repeatable)
        #[arg(long = "brand")]
        brands: Vec<String>,
        /// Only these quality grades (repeatable)
        #[arg(long = "quality")]
        qualities: Vec<String>,
        /// Only products on promotion
        #[arg(long)]
        promotion_only: bool,
        /// Match model text
        #[arg(long)]
        search: Option<String>,
        /// Partner code to price with
        #[arg(long)]
        code: Option<String>,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Show which prices a partner code changes
    Code {
        code: String,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Cart operations
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
    /// Quote operations
    Quote {
        #[command(subcommand)]
        command: QuoteCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = pricebook_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?config, "configuration loaded");

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Products {
            brands,
            qualities,
            promotion_only,
            search,
            code,
            source,
        }) => {
            let filter = CatalogFilter {
                brands,
                qualities,
                promotion_only,
                search,
            };
            products::run_products(&config, &source, &filter, code.as_deref()).await?;
        }
        Some(Commands::Code { code, source }) => {
            products::run_price_code(&config, &source, &code).await?;
        }
        Some(Commands::Cart { command }) => cart::run_cart(&config, command).await?,
        Some(Commands::Quote { command }) => quote::run_quote(&config, command).await?,
        None => println!("pricebook: run with --help to list commands"),
    }

    Ok(())
}
