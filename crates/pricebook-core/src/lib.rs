pub mod app_config;
pub mod config;
pub mod products;
pub mod text;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{
    ActiveStatus, Catalog, PriceCodeBook, PriceCodeEntry, Product, MISSING_FIELD,
};
pub use text::{contains_folded, fold_text};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
