use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric value cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric value cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("PRICEBOOK_ENV", "development"));
    let log_level = or_default("PRICEBOOK_LOG_LEVEL", "info");

    let spreadsheet_id = lookup("PRICEBOOK_SPREADSHEET_ID")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let product_sheet = or_default("PRICEBOOK_PRODUCT_SHEET", "CATÁLOGO");
    let code_sheet = or_default("PRICEBOOK_CODE_SHEET", "CODIGOS");

    let request_timeout_secs = parse_u64("PRICEBOOK_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("PRICEBOOK_USER_AGENT", "pricebook/0.1 (quote-builder)");
    let max_retries = parse_u32("PRICEBOOK_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("PRICEBOOK_RETRY_BACKOFF_BASE_SECS", "2")?;

    let cart_path = PathBuf::from(or_default("PRICEBOOK_CART_PATH", "./cart.json"));
    let quotes_path = PathBuf::from(or_default("PRICEBOOK_QUOTES_PATH", "./quotes.json"));

    Ok(AppConfig {
        env,
        log_level,
        spreadsheet_id,
        product_sheet,
        code_sheet,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        cart_path,
        quotes_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
