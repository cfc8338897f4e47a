use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(parse_environment("development"), Environment::Development);
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test"), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.spreadsheet_id.is_none());
    assert_eq!(cfg.product_sheet, "CATÁLOGO");
    assert_eq!(cfg.code_sheet, "CODIGOS");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "pricebook/0.1 (quote-builder)");
    assert_eq!(cfg.max_retries, 3);
    assert_eq!(cfg.retry_backoff_base_secs, 2);
    assert_eq!(cfg.cart_path.to_str(), Some("./cart.json"));
    assert_eq!(cfg.quotes_path.to_str(), Some("./quotes.json"));
}

#[test]
fn spreadsheet_id_is_trimmed() {
    let mut map = HashMap::new();
    map.insert("PRICEBOOK_SPREADSHEET_ID", "  1qAuw2eb  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.spreadsheet_id.as_deref(), Some("1qAuw2eb"));
}

#[test]
fn blank_spreadsheet_id_is_treated_as_absent() {
    let mut map = HashMap::new();
    map.insert("PRICEBOOK_SPREADSHEET_ID", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.spreadsheet_id.is_none());
}

#[test]
fn sheet_names_override() {
    let mut map = HashMap::new();
    map.insert("PRICEBOOK_PRODUCT_SHEET", "PRODUTOS");
    map.insert("PRICEBOOK_CODE_SHEET", "PARCEIROS");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.product_sheet, "PRODUTOS");
    assert_eq!(cfg.code_sheet, "PARCEIROS");
}

#[test]
fn request_timeout_override() {
    let mut map = HashMap::new();
    map.insert("PRICEBOOK_REQUEST_TIMEOUT_SECS", "60");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 60);
}

#[test]
fn request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("PRICEBOOK_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRICEBOOK_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(PRICEBOOK_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn max_retries_invalid() {
    let mut map = HashMap::new();
    map.insert("PRICEBOOK_MAX_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRICEBOOK_MAX_RETRIES"),
        "expected InvalidEnvVar(PRICEBOOK_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn retry_backoff_override() {
    let mut map = HashMap::new();
    map.insert("PRICEBOOK_RETRY_BACKOFF_BASE_SECS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.retry_backoff_base_secs, 0);
}

#[test]
fn storage_paths_override() {
    let mut map = HashMap::new();
    map.insert("PRICEBOOK_CART_PATH", "/tmp/cart.json");
    map.insert("PRICEBOOK_QUOTES_PATH", "/tmp/quotes.json");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.cart_path.to_str(), Some("/tmp/cart.json"));
    assert_eq!(cfg.quotes_path.to_str(), Some("/tmp/quotes.json"));
}

#[test]
fn debug_output_redacts_spreadsheet_id() {
    let mut map = HashMap::new();
    map.insert("PRICEBOOK_SPREADSHEET_ID", "secret-sheet-id");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("secret-sheet-id"));
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn require_spreadsheet_id_reports_missing_var() {
    let map = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let err = cfg.require_spreadsheet_id().unwrap_err();
    assert!(matches!(err, ConfigError::MissingEnvVar(ref var) if var == "PRICEBOOK_SPREADSHEET_ID"));

    let mut map = HashMap::new();
    map.insert("PRICEBOOK_SPREADSHEET_ID", "abc");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.require_spreadsheet_id().unwrap(), "abc");
}
