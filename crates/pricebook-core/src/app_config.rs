use std::path::PathBuf;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Published spreadsheet holding both the catalog and the code sheet.
    pub spreadsheet_id: Option<String>,
    pub product_sheet: String,
    pub code_sheet: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub cart_path: PathBuf,
    pub quotes_path: PathBuf,
}

impl AppConfig {
    /// The configured spreadsheet id, for commands that must fetch sheets.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `PRICEBOOK_SPREADSHEET_ID`
    /// is unset or blank.
    pub fn require_spreadsheet_id(&self) -> Result<&str, ConfigError> {
        self.spreadsheet_id
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("PRICEBOOK_SPREADSHEET_ID".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The spreadsheet id grants read access to the price list.
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field(
                "spreadsheet_id",
                &self.spreadsheet_id.as_ref().map(|_| "[redacted]"),
            )
            .field("product_sheet", &self.product_sheet)
            .field("code_sheet", &self.code_sheet)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("cart_path", &self.cart_path)
            .field("quotes_path", &self.quotes_path)
            .finish()
    }
}
