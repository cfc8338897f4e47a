use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by sheet host (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("sheet not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid sheet URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}
