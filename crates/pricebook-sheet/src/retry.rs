//! Retry with exponential backoff for sheet downloads.
//!
//! Transient failures (429, 5xx, network errors) are retried; everything else
//! is returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::SheetError;

/// Returns `true` if `err` is worth another attempt.
///
/// Retriable:
/// - [`SheetError::RateLimited`]: HTTP 429.
/// - [`SheetError::Http`]: connection reset, timeout, TLS failure.
/// - [`SheetError::UnexpectedStatus`] with a 5xx status.
///
/// A 404, a 4xx, or a malformed URL will fail the same way on every attempt.
fn is_retriable(err: &SheetError) -> bool {
    match err {
        SheetError::RateLimited { .. } | SheetError::Http(_) => true,
        SheetError::UnexpectedStatus { status, .. } => *status >= 500,
        SheetError::NotFound { .. } | SheetError::InvalidUrl { .. } => false,
    }
}

/// Executes `operation`, retrying transient errors up to `max_retries` extra
/// times. The n-th retry waits `backoff_base_secs * 2^(n-1)` seconds.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, SheetError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SheetError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient sheet fetch error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
