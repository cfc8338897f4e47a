//! HTTP client for published spreadsheet exports.
//!
//! Sheets are fetched as CSV through the `gviz/tq` export endpoint, which
//! accepts the sheet (tab) name as a query parameter.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use pricebook_core::{Catalog, PriceCodeBook};
use reqwest::Client;

use crate::codes::ingest_price_codes;
use crate::error::SheetError;
use crate::ingest::ingest_products;
use crate::retry::retry_with_backoff;

pub const DEFAULT_BASE_URL: &str = "https://docs.google.com";

/// Characters escaped in the spreadsheet-id path segment. Ids are normally
/// `[A-Za-z0-9_-]`, which pass through unchanged.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Downloads sheets as CSV text.
///
/// 429, 404 and other non-2xx responses become typed errors. Transient
/// failures (429, 5xx, network errors) are retried with exponential backoff
/// up to `max_retries` additional attempts.
pub struct SheetClient {
    client: Client,
    base_url: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl SheetClient {
    /// Creates a `SheetClient` pointed at [`DEFAULT_BASE_URL`].
    ///
    /// `max_retries` is the number of extra attempts after the first failure;
    /// `0` disables retries. The wait before the n-th retry is
    /// `backoff_base_secs * 2^(n-1)` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, SheetError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Points the client at a different host, e.g. a local mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    /// Builds the CSV export URL for one sheet of a spreadsheet.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::InvalidUrl`] if the id is blank or the base URL
    /// does not parse.
    pub fn sheet_url(&self, spreadsheet_id: &str, sheet_name: &str) -> Result<String, SheetError> {
        let id = spreadsheet_id.trim();
        if id.is_empty() {
            return Err(SheetError::InvalidUrl {
                url: self.base_url.clone(),
                reason: "spreadsheet id is empty".to_owned(),
            });
        }

        let encoded_id = utf8_percent_encode(id, PATH_SEGMENT);
        let base = format!("{}/spreadsheets/d/{encoded_id}/gviz/tq", self.base_url);
        let mut url = reqwest::Url::parse(&base).map_err(|e| SheetError::InvalidUrl {
            url: base.clone(),
            reason: e.to_string(),
        })?;
        url.query_pairs_mut()
            .append_pair("tqx", "out:csv")
            .append_pair("sheet", sheet_name);

        Ok(url.into())
    }

    /// Fetches one sheet as raw CSV text, retrying transient errors.
    ///
    /// # Errors
    ///
    /// - [`SheetError::RateLimited`]: HTTP 429 after all retries exhausted.
    /// - [`SheetError::NotFound`]: HTTP 404 (not retried).
    /// - [`SheetError::UnexpectedStatus`]: any other non-2xx status (5xx retried, 4xx not).
    /// - [`SheetError::Http`]: network or TLS failure after all retries exhausted.
    /// - [`SheetError::InvalidUrl`]: see [`SheetClient::sheet_url`].
    pub async fn fetch_sheet(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
    ) -> Result<String, SheetError> {
        let url = self.sheet_url(spreadsheet_id, sheet_name)?;
        tracing::debug!(sheet = sheet_name, "fetching sheet");

        let text = retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .header(reqwest::header::ACCEPT, "text/csv,text/plain;q=0.9,*/*;q=0.8")
                    .header(reqwest::header::CACHE_CONTROL, "no-cache")
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(SheetError::RateLimited { retry_after_secs });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(SheetError::NotFound { url });
                }

                if !status.is_success() {
                    return Err(SheetError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                Ok(response.text().await?)
            }
        })
        .await?;

        tracing::info!(sheet = sheet_name, bytes = text.len(), "fetched sheet");
        Ok(text)
    }

    /// Fetches and ingests the product sheet.
    ///
    /// # Errors
    ///
    /// Same as [`SheetClient::fetch_sheet`].
    pub async fn fetch_catalog(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
    ) -> Result<Catalog, SheetError> {
        let text = self.fetch_sheet(spreadsheet_id, sheet_name).await?;
        Ok(ingest_products(&text))
    }

    /// Fetches and ingests the partner-code sheet.
    ///
    /// # Errors
    ///
    /// Same as [`SheetClient::fetch_sheet`].
    pub async fn fetch_price_codes(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
    ) -> Result<PriceCodeBook, SheetError> {
        let text = self.fetch_sheet(spreadsheet_id, sheet_name).await?;
        Ok(ingest_price_codes(&text))
    }
}
