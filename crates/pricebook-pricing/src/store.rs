//! JSON-file persistence for the cart and saved quotes.
//!
//! A missing file reads as empty. Writes go to a sibling temp file first and
//! are renamed into place.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::cart::{CartSnapshot, ResolvedLine};
use crate::quote::{next_quote_number, Quote};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write spreadsheet {}: {reason}", path.display())]
    Export { path: PathBuf, reason: String },
}

fn read_json<T>(path: &Path) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "store file absent; starting empty");
            return Ok(T::default());
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    if text.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(&text).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)
}

/// The working cart, saved after every mutation.
#[derive(Debug, Clone)]
pub struct CartStore {
    path: PathBuf,
}

impl CartStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<CartSnapshot, StoreError> {
        read_json(&self.path)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be written.
    pub fn save(&self, snapshot: &CartSnapshot) -> Result<(), StoreError> {
        write_json(&self.path, snapshot)?;
        tracing::debug!(path = %self.path.display(), lines = snapshot.lines.len(), "cart saved");
        Ok(())
    }
}

/// Every quote issued so far, oldest first.
#[derive(Debug, Clone)]
pub struct QuoteStore {
    path: PathBuf,
}

impl QuoteStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or parsed.
    pub fn load_all(&self) -> Result<Vec<Quote>, StoreError> {
        read_json(&self.path)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be read or parsed.
    pub fn find(&self, number: u32) -> Result<Option<Quote>, StoreError> {
        Ok(self.load_all()?.into_iter().find(|q| q.number == number))
    }

    /// Numbers, builds and saves a quote from priced lines.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the existing quotes cannot be loaded or the
    /// updated list cannot be written.
    pub fn create(
        &self,
        lines: Vec<ResolvedLine>,
        created_at: DateTime<Utc>,
        price_code: Option<&str>,
    ) -> Result<Quote, StoreError> {
        let mut quotes = self.load_all()?;
        let number = next_quote_number(&quotes);
        let quote = Quote::build(number, lines, created_at).with_price_code(price_code);
        quotes.push(quote.clone());
        write_json(&self.path, &quotes)?;

        tracing::info!(
            number,
            lines = quote.lines.len(),
            total = %quote.total,
            "quote saved"
        );
        Ok(quote)
    }
}
