//! Partner-code resolution.
//!
//! A code maps to a reference string on the code sheet. The reference is
//! classified once and turned into per-product override prices. Any failure
//! along the way yields empty overrides, so pricing falls back to the base or
//! promotional price.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::LazyLock;

use pricebook_core::{Catalog, PriceCodeBook, Product};
use pricebook_sheet::{
    find_column, find_exact, find_price_column_containing, normalize_currency, price_like_columns,
};
use regex::Regex;
use rust_decimal::Decimal;

use crate::effective::effective_price;

static PERCENTAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+([.,]\d+)?%$").expect("valid percentage regex"));

/// How a code-sheet reference selects prices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeReference {
    /// `"10%"`, `"-2,5%"`. `literal` is the reference as written, used to
    /// look for a column that already holds the discounted price.
    Percentage { percent: Decimal, literal: String },
    /// Position among price-like columns; negative counts from the end.
    Index(i64),
    /// A header name, matched loosely.
    HeaderName(String),
}

impl CodeReference {
    #[must_use]
    pub fn classify(reference: &str) -> Self {
        let reference = reference.trim();

        if PERCENTAGE.is_match(reference) {
            let number = reference.trim_end_matches('%').replace(',', ".");
            if let Ok(percent) = Decimal::from_str(&number) {
                return Self::Percentage {
                    percent,
                    literal: reference.to_string(),
                };
            }
        }

        if let Ok(index) = reference.parse::<i64>() {
            return Self::Index(index);
        }

        Self::HeaderName(reference.to_string())
    }
}

/// Override prices keyed by product id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceOverrides {
    prices: HashMap<String, Decimal>,
}

impl PriceOverrides {
    pub fn insert(&mut self, product_id: &str, price: Decimal) {
        self.prices.insert(product_id.to_string(), price);
    }

    #[must_use]
    pub fn get(&self, product_id: &str) -> Option<Decimal> {
        self.prices.get(product_id).copied()
    }

    /// The price a customer pays for `product` under these overrides.
    #[must_use]
    pub fn unit_price(&self, product: &Product) -> Decimal {
        effective_price(product, self.get(&product.id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Resolves an entered code against the code book and the catalog.
///
/// Unknown codes, unresolvable references and empty catalogs all produce
/// empty overrides.
#[must_use]
pub fn resolve_code(code: &str, catalog: &Catalog, book: &PriceCodeBook) -> PriceOverrides {
    let Some(reference) = book.lookup(code) else {
        if !code.trim().is_empty() {
            tracing::debug!(code, "unknown price code");
        }
        return PriceOverrides::default();
    };

    let reference = CodeReference::classify(reference);
    let overrides = match &reference {
        CodeReference::Percentage { percent, literal } => {
            percentage_overrides(catalog, *percent, literal)
        }
        CodeReference::Index(index) => index_overrides(catalog, *index),
        CodeReference::HeaderName(name) => header_overrides(catalog, name),
    };

    if overrides.is_empty() {
        tracing::warn!(code, ?reference, "price code matched no column; using catalog prices");
    } else {
        tracing::info!(code, ?reference, overrides = overrides.len(), "price code resolved");
    }
    overrides
}

/// Reads one column per product; unparseable or negative cells fall back to
/// the product's base price.
fn column_overrides(catalog: &Catalog, column: usize) -> PriceOverrides {
    let Some(header) = catalog.headers.get(column) else {
        return PriceOverrides::default();
    };

    let mut overrides = PriceOverrides::default();
    for product in &catalog.products {
        overrides.insert(&product.id, cell_price_or_base(product, header));
    }
    overrides
}

fn cell_price_or_base(product: &Product, header: &str) -> Decimal {
    normalize_currency(product.raw_cell(header))
        .filter(|p| !p.is_sign_negative())
        .unwrap_or(product.base_price)
}

fn percentage_overrides(catalog: &Catalog, percent: Decimal, literal: &str) -> PriceOverrides {
    if let Some(column) = find_price_column_containing(&catalog.headers, literal) {
        return column_overrides(catalog, column);
    }

    let Some(&column) = price_like_columns(&catalog.headers).first() else {
        return PriceOverrides::default();
    };
    let header = &catalog.headers[column];
    let Some(factor) = Decimal::ONE.checked_sub(percent / Decimal::ONE_HUNDRED) else {
        return PriceOverrides::default();
    };

    let mut overrides = PriceOverrides::default();
    for product in &catalog.products {
        let Some(discounted) = cell_price_or_base(product, header).checked_mul(factor) else {
            tracing::debug!(
                product_id = %product.id,
                %percent,
                "percentage discount overflowed; skipping"
            );
            continue;
        };
        overrides.insert(&product.id, discounted.max(Decimal::ZERO));
    }
    overrides
}

fn index_overrides(catalog: &Catalog, index: i64) -> PriceOverrides {
    let columns = price_like_columns(&catalog.headers);
    let position = if index >= 0 {
        usize::try_from(index).ok()
    } else {
        usize::try_from(index.unsigned_abs())
            .ok()
            .and_then(|back| columns.len().checked_sub(back))
    };

    match position.and_then(|p| columns.get(p)) {
        Some(&column) => column_overrides(catalog, column),
        None => {
            tracing::debug!(index, price_columns = columns.len(), "price column index out of range");
            PriceOverrides::default()
        }
    }
}

fn header_overrides(catalog: &Catalog, name: &str) -> PriceOverrides {
    let headers = &catalog.headers;
    let column = find_exact(headers, name)
        .or_else(|| find_price_column_containing(headers, name))
        .or_else(|| find_column(headers, &[name]));

    column.map_or_else(PriceOverrides::default, |c| column_overrides(catalog, c))
}

#[cfg(test)]
#[path = "code_test.rs"]
mod tests;
