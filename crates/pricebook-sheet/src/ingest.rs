//! Product-sheet ingestion: raw export text to a typed [`Catalog`].
//!
//! Rows missing a SKU or model are dropped. Prices go through an ordered list
//! of [`PriceStrategy`] values; the first one that yields a non-negative
//! amount wins, and a row where every strategy fails is priced at zero.

use std::collections::HashMap;
use std::sync::LazyLock;

use pricebook_core::{Catalog, Product, MISSING_FIELD};
use regex::Regex;
use rust_decimal::Decimal;

use crate::currency::normalize_currency;
use crate::header::ColumnMap;
use crate::row::{non_blank_lines, parse_row};

/// A cell that starts with the currency marker followed by a digit.
static CURRENCY_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"R\$\s*\d").expect("valid currency cell regex"));

/// A currency amount anywhere in a raw line.
static CURRENCY_IN_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"R\$\s*[0-9][0-9.,]*").expect("valid currency line regex"));

/// Everything a price strategy may look at for one data row.
struct RowContext<'a> {
    raw_line: &'a str,
    cells: &'a [String],
    columns: &'a ColumnMap,
}

impl RowContext<'_> {
    fn cell(&self, idx: Option<usize>) -> &str {
        idx.and_then(|i| self.cells.get(i))
            .map_or("", String::as_str)
    }
}

/// One way of finding a row's unit price.
struct PriceStrategy {
    name: &'static str,
    attempt: fn(&RowContext<'_>) -> Option<Decimal>,
}

/// Tried in order; see the module docs.
const PRICE_STRATEGIES: &[PriceStrategy] = &[
    PriceStrategy {
        name: "price_column",
        attempt: price_from_column,
    },
    PriceStrategy {
        name: "currency_cell",
        attempt: price_from_currency_cell,
    },
    PriceStrategy {
        name: "raw_line",
        attempt: price_from_raw_line,
    },
];

fn accept(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| !v.is_sign_negative())
}

fn price_from_column(ctx: &RowContext<'_>) -> Option<Decimal> {
    let raw = ctx.cell(ctx.columns.price);
    if raw.is_empty() {
        return None;
    }
    accept(normalize_currency(Some(raw)))
}

fn price_from_currency_cell(ctx: &RowContext<'_>) -> Option<Decimal> {
    ctx.cells
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != ctx.columns.price)
        .filter(|(_, cell)| CURRENCY_CELL.is_match(cell))
        .find_map(|(_, cell)| accept(normalize_currency(Some(cell))))
}

/// Last resort for rows where a comma inside an unquoted price split the
/// amount across two cells.
fn price_from_raw_line(ctx: &RowContext<'_>) -> Option<Decimal> {
    let matched = CURRENCY_IN_LINE.find(ctx.raw_line)?;
    accept(normalize_currency(Some(matched.as_str())))
}

fn resolve_price(ctx: &RowContext<'_>, row: usize) -> Decimal {
    for strategy in PRICE_STRATEGIES {
        if let Some(price) = (strategy.attempt)(ctx) {
            if strategy.name != "price_column" {
                tracing::debug!(row, strategy = strategy.name, %price, "price resolved by fallback");
            }
            return price;
        }
    }
    tracing::debug!(row, "no parseable price; using zero");
    Decimal::ZERO
}

fn text_or_placeholder(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        MISSING_FIELD.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parses product-sheet text into a [`Catalog`].
///
/// The first non-blank line is the header. Product ids are `product-{n}`
/// where `n` is the line's position among non-blank lines, so identical text
/// always produces identical ids.
#[must_use]
pub fn ingest_products(text: &str) -> Catalog {
    let lines = non_blank_lines(text);
    let Some((header_line, data_lines)) = lines.split_first() else {
        tracing::warn!("product sheet is empty");
        return Catalog::default();
    };

    let headers = parse_row(header_line);
    let columns = ColumnMap::resolve(&headers);
    tracing::debug!(?columns, header_count = headers.len(), "resolved product sheet columns");

    if data_lines.is_empty() {
        tracing::warn!("product sheet has a header but no data rows");
    }

    let mut products = Vec::with_capacity(data_lines.len());
    for (offset, raw_line) in data_lines.iter().enumerate() {
        let row = offset + 1;
        let cells = parse_row(raw_line);
        if let Some(product) = build_product(row, raw_line, &cells, &headers, &columns) {
            products.push(product);
        }
    }

    tracing::info!(
        rows = data_lines.len(),
        products = products.len(),
        skipped = data_lines.len() - products.len(),
        "ingested product sheet"
    );

    Catalog { headers, products }
}

fn build_product(
    row: usize,
    raw_line: &str,
    cells: &[String],
    headers: &[String],
    columns: &ColumnMap,
) -> Option<Product> {
    let ctx = RowContext {
        raw_line,
        cells,
        columns,
    };

    let sku = ctx.cell(columns.sku).trim();
    let model = ctx.cell(columns.model).trim();
    if sku.is_empty() || model.is_empty() {
        tracing::debug!(row, sku, model, "skipping row without sku or model");
        return None;
    }

    let base_price = resolve_price(&ctx, row);

    let promotional_price = Some(ctx.cell(columns.promotion))
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| normalize_currency(Some(raw)))
        .filter(|p| *p > Decimal::ZERO);

    let image = Some(ctx.cell(columns.image).trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let active_status = columns.status.map(|_| ctx.cell(columns.status).to_string());

    let raw_columns: HashMap<String, String> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| (header.clone(), cells.get(i).cloned().unwrap_or_default()))
        .collect();

    Some(Product {
        id: format!("product-{row}"),
        sku: sku.to_string(),
        model: model.to_string(),
        color: text_or_placeholder(ctx.cell(columns.color)),
        quality_grade: text_or_placeholder(ctx.cell(columns.quality)),
        base_price,
        promotional_price,
        image,
        active_status,
        raw_columns,
    })
}

#[cfg(test)]
#[path = "ingest_test.rs"]
mod tests;
