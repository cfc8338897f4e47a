//! Partner-code sheet ingestion.

use pricebook_core::{PriceCodeBook, PriceCodeEntry};

use crate::header::{find_column, CODE_KEYWORDS, REFERENCE_KEYWORDS};
use crate::row::{non_blank_lines, parse_row};

/// Parses code-sheet text into a [`PriceCodeBook`].
///
/// The code and reference columns are located by keyword; a sheet whose
/// headers match neither is read as a plain two-column map (code first).
/// Rows with a blank code or reference are skipped, and a repeated code keeps
/// its last reference.
#[must_use]
pub fn ingest_price_codes(text: &str) -> PriceCodeBook {
    let lines = non_blank_lines(text);
    let Some((header_line, data_lines)) = lines.split_first() else {
        tracing::warn!("price code sheet is empty");
        return PriceCodeBook::default();
    };

    let headers = parse_row(header_line);
    let code_idx = find_column(&headers, CODE_KEYWORDS).unwrap_or(0);
    let reference_idx = find_column(&headers, REFERENCE_KEYWORDS)
        .filter(|&i| i != code_idx)
        .unwrap_or(usize::from(code_idx == 0));

    let book: PriceCodeBook = data_lines
        .iter()
        .map(|line| parse_row(line))
        .filter_map(|cells| {
            let code = cells.get(code_idx)?;
            let reference = cells.get(reference_idx)?;
            Some(PriceCodeEntry::new(code, reference))
        })
        .collect();

    tracing::info!(
        rows = data_lines.len(),
        codes = book.len(),
        code_column = code_idx,
        reference_column = reference_idx,
        "ingested price code sheet"
    );

    book
}
