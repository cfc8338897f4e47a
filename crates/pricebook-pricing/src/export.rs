//! Spreadsheet export of a saved quote.

use std::path::{Path, PathBuf};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::quote::Quote;
use crate::store::StoreError;

const SHEET_NAME: &str = "Sheet1";
const COLUMN_HEADERS: [&str; 7] = [
    "SKU",
    "Produto",
    "Cor",
    "Qualidade",
    "Valor Unitário",
    "Quantidade",
    "Subtotal",
];
const COLUMNS: [&str; 7] = ["A", "B", "C", "D", "E", "F", "G"];

fn money(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Writes `quote` as `dir/{spreadsheet_filename}` and returns the path.
///
/// Layout: number and date, a blank row, the column header, one row per
/// line, a blank row, then the total under the subtotal column.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if `dir` cannot be created and
/// [`StoreError::Export`] if the workbook cannot be built or written.
pub fn write_quote_spreadsheet(quote: &Quote, dir: &Path) -> Result<PathBuf, StoreError> {
    std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(&quote.spreadsheet_filename);

    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_by_name_mut(SHEET_NAME)
        .ok_or_else(|| StoreError::Export {
            path: path.clone(),
            reason: format!("new workbook has no {SHEET_NAME}"),
        })?;

    sheet.get_cell_mut("A1").set_value("Orçamento #");
    sheet.get_cell_mut("B1").set_value(quote.number.to_string());
    sheet.get_cell_mut("A2").set_value("Data");
    sheet
        .get_cell_mut("B2")
        .set_value(quote.created_at.format("%d/%m/%Y").to_string());

    for (column, header) in COLUMNS.iter().zip(COLUMN_HEADERS) {
        sheet.get_cell_mut(format!("{column}4").as_str()).set_value(header);
    }

    let mut row = 5;
    for line in &quote.lines {
        let p = &line.product;
        sheet.get_cell_mut(format!("A{row}").as_str()).set_value(p.sku.as_str());
        sheet.get_cell_mut(format!("B{row}").as_str()).set_value(p.model.as_str());
        sheet.get_cell_mut(format!("C{row}").as_str()).set_value(p.color.as_str());
        sheet
            .get_cell_mut(format!("D{row}").as_str())
            .set_value(p.quality_grade.as_str());
        sheet
            .get_cell_mut(format!("E{row}").as_str())
            .set_value_number(money(line.unit_price));
        sheet
            .get_cell_mut(format!("F{row}").as_str())
            .set_value_number(line.quantity);
        sheet
            .get_cell_mut(format!("G{row}").as_str())
            .set_value_number(money(line.subtotal));
        row += 1;
    }

    let total_row = row + 1;
    sheet.get_cell_mut(format!("A{total_row}").as_str()).set_value("Total:");
    sheet
        .get_cell_mut(format!("G{total_row}").as_str())
        .set_value_number(money(quote.total));

    umya_spreadsheet::writer::xlsx::write(&book, &path).map_err(|e| StoreError::Export {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    tracing::info!(path = %path.display(), number = quote.number, "quote spreadsheet written");
    Ok(path)
}
