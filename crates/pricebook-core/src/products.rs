use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::text::fold_text;

/// Placeholder stored for an empty color or quality cell.
pub const MISSING_FIELD: &str = "-";

/// One catalog entry ingested from the product sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Positional identifier, e.g. `"product-3"` for the third data row.
    pub id: String,
    pub sku: String,
    pub model: String,
    /// `"-"` when the sheet has no color for this row.
    pub color: String,
    /// `"-"` when the sheet has no quality grade for this row.
    pub quality_grade: String,
    /// Unit price from the sheet. Zero when the price was empty or could not
    /// be parsed, which is indistinguishable from a free item.
    pub base_price: Decimal,
    /// Promotional unit price; only ever `Some` with a strictly positive value.
    pub promotional_price: Option<Decimal>,
    pub image: Option<String>,
    /// Raw status cell; `None` when the sheet has no status column.
    pub active_status: Option<String>,
    /// Every cell of the source row keyed by its header text.
    pub raw_columns: HashMap<String, String>,
}

impl Product {
    /// Returns `true` when a strictly positive promotional price is set.
    #[must_use]
    pub fn has_promotion(&self) -> bool {
        self.promotional_price.is_some_and(|p| p > Decimal::ZERO)
    }

    /// Raw cell text for `header`, if the source row had that column.
    #[must_use]
    pub fn raw_cell(&self, header: &str) -> Option<&str> {
        self.raw_columns.get(header).map(String::as_str)
    }

    #[must_use]
    pub fn status(&self) -> ActiveStatus {
        ActiveStatus::classify(self.active_status.as_deref())
    }

    /// Whether the product should be listed in the catalog.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.status().is_visible()
    }
}

/// Normalized reading of the free-text status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveStatus {
    Active,
    LastUnits,
    Inactive,
    /// Absent, blank, or a value with no known meaning.
    Unspecified,
}

const LAST_UNITS_MARKERS: &[&str] = &["ultimas unidades", "ultima unidade", "last units"];
/// Status text that hides a product. Unknown text stays visible; hiding
/// explicitly inactive or sold-out rows extends the active/last-units rule.
const INACTIVE_MARKERS: &[&str] = &[
    "inativo",
    "inactive",
    "esgotado",
    "out of stock",
    "oculto",
    "hidden",
];
const ACTIVE_MARKERS: &[&str] = &["ativo", "active", "disponivel", "available"];

impl ActiveStatus {
    /// Classifies a raw status cell.
    ///
    /// Negative markers are checked before `"ativo"` because `"inativo"`
    /// contains it.
    #[must_use]
    pub fn classify(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Unspecified;
        };
        let folded = fold_text(raw);
        if folded.is_empty() {
            return Self::Unspecified;
        }

        let has = |markers: &[&str]| markers.iter().any(|m| folded.contains(m));
        if has(LAST_UNITS_MARKERS) {
            Self::LastUnits
        } else if has(INACTIVE_MARKERS) {
            Self::Inactive
        } else if has(ACTIVE_MARKERS) {
            Self::Active
        } else {
            Self::Unspecified
        }
    }

    /// Everything except an explicit inactive marker stays visible, so rows
    /// from sheets without a status column keep showing up.
    #[must_use]
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Inactive)
    }
}

/// Result of one product-sheet ingestion pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Header row in sheet order.
    pub headers: Vec<String>,
    pub products: Vec<Product>,
}

impl Catalog {
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn visible_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.is_visible())
    }
}

/// One row of the partner-code sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceCodeEntry {
    /// Folded code: diacritics stripped, lowercased, trimmed.
    pub code: String,
    /// Percentage (`"5%"`), price-column index (`"-1"`), or header fragment.
    pub reference: String,
}

impl PriceCodeEntry {
    #[must_use]
    pub fn new(code: &str, reference: &str) -> Self {
        Self {
            code: fold_text(code),
            reference: reference.trim().to_string(),
        }
    }
}

/// Code → reference mapping loaded from the code sheet.
///
/// The default value is empty, which resolves every code to "no override";
/// that is the state before the code sheet has loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceCodeBook {
    entries: HashMap<String, String>,
}

impl PriceCodeBook {
    /// Adds an entry. A later entry for the same folded code replaces an
    /// earlier one; entries with a blank code or reference are ignored.
    pub fn insert(&mut self, entry: PriceCodeEntry) {
        if entry.code.is_empty() || entry.reference.is_empty() {
            return;
        }
        self.entries.insert(entry.code, entry.reference);
    }

    /// Looks up the reference for a user-entered code, folding it first.
    #[must_use]
    pub fn lookup(&self, code: &str) -> Option<&str> {
        let folded = fold_text(code);
        if folded.is_empty() {
            return None;
        }
        self.entries.get(&folded).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<PriceCodeEntry> for PriceCodeBook {
    fn from_iter<I: IntoIterator<Item = PriceCodeEntry>>(iter: I) -> Self {
        let mut book = Self::default();
        for entry in iter {
            book.insert(entry);
        }
        book
    }
}
