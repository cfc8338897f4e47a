//! Mapping header text to column positions.
//!
//! Matching folds both the header and the keyword (accents stripped,
//! lowercased, trimmed) and accepts a header that *contains* the keyword.
//! The keyword lists below are the whole heuristic; extend them here rather
//! than at call sites.

use pricebook_core::fold_text;

pub const SKU_KEYWORDS: &[&str] = &["sku"];
pub const MODEL_KEYWORDS: &[&str] = &["modelo", "model"];
pub const COLOR_KEYWORDS: &[&str] = &["cor", "color"];
pub const QUALITY_KEYWORDS: &[&str] = &["qualidade", "quality"];
/// Words that make a column "price-like".
pub const PRICE_KEYWORDS: &[&str] = &["valor", "preco", "price", "value"];
/// Words that name the base-price column. Narrower than [`PRICE_KEYWORDS`]
/// so a "preço parceiro" column is not read as the base price.
pub const BASE_PRICE_KEYWORDS: &[&str] = &["valor", "value"];
pub const IMAGE_KEYWORDS: &[&str] = &["imagem", "image", "foto"];
pub const PROMOTION_KEYWORDS: &[&str] = &["promocao", "promotion", "parceiro", "partner"];
pub const STATUS_KEYWORDS: &[&str] = &["status", "situacao", "ativo"];

/// Code-sheet column holding the partner code.
pub const CODE_KEYWORDS: &[&str] = &["codigo", "code", "cupom", "coupon"];
/// Code-sheet column holding the price reference.
pub const REFERENCE_KEYWORDS: &[&str] = &[
    "referencia",
    "reference",
    "coluna",
    "column",
    "tabela",
    "desconto",
    "discount",
];

/// Returns the index of the first header (left to right) that contains any
/// of `candidates`.
#[must_use]
pub fn find_column<S: AsRef<str>>(headers: &[S], candidates: &[&str]) -> Option<usize> {
    let folded: Vec<String> = candidates
        .iter()
        .map(|c| fold_text(c))
        .filter(|c| !c.is_empty())
        .collect();

    headers.iter().position(|header| {
        let header = fold_text(header.as_ref());
        folded.iter().any(|c| header.contains(c.as_str()))
    })
}

/// Like [`find_column`], but never returns `skip`.
#[must_use]
pub fn find_column_except<S: AsRef<str>>(
    headers: &[S],
    candidates: &[&str],
    skip: Option<usize>,
) -> Option<usize> {
    let folded: Vec<String> = candidates
        .iter()
        .map(|c| fold_text(c))
        .filter(|c| !c.is_empty())
        .collect();

    headers.iter().enumerate().position(|(i, header)| {
        if Some(i) == skip {
            return false;
        }
        let header = fold_text(header.as_ref());
        folded.iter().any(|c| header.contains(c.as_str()))
    })
}

/// Returns the index of the first header equal to `name` after folding.
#[must_use]
pub fn find_exact<S: AsRef<str>>(headers: &[S], name: &str) -> Option<usize> {
    let name = fold_text(name);
    if name.is_empty() {
        return None;
    }
    headers
        .iter()
        .position(|header| fold_text(header.as_ref()) == name)
}

/// Returns the index of the first price-like header that also contains
/// `fragment`, e.g. `"VALOR 5%"` for the fragment `"5%"`.
#[must_use]
pub fn find_price_column_containing<S: AsRef<str>>(headers: &[S], fragment: &str) -> Option<usize> {
    let fragment = fold_text(fragment);
    if fragment.is_empty() {
        return None;
    }
    headers.iter().position(|header| {
        let header = header.as_ref();
        is_price_like(header) && fold_text(header).contains(&fragment)
    })
}

/// Whether a header names a price column.
#[must_use]
pub fn is_price_like(header: &str) -> bool {
    let header = fold_text(header);
    PRICE_KEYWORDS.iter().any(|k| header.contains(k))
}

/// Indices of every price-like header, in sheet order.
#[must_use]
pub fn price_like_columns<S: AsRef<str>>(headers: &[S]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .filter(|(_, h)| is_price_like(h.as_ref()))
        .map(|(i, _)| i)
        .collect()
}

/// Column positions for the product sheet, resolved once per header row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub sku: Option<usize>,
    pub model: Option<usize>,
    pub color: Option<usize>,
    pub quality: Option<usize>,
    pub price: Option<usize>,
    pub image: Option<usize>,
    pub promotion: Option<usize>,
    pub status: Option<usize>,
}

impl ColumnMap {
    /// The base price comes from a `valor`/`value` column, else any other
    /// price-like column; the promotion column is never used for it.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Self {
        let promotion = find_column(headers, PROMOTION_KEYWORDS);
        let price = find_column_except(headers, BASE_PRICE_KEYWORDS, promotion)
            .or_else(|| find_column_except(headers, PRICE_KEYWORDS, promotion));
        Self {
            sku: find_column(headers, SKU_KEYWORDS),
            model: find_column(headers, MODEL_KEYWORDS),
            color: find_column(headers, COLOR_KEYWORDS),
            quality: find_column(headers, QUALITY_KEYWORDS),
            price,
            image: find_column(headers, IMAGE_KEYWORDS),
            promotion,
            status: find_column(headers, STATUS_KEYWORDS),
        }
    }
}
