//! Catalog browsing: brands, quality grades and list filters.

use std::cmp::Ordering;

use pricebook_core::{contains_folded, fold_text, Catalog, Product, MISSING_FIELD};

use crate::cart::is_bundle_only;

/// Brand name given to bundle-only products.
pub const BUNDLE_BRAND: &str = "DOC DE CARGA";

/// Model prefixes that identify a brand, checked in order. Matching is
/// case-sensitive; common case variants are listed explicitly.
pub const BRAND_PREFIXES: &[(&str, &str)] = &[
    ("ip", "iPhone"),
    ("IP", "iPhone"),
    ("LG", "LG"),
    ("SM", "Samsung"),
    ("MT", "Motorola"),
    ("Infinix", "Infinix"),
    ("INFINIX", "Infinix"),
    ("Nokia", "Nokia"),
    ("NOKIA", "Nokia"),
    ("MI", "Xiaomi"),
    ("REALME", "Realme"),
    ("OPPO", "OPPO"),
    ("Oppo", "OPPO"),
    ("oppo", "OPPO"),
    ("ZF", "Asus"),
    ("DOC", BUNDLE_BRAND),
    ("Doc", BUNDLE_BRAND),
    ("doc", BUNDLE_BRAND),
];

/// Display order for known brands. Others follow alphabetically.
pub const BRAND_ORDER: &[&str] = &[
    "iPhone", "Samsung", "Motorola", "Xiaomi", "LG", "Realme", "Nokia", "Infinix", "Asus",
];

/// Label shown for products whose quality grade is blank.
pub const DEFAULT_QUALITY_LABEL: &str = "LCD";

/// Brand for a model, from [`BRAND_PREFIXES`] or else the model's first word.
#[must_use]
pub fn brand_of(model: &str) -> Option<String> {
    let model = model.trim();
    if model.is_empty() {
        return None;
    }
    if is_bundle_only(model) {
        return Some(BUNDLE_BRAND.to_string());
    }

    BRAND_PREFIXES
        .iter()
        .find(|(prefix, _)| model.starts_with(prefix))
        .map(|(_, brand)| (*brand).to_string())
        .or_else(|| model.split_whitespace().next().map(str::to_string))
}

fn compare_brands(a: &str, b: &str) -> Ordering {
    let rank = |brand: &str| BRAND_ORDER.iter().position(|known| *known == brand);
    match (rank(a), rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => fold_text(a).cmp(&fold_text(b)).then_with(|| a.cmp(b)),
    }
}

/// Distinct brands across `products`, in display order.
#[must_use]
pub fn available_brands<'a>(products: impl IntoIterator<Item = &'a Product>) -> Vec<String> {
    let mut brands: Vec<String> = Vec::new();
    for brand in products.into_iter().filter_map(|p| brand_of(&p.model)) {
        if !brands.contains(&brand) {
            brands.push(brand);
        }
    }
    brands.sort_by(|a, b| compare_brands(a, b));
    brands
}

/// Quality grade as shown to users; the blank placeholder reads as
/// [`DEFAULT_QUALITY_LABEL`].
#[must_use]
pub fn display_quality(grade: &str) -> &str {
    if grade == MISSING_FIELD {
        DEFAULT_QUALITY_LABEL
    } else {
        grade
    }
}

/// Distinct display qualities across `products`, in first-seen order.
#[must_use]
pub fn available_qualities<'a>(products: impl IntoIterator<Item = &'a Product>) -> Vec<String> {
    let mut qualities: Vec<String> = Vec::new();
    for product in products {
        let quality = display_quality(&product.quality_grade);
        if !quality.is_empty() && !qualities.iter().any(|q| q == quality) {
            qualities.push(quality.to_string());
        }
    }
    qualities
}

/// Narrowing applied to the visible catalog. Empty lists and a blank search
/// match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub brands: Vec<String>,
    pub qualities: Vec<String>,
    pub promotion_only: bool,
    pub search: Option<String>,
}

impl CatalogFilter {
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if !self.brands.is_empty() {
            let Some(brand) = brand_of(&product.model) else {
                return false;
            };
            if !self.brands.contains(&brand) {
                return false;
            }
        }

        if !self.qualities.is_empty() {
            let quality = display_quality(&product.quality_grade);
            if !self.qualities.iter().any(|q| q == quality) {
                return false;
            }
        }

        if self.promotion_only && !product.has_promotion() {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => contains_folded(&product.model, term),
            _ => true,
        }
    }

    /// Visible products that pass the filter, in catalog order.
    #[must_use]
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        catalog
            .visible_products()
            .filter(|p| self.matches(p))
            .collect()
    }
}
