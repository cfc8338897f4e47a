//! Accent- and case-insensitive text folding shared by header matching,
//! price-code lookup, and the product-name heuristics.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Folds `s` for comparison: canonical decomposition with combining marks
/// removed, lowercased, and trimmed.
///
/// `"  Promoção "` folds to `"promocao"`; `"CATÁLOGO"` to `"catalogo"`.
#[must_use]
pub fn fold_text(s: &str) -> String {
    s.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Returns `true` when the folded `haystack` contains the folded `needle`.
///
/// An empty needle never matches; a blank keyword must not select a column.
#[must_use]
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    let needle = fold_text(needle);
    !needle.is_empty() && fold_text(haystack).contains(&needle)
}
