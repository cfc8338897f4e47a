//! Monetary text normalization.
//!
//! Every place that turns sheet text into money goes through
//! [`normalize_currency`]: the price column, the fallback scans during
//! ingestion, and the price-code overrides.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

static CURRENCY_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)R\$").expect("valid currency marker regex"));

/// Parses loosely formatted Brazilian currency text into a number.
///
/// Cleaning steps, in order: drop every `R$` marker, drop all whitespace
/// (non-breaking spaces included), drop ASCII letters, drop `.` as a
/// thousands separator, then turn the first `,` into the decimal point. The
/// longest numeric prefix of what remains is parsed, so trailing garbage such
/// as `%` is ignored.
///
/// Returns `None` for absent, blank, or non-numeric input.
#[must_use]
pub fn normalize_currency(input: Option<&str>) -> Option<Decimal> {
    let input = input?;
    if input.is_empty() {
        return None;
    }

    let without_marker = CURRENCY_MARKER.replace_all(input, "");
    let cleaned: String = without_marker
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_ascii_alphabetic() && *c != '.')
        .collect();
    let cleaned = cleaned.replacen(',', ".", 1);

    parse_numeric_prefix(&cleaned)
}

/// Parses `[+-]?digits[.digits]` from the start of `s`, ignoring whatever
/// follows. At least one digit is required on either side of the point.
fn parse_numeric_prefix(s: &str) -> Option<Decimal> {
    let bytes = s.as_bytes();
    let mut i = 0usize;

    let negative = match bytes.first() {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_part = &s[int_start..i];

    let mut frac_part = "";
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        frac_part = &s[frac_start..j];
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let literal = if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{int_part}.{frac_part}")
    };

    let value = Decimal::from_str(&literal).ok()?;
    Some(if negative { -value } else { value })
}
