//! Quotes: a frozen, numbered copy of a priced cart.

use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::cart::ResolvedLine;

/// Characters `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub const SHARE_BASE_URL: &str = "https://wa.me/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: String,
    pub number: u32,
    pub lines: Vec<ResolvedLine>,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub spreadsheet_filename: String,
    /// Partner code applied when the quote was priced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_code: Option<String>,
}

impl Quote {
    /// Freezes already-priced lines. The total is the sum of line subtotals,
    /// never recomputed from products.
    #[must_use]
    pub fn build(number: u32, lines: Vec<ResolvedLine>, created_at: DateTime<Utc>) -> Self {
        let total = lines
            .iter()
            .map(|l| l.subtotal)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        Self {
            id: format!("quote-{number}"),
            number,
            lines,
            total,
            created_at,
            spreadsheet_filename: format!(
                "orcamento-{number}-{}.xlsx",
                created_at.format("%Y-%m-%d")
            ),
            price_code: None,
        }
    }

    #[must_use]
    pub fn with_price_code(mut self, code: Option<&str>) -> Self {
        self.price_code = code
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        self
    }

    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Plain-text message listing every line and the total.
    #[must_use]
    pub fn share_text(&self) -> String {
        let mut message = format!("📋 *Orçamento #{}* 📋\n\n", self.number);
        for line in &self.lines {
            let p = &line.product;
            message.push_str(&format!(
                "*{} {}* ({})\n{}x {} = {}\n\n",
                p.model,
                p.color,
                p.quality_grade,
                line.quantity,
                format_brl(line.unit_price),
                format_brl(line.subtotal),
            ));
        }
        message.push_str(&format!("*Total: {}*\n", format_brl(self.total)));
        message
    }

    /// Messaging link carrying [`Quote::share_text`].
    #[must_use]
    pub fn share_url(&self) -> String {
        let text = self.share_text();
        format!(
            "{SHARE_BASE_URL}?text={}",
            utf8_percent_encode(&text, URI_COMPONENT)
        )
    }
}

/// One more than the highest existing number, or 1.
#[must_use]
pub fn next_quote_number(quotes: &[Quote]) -> u32 {
    quotes
        .iter()
        .map(|q| q.number)
        .max()
        .map_or(1, |n| n.saturating_add(1))
}

/// Formats an amount as Brazilian reais: `R$ 1.234,56`.
#[must_use]
pub fn format_brl(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}R$ {grouped},{frac_part}")
}
