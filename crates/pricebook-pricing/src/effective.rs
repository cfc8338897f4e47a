use pricebook_core::Product;
use rust_decimal::Decimal;

/// The unit price a customer pays.
///
/// A positive promotion and a code override never stack: the cheaper of the
/// two applies. Either one alone replaces the base price.
#[must_use]
pub fn effective_price(product: &Product, code_override: Option<Decimal>) -> Decimal {
    let promotion = product.promotional_price.filter(|p| *p > Decimal::ZERO);
    match (promotion, code_override) {
        (Some(promotion), Some(code)) => promotion.min(code),
        (Some(promotion), None) => promotion,
        (None, Some(code)) => code,
        (None, None) => product.base_price,
    }
}
