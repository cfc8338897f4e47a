pub mod cart;
pub mod catalog;
pub mod code;
pub mod effective;
pub mod export;
pub mod quote;
pub mod store;

pub use cart::{
    is_bundle_only, parse_quantity_input, Cart, CartLine, CartSnapshot, ResolvedLine, SharedCart,
    SnapshotLine, BUNDLE_ONLY_MARKERS, BUNDLE_SIZE,
};
pub use catalog::{available_brands, available_qualities, brand_of, CatalogFilter};
pub use code::{resolve_code, CodeReference, PriceOverrides};
pub use effective::effective_price;
pub use export::write_quote_spreadsheet;
pub use quote::{format_brl, next_quote_number, Quote};
pub use store::{CartStore, QuoteStore, StoreError};
