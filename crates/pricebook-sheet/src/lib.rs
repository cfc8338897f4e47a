pub mod client;
pub mod codes;
pub mod currency;
pub mod error;
pub mod header;
pub mod ingest;
pub mod row;

mod retry;

pub use client::SheetClient;
pub use codes::ingest_price_codes;
pub use currency::normalize_currency;
pub use error::SheetError;
pub use header::{
    find_column, find_column_except, find_exact, find_price_column_containing, price_like_columns,
    ColumnMap,
};
pub use ingest::ingest_products;
pub use row::{parse_row, parse_row_with};
