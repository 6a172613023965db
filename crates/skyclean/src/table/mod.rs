//! Typed in-memory tables.

mod data;
mod types;
mod value;

pub use data::Table;
pub use types::ColumnType;
pub use value::{Value, format_float};
