//! Column type definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage type of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Whole numbers, no missing cells allowed.
    Integer,
    /// Whole numbers that may be missing.
    NullableInteger,
    /// Floating-point numbers (may be missing).
    Float,
    /// Free text or categorical values.
    Text,
}

impl ColumnType {
    /// Returns true if cells of this type may be missing.
    pub fn is_nullable(&self) -> bool {
        !matches!(self, ColumnType::Integer)
    }

    /// The type a column takes once missing cells may appear in it.
    pub fn nullable(self) -> Self {
        match self {
            ColumnType::Integer => ColumnType::NullableInteger,
            other => other,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "integer",
            ColumnType::NullableInteger => "nullable integer",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
        };
        f.write_str(name)
    }
}
