//! Error types for the skyclean library.

use std::path::PathBuf;
use thiserror::Error;

use crate::table::ColumnType;

/// Main error type for cleaning operations.
#[derive(Debug, Error)]
pub enum CleanError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to process.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The two tables share no column name to join on.
    #[error("No common columns between datasets (left: {left:?}, right: {right:?})")]
    NoCommonKey {
        left: Vec<String>,
        right: Vec<String>,
    },

    /// A cell could not be converted to the requested type.
    #[error("Cannot coerce '{value}' in column '{column}' (row {row}) to {target}")]
    TypeCoercion {
        column: String,
        row: usize,
        value: String,
        target: ColumnType,
    },

    /// A column required by an operation is absent.
    #[error("Column '{column}' required by {operation} not found")]
    MissingColumn {
        column: String,
        operation: &'static str,
    },
}

impl CleanError {
    pub(crate) fn missing_column(column: impl Into<String>, operation: &'static str) -> Self {
        CleanError::MissingColumn {
            column: column.into(),
            operation,
        }
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleanError>;
