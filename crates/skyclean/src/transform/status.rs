//! Customer status derivation.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CleanError, Result};
use crate::table::{ColumnType, Table, Value};

/// Membership state derived from the cancellation year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerStatus {
    Active,
    Cancelled,
}

impl CustomerStatus {
    /// A missing cancellation year means the membership is still active.
    pub fn classify(cancellation_year: &Value) -> Self {
        if cancellation_year.is_null() {
            CustomerStatus::Active
        } else {
            CustomerStatus::Cancelled
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "Active",
            CustomerStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source and destination columns for the status column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    pub source: String,
    pub target: String,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            source: "cancellation_year".to_string(),
            target: "customer_status".to_string(),
        }
    }
}

/// Append (or overwrite) the status column.
pub fn derive_status(table: &Table, config: &StatusConfig) -> Result<Table> {
    let idx = table
        .column_index(&config.source)
        .ok_or_else(|| CleanError::missing_column(&config.source, "status derivation"))?;

    let statuses: Vec<CustomerStatus> = table
        .column_values(idx)
        .map(CustomerStatus::classify)
        .collect();
    let cancelled = statuses
        .iter()
        .filter(|s| **s == CustomerStatus::Cancelled)
        .count();

    let mut out = table.clone();
    out.put_column(
        config.target.clone(),
        ColumnType::Text,
        statuses.iter().map(|s| Value::text(s.as_str())).collect(),
    );

    info!(
        column = %config.target,
        active = statuses.len() - cancelled,
        cancelled,
        "customer status derived"
    );
    Ok(out)
}
