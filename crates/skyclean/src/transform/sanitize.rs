//! Invalid value removal.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CleanError, Result};
use crate::table::{ColumnType, Table, Value};

/// Outcome of nulling negative values in one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeReport {
    pub column: String,
    pub values_changed: usize,
}

/// Replace every negative value in `column` with a missing value.
///
/// Negative magnitudes are treated as invalid measurements, so they are
/// dropped rather than clamped. Zero is kept.
pub fn nullify_negatives(table: &Table, column: &str) -> Result<(Table, SanitizeReport)> {
    let idx = table
        .column_index(column)
        .ok_or_else(|| CleanError::missing_column(column, "negative value sanitization"))?;

    let mut out = table.clone();
    let mut changed = 0;

    for (row_idx, row) in out.rows.iter_mut().enumerate() {
        let cell = &mut row[idx];
        let negative = match cell {
            Value::Null => false,
            Value::Int(i) => *i < 0,
            Value::Float(f) => *f < 0.0,
            Value::Text(s) => {
                return Err(CleanError::TypeCoercion {
                    column: column.to_string(),
                    row: row_idx,
                    value: s.clone(),
                    target: ColumnType::Float,
                });
            }
        };
        if negative {
            *cell = Value::Null;
            changed += 1;
        }
    }

    if changed > 0 {
        out.dtypes[idx] = out.dtypes[idx].nullable();
    }

    info!(column = %column, changed, "negative values converted to missing");
    Ok((
        out,
        SanitizeReport {
            column: column.to_string(),
            values_changed: changed,
        },
    ))
}
