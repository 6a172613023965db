//! Column type correction.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CleanError, Result};
use crate::table::{ColumnType, Table, Value};

/// One column conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeChange {
    pub column: String,
    pub from: ColumnType,
    pub to: ColumnType,
}

/// Columns converted by a type-correction pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeReport {
    pub conversions: Vec<TypeChange>,
}

/// Cast every column named in `dtype_map` that exists in `table`.
///
/// Absent columns are skipped. The first cell that cannot be represented
/// in its target type aborts the whole pass.
pub fn correct_types(
    table: &Table,
    dtype_map: &IndexMap<String, ColumnType>,
) -> Result<(Table, TypeReport)> {
    let mut out = table.clone();
    let mut report = TypeReport::default();

    for (column, &target) in dtype_map {
        let Some(idx) = out.column_index(column) else {
            debug!(column = %column, "column absent, type conversion skipped");
            continue;
        };

        for (row_idx, row) in out.rows.iter_mut().enumerate() {
            let cell = std::mem::replace(&mut row[idx], Value::Null);
            row[idx] = cast_value(cell, target).map_err(|value| CleanError::TypeCoercion {
                column: column.clone(),
                row: row_idx,
                value,
                target,
            })?;
        }

        let from = out.dtypes[idx];
        out.dtypes[idx] = target;
        debug!(column = %column, from = %from, to = %target, "column converted");
        report.conversions.push(TypeChange {
            column: column.clone(),
            from,
            to: target,
        });
    }

    info!(converted = report.conversions.len(), "type correction finished");
    Ok((out, report))
}

/// Convert one cell, returning the offending rendering on failure.
pub fn cast_value(value: Value, target: ColumnType) -> std::result::Result<Value, String> {
    match target {
        ColumnType::Integer | ColumnType::NullableInteger => match value {
            Value::Null if target.is_nullable() => Ok(Value::Null),
            Value::Null => Err("<missing>".to_string()),
            Value::Int(i) => Ok(Value::Int(i)),
            Value::Float(f) => float_to_int(f).ok_or_else(|| Value::Float(f).to_string()),
            Value::Text(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i64>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().and_then(float_to_int_raw))
                    .map(Value::Int)
                    .ok_or(s)
            }
        },
        ColumnType::Float => match value {
            Value::Null => Ok(Value::Null),
            Value::Int(i) => Ok(Value::Float(i as f64)),
            Value::Float(f) => Ok(Value::Float(f)),
            Value::Text(s) => s.trim().parse::<f64>().map(Value::Float).map_err(|_| s),
        },
        ColumnType::Text => match value {
            Value::Null => Ok(Value::Null),
            Value::Text(s) => Ok(Value::Text(s)),
            other => Ok(Value::Text(other.to_string())),
        },
    }
}

fn float_to_int(f: f64) -> Option<Value> {
    float_to_int_raw(f).map(Value::Int)
}

/// Whole, in-range floats only; fractional values are never truncated.
fn float_to_int_raw(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
