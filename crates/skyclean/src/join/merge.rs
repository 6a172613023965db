//! Hash join of two tables on a shared key column.

use std::collections::HashMap;

use crate::error::{CleanError, Result};
use crate::table::{ColumnType, Table, Value};

use super::key::KeyValue;
use super::strategy::JoinStrategy;

/// Merge `left` and `right` on `key` with the given strategy.
///
/// Output columns are every left column followed by every right column
/// except the key. Other names present on both sides get `suffixes`
/// (left, right) appended.
pub fn merge(
    left: &Table,
    right: &Table,
    key: &str,
    strategy: JoinStrategy,
    suffixes: (&str, &str),
) -> Result<Table> {
    let left_key = left
        .column_index(key)
        .ok_or_else(|| CleanError::missing_column(key, "merge"))?;
    let right_key = right
        .column_index(key)
        .ok_or_else(|| CleanError::missing_column(key, "merge"))?;

    let key_dtype = unify_key_type(left.dtypes[left_key], right.dtypes[right_key]);

    let mut headers = Vec::with_capacity(left.column_count() + right.column_count() - 1);
    let mut dtypes = Vec::with_capacity(headers.capacity());
    for (idx, name) in left.headers.iter().enumerate() {
        if idx == left_key {
            headers.push(name.clone());
            dtypes.push(key_dtype);
        } else if right.has_column(name) {
            headers.push(format!("{}{}", name, suffixes.0));
            dtypes.push(left.dtypes[idx]);
        } else {
            headers.push(name.clone());
            dtypes.push(left.dtypes[idx]);
        }
    }
    for (idx, name) in right.headers.iter().enumerate() {
        if idx == right_key {
            continue;
        }
        if left.has_column(name) {
            headers.push(format!("{}{}", name, suffixes.1));
        } else {
            headers.push(name.clone());
        }
        dtypes.push(right.dtypes[idx]);
    }

    let combine = |li: Option<usize>, rj: Option<usize>| -> Vec<Value> {
        let mut row = Vec::with_capacity(headers.len());
        for col in 0..left.column_count() {
            let cell = if col == left_key {
                match (li, rj) {
                    (Some(i), _) => left.rows[i][col].clone(),
                    (None, Some(j)) => right.rows[j][right_key].clone(),
                    (None, None) => Value::Null,
                }
            } else {
                li.map(|i| left.rows[i][col].clone()).unwrap_or(Value::Null)
            };
            row.push(if col == left_key {
                coerce_key_cell(cell, key_dtype)
            } else {
                cell
            });
        }
        for col in (0..right.column_count()).filter(|c| *c != right_key) {
            row.push(rj.map(|j| right.rows[j][col].clone()).unwrap_or(Value::Null));
        }
        row
    };

    let mut rows = Vec::new();
    match strategy {
        JoinStrategy::Inner | JoinStrategy::Left | JoinStrategy::Outer => {
            let index = build_index(right, right_key);
            let mut right_matched = vec![false; right.row_count()];

            for i in 0..left.row_count() {
                let matches = KeyValue::from_value(&left.rows[i][left_key])
                    .and_then(|k| index.get(&k));
                match matches {
                    Some(matches) => {
                        for &j in matches {
                            right_matched[j] = true;
                            rows.push(combine(Some(i), Some(j)));
                        }
                    }
                    None if strategy != JoinStrategy::Inner => rows.push(combine(Some(i), None)),
                    None => {}
                }
            }

            if strategy == JoinStrategy::Outer {
                for (j, matched) in right_matched.iter().enumerate() {
                    if !matched {
                        rows.push(combine(None, Some(j)));
                    }
                }
            }
        }
        JoinStrategy::Right => {
            let index = build_index(left, left_key);
            for j in 0..right.row_count() {
                let matches = KeyValue::from_value(&right.rows[j][right_key])
                    .and_then(|k| index.get(&k));
                match matches {
                    Some(matches) => {
                        for &i in matches {
                            rows.push(combine(Some(i), Some(j)));
                        }
                    }
                    None => rows.push(combine(None, Some(j))),
                }
            }
        }
    }

    let mut table = Table::new(headers, dtypes, rows);
    for col in 0..table.column_count() {
        if table.dtypes[col] == ColumnType::Integer && table.null_count(col) > 0 {
            table.dtypes[col] = ColumnType::NullableInteger;
        }
    }
    Ok(table)
}

/// Row positions grouped by key, in table order.
fn build_index(table: &Table, key_idx: usize) -> HashMap<KeyValue, Vec<usize>> {
    let mut index: HashMap<KeyValue, Vec<usize>> = HashMap::new();
    for (row, value) in table.column_values(key_idx).enumerate() {
        if let Some(k) = KeyValue::from_value(value) {
            index.entry(k).or_default().push(row);
        }
    }
    index
}

fn unify_key_type(left: ColumnType, right: ColumnType) -> ColumnType {
    use ColumnType::*;
    match (left, right) {
        (a, b) if a == b => a,
        (Text, _) | (_, Text) => Text,
        (Float, _) | (_, Float) => Float,
        _ => NullableInteger,
    }
}

fn coerce_key_cell(value: Value, dtype: ColumnType) -> Value {
    match (value, dtype) {
        (Value::Int(i), ColumnType::Float) => Value::Float(i as f64),
        (Value::Int(i), ColumnType::Text) => Value::Text(i.to_string()),
        (v @ Value::Float(_), ColumnType::Text) => Value::Text(v.to_string()),
        (v, _) => v,
    }
}
