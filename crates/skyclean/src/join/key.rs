//! Join key detection and correspondence scoring.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{CleanError, Result};
use crate::table::{Table, Value};

/// Hashable identity of a join-key cell.
///
/// Whole floats collapse onto integers so `5` and `5.0` match; text never
/// matches a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum KeyValue {
    Int(i64),
    Float(u64),
    Text(String),
}

impl KeyValue {
    /// Key identity of a cell; missing cells have none and never match.
    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Int(i) => Some(KeyValue::Int(*i)),
            Value::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Some(KeyValue::Int(*f as i64))
            }
            Value::Float(f) => Some(KeyValue::Float(f.to_bits())),
            Value::Text(s) => Some(KeyValue::Text(s.clone())),
        }
    }
}

/// Column names present in both tables, sorted.
pub fn common_columns(left: &Table, right: &Table) -> Vec<String> {
    let left_names: BTreeSet<&String> = left.headers.iter().collect();
    let right_names: BTreeSet<&String> = right.headers.iter().collect();
    left_names
        .intersection(&right_names)
        .map(|s| s.to_string())
        .collect()
}

/// Pick the join key: the lexicographically smallest shared column name.
pub fn detect_join_key(left: &Table, right: &Table) -> Result<String> {
    common_columns(left, right)
        .into_iter()
        .next()
        .ok_or_else(|| CleanError::NoCommonKey {
            left: left.headers.clone(),
            right: right.headers.clone(),
        })
}

/// Percentage of each side's rows whose key appears on the other side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correspondence {
    /// Rows of the left table with a match in the right table, in [0, 100].
    pub match_left: f64,
    /// Rows of the right table with a match in the left table, in [0, 100].
    pub match_right: f64,
}

/// Score key overlap between two tables on `key`.
pub fn correspondence(left: &Table, right: &Table, key: &str) -> Result<Correspondence> {
    let left_idx = left
        .column_index(key)
        .ok_or_else(|| CleanError::missing_column(key, "correspondence analysis"))?;
    let right_idx = right
        .column_index(key)
        .ok_or_else(|| CleanError::missing_column(key, "correspondence analysis"))?;

    let left_keys = key_set(left, left_idx);
    let right_keys = key_set(right, right_idx);

    Ok(Correspondence {
        match_left: match_percentage(left, left_idx, &right_keys),
        match_right: match_percentage(right, right_idx, &left_keys),
    })
}

fn key_set(table: &Table, idx: usize) -> HashSet<KeyValue> {
    table.column_values(idx).filter_map(KeyValue::from_value).collect()
}

fn match_percentage(table: &Table, idx: usize, other: &HashSet<KeyValue>) -> f64 {
    let total = table.row_count();
    if total == 0 {
        return 100.0;
    }
    let matched = table
        .column_values(idx)
        .filter(|v| KeyValue::from_value(v).is_some_and(|k| other.contains(&k)))
        .count();
    matched as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnType;

    fn keyed(name: &str, keys: &[i64]) -> Table {
        Table::new(
            vec![name.to_string()],
            vec![ColumnType::Integer],
            keys.iter().map(|k| vec![Value::Int(*k)]).collect(),
        )
    }

    #[test]
    fn test_detect_key_is_deterministic() {
        let left = Table::new(
            vec!["zeta".into(), "loyalty_number".into(), "alpha".into()],
            vec![ColumnType::Text; 3],
            vec![],
        );
        let right = Table::new(
            vec!["alpha".into(), "zeta".into(), "loyalty_number".into()],
            vec![ColumnType::Text; 3],
            vec![],
        );
        for _ in 0..10 {
            assert_eq!(detect_join_key(&left, &right).unwrap(), "alpha");
        }
        assert_eq!(
            common_columns(&left, &right),
            vec!["alpha", "loyalty_number", "zeta"]
        );
    }

    #[test]
    fn test_detect_key_fails_without_overlap() {
        let err = detect_join_key(&keyed("a", &[1]), &keyed("b", &[1])).unwrap_err();
        assert!(matches!(err, CleanError::NoCommonKey { .. }));
    }

    #[test]
    fn test_partial_overlap() {
        let c = correspondence(&keyed("k", &[1, 2, 3]), &keyed("k", &[2, 3, 4]), "k").unwrap();
        assert!((c.match_left - 66.666).abs() < 0.01);
        assert!((c.match_right - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_scores_count_rows_not_distinct_keys() {
        // Flight activity repeats each customer once per month
        let c = correspondence(&keyed("k", &[1, 1, 1, 2]), &keyed("k", &[1]), "k").unwrap();
        assert_eq!(c.match_left, 75.0);
        assert_eq!(c.match_right, 100.0);
    }

    #[test]
    fn test_whole_float_matches_int() {
        let floats = Table::new(
            vec!["k".into()],
            vec![ColumnType::Float],
            vec![vec![Value::Float(5.0)], vec![Value::Null]],
        );
        let c = correspondence(&floats, &keyed("k", &[5]), "k").unwrap();
        assert_eq!(c.match_left, 50.0);
        assert_eq!(c.match_right, 100.0);
    }
}
