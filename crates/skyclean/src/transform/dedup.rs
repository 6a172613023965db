//! Exact-duplicate row removal.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::table::{Table, Value};

/// Which occurrence of a duplicated row survives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeepPolicy {
    /// Keep the first occurrence.
    #[default]
    First,
    /// Keep the last occurrence.
    Last,
    /// Drop every copy, including the first.
    None,
}

/// Row counts around a deduplication pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupReport {
    pub rows_before: usize,
    pub rows_removed: usize,
    pub rows_after: usize,
}

/// Remove rows that are identical across every column.
pub fn deduplicate(table: &Table, keep: KeepPolicy) -> (Table, DedupReport) {
    let mut occurrences: HashMap<&[Value], Vec<usize>> = HashMap::new();
    for (idx, row) in table.rows.iter().enumerate() {
        occurrences.entry(row.as_slice()).or_default().push(idx);
    }

    let mut retained = vec![false; table.row_count()];
    for positions in occurrences.values() {
        match keep {
            KeepPolicy::First => retained[positions[0]] = true,
            KeepPolicy::Last => retained[positions[positions.len() - 1]] = true,
            KeepPolicy::None if positions.len() == 1 => retained[positions[0]] = true,
            KeepPolicy::None => {}
        }
    }

    let rows: Vec<Vec<Value>> = table
        .rows
        .iter()
        .zip(&retained)
        .filter(|(_, keep)| **keep)
        .map(|(row, _)| row.clone())
        .collect();

    let report = DedupReport {
        rows_before: table.row_count(),
        rows_removed: table.row_count() - rows.len(),
        rows_after: rows.len(),
    };

    if report.rows_removed == 0 {
        info!(rows = report.rows_before, "no exact duplicate rows found");
    } else {
        info!(
            before = report.rows_before,
            removed = report.rows_removed,
            after = report.rows_after,
            "duplicate rows removed"
        );
    }

    (
        Table::new(table.headers.clone(), table.dtypes.clone(), rows),
        report,
    )
}
