//! Cross-column logical consistency checks.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::table::Table;

/// Maximum number of offending row indices kept per check.
const SAMPLE_ROWS: usize = 5;

/// A logical relationship between numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsistencyRule {
    /// Violated when `column > limit` on the same row.
    Exceeds {
        name: String,
        column: String,
        limit: String,
    },
    /// Violated when `zero_column == 0` while `column > 0`.
    PositiveWhenZero {
        name: String,
        column: String,
        zero_column: String,
    },
}

impl ConsistencyRule {
    pub fn exceeds(name: &str, column: &str, limit: &str) -> Self {
        ConsistencyRule::Exceeds {
            name: name.to_string(),
            column: column.to_string(),
            limit: limit.to_string(),
        }
    }

    pub fn positive_when_zero(name: &str, column: &str, zero_column: &str) -> Self {
        ConsistencyRule::PositiveWhenZero {
            name: name.to_string(),
            column: column.to_string(),
            zero_column: zero_column.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ConsistencyRule::Exceeds { name, .. } => name,
            ConsistencyRule::PositiveWhenZero { name, .. } => name,
        }
    }

    /// The two columns the rule reads, in `(value, reference)` order.
    fn columns(&self) -> (&str, &str) {
        match self {
            ConsistencyRule::Exceeds { column, limit, .. } => (column, limit),
            ConsistencyRule::PositiveWhenZero {
                column,
                zero_column,
                ..
            } => (column, zero_column),
        }
    }

    fn violated(&self, value: f64, reference: f64) -> bool {
        match self {
            ConsistencyRule::Exceeds { .. } => value > reference,
            ConsistencyRule::PositiveWhenZero { .. } => reference == 0.0 && value > 0.0,
        }
    }

    /// The four checks run on merged flight activity and loyalty data.
    pub fn flight_defaults() -> Vec<Self> {
        vec![
            Self::exceeds("booked > total", "flights_booked", "total_flights"),
            Self::exceeds("companions > total", "flights_with_companions", "total_flights"),
            Self::positive_when_zero(
                "distance > 0 but total_flights = 0",
                "distance",
                "total_flights",
            ),
            Self::positive_when_zero(
                "points_accumulated > 0 but total_flights = 0",
                "points_accumulated",
                "total_flights",
            ),
        ]
    }
}

/// Result of one check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub violations: usize,
    /// Share of rows in violation, in [0, 100].
    pub percentage: f64,
    /// First few offending row indices.
    pub sample_rows: Vec<usize>,
}

/// Outcome of all consistency checks, keyed by check name in rule order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub checks: IndexMap<String, CheckResult>,
    /// Checks not run because one of their columns is absent.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

impl ConsistencyReport {
    /// Check name to violation count.
    pub fn counts(&self) -> IndexMap<String, usize> {
        self.checks
            .iter()
            .map(|(name, result)| (name.clone(), result.violations))
            .collect()
    }

    pub fn total_violations(&self) -> usize {
        self.checks.values().map(|c| c.violations).sum()
    }
}

/// Count rows violating each rule. The table is never modified.
///
/// Rows where either value is missing or non-numeric are not violations.
pub fn check_consistency(table: &Table, rules: &[ConsistencyRule]) -> ConsistencyReport {
    let mut report = ConsistencyReport::default();

    for rule in rules {
        let (value_col, reference_col) = rule.columns();
        let (Some(value_idx), Some(reference_idx)) =
            (table.column_index(value_col), table.column_index(reference_col))
        else {
            debug!(check = %rule.name(), "column absent, check skipped");
            report.skipped.push(rule.name().to_string());
            continue;
        };

        let offending: Vec<usize> = table
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                match (row[value_idx].as_f64(), row[reference_idx].as_f64()) {
                    (Some(value), Some(reference)) => rule.violated(value, reference),
                    _ => false,
                }
            })
            .map(|(idx, _)| idx)
            .collect();

        let percentage = if table.row_count() == 0 {
            0.0
        } else {
            offending.len() as f64 / table.row_count() as f64 * 100.0
        };

        info!(check = %rule.name(), violations = offending.len(), "consistency check");
        report.checks.insert(
            rule.name().to_string(),
            CheckResult {
                violations: offending.len(),
                percentage,
                sample_rows: offending.into_iter().take(SAMPLE_ROWS).collect(),
            },
        );
    }

    report
}
