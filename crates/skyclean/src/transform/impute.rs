//! Grouped median imputation with successively coarser fallbacks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CleanError, Result};
use crate::table::{ColumnType, Table, Value};

/// Which column to fill and how to group it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImputationConfig {
    /// Numeric column whose missing cells are filled.
    pub target: String,
    /// Grouping tiers tried in order; the global median is always the last resort.
    pub group_tiers: Vec<Vec<String>>,
}

impl Default for ImputationConfig {
    fn default() -> Self {
        Self {
            target: "salary".to_string(),
            group_tiers: vec![
                vec!["education".to_string(), "loyalty_card".to_string()],
                vec!["education".to_string()],
            ],
        }
    }
}

/// Cells filled by one tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierFill {
    /// Grouping columns joined with `+`, or `global`.
    pub tier: String,
    pub filled: usize,
}

/// Summary of an imputation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImputeReport {
    pub column: String,
    pub missing_before: usize,
    pub tiers: Vec<TierFill>,
    /// Cells still missing; non-zero only when the column had no values at all.
    pub remaining: usize,
}

impl ImputeReport {
    pub fn imputed(&self) -> usize {
        self.missing_before - self.remaining
    }
}

/// Median of a set of values; `None` when empty.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Fill missing cells of the target column from grouped medians.
///
/// Each tier computes medians over the column as filled so far. Rows with a
/// missing grouping value belong to no group for that tier. If the whole
/// column is missing the global median is undefined and the cells stay
/// missing; the report's `remaining` shows it.
pub fn impute_grouped_median(
    table: &Table,
    config: &ImputationConfig,
) -> Result<(Table, ImputeReport)> {
    let target_idx = table
        .column_index(&config.target)
        .ok_or_else(|| CleanError::missing_column(&config.target, "imputation"))?;

    let tier_indices: Vec<Vec<usize>> = config
        .group_tiers
        .iter()
        .map(|tier| {
            tier.iter()
                .map(|col| {
                    table
                        .column_index(col)
                        .ok_or_else(|| CleanError::missing_column(col, "imputation grouping"))
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<_>>()?;

    let mut values: Vec<Option<f64>> = Vec::with_capacity(table.row_count());
    for (row_idx, value) in table.column_values(target_idx).enumerate() {
        match value {
            Value::Null => values.push(None),
            Value::Text(s) => {
                return Err(CleanError::TypeCoercion {
                    column: config.target.clone(),
                    row: row_idx,
                    value: s.clone(),
                    target: ColumnType::Float,
                });
            }
            other => values.push(other.as_f64()),
        }
    }

    let missing_before = values.iter().filter(|v| v.is_none()).count();
    let mut tiers = Vec::with_capacity(config.group_tiers.len() + 1);

    for (columns, indices) in config.group_tiers.iter().zip(&tier_indices) {
        let filled = fill_by_group(table, &mut values, indices);
        debug!(tier = %columns.join(" + "), filled, "grouped median tier applied");
        tiers.push(TierFill {
            tier: columns.join(" + "),
            filled,
        });
    }

    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    let global = median(&mut present);
    let mut filled = 0;
    if let Some(global) = global {
        for value in values.iter_mut().filter(|v| v.is_none()) {
            *value = Some(global);
            filled += 1;
        }
    }
    tiers.push(TierFill {
        tier: "global".to_string(),
        filled,
    });

    let remaining = values.iter().filter(|v| v.is_none()).count();
    if remaining > 0 {
        warn!(
            column = %config.target,
            remaining,
            "column has no values to derive a median from; cells left missing"
        );
    }

    let mut out = table.clone();
    out.put_column(
        config.target.clone(),
        ColumnType::Float,
        values.into_iter().map(Value::from).collect(),
    );

    let report = ImputeReport {
        column: config.target.clone(),
        missing_before,
        tiers,
        remaining,
    };
    info!(
        column = %report.column,
        missing_before,
        imputed = report.imputed(),
        remaining,
        "imputation finished"
    );
    Ok((out, report))
}

/// Fill missing entries from the median of their group; returns the fill count.
fn fill_by_group(table: &Table, values: &mut [Option<f64>], group_cols: &[usize]) -> usize {
    let group_of = |row: usize| -> Option<Vec<&Value>> {
        let key: Vec<&Value> = group_cols.iter().map(|&c| &table.rows[row][c]).collect();
        if key.iter().any(|v| v.is_null()) { None } else { Some(key) }
    };

    let mut samples: HashMap<Vec<&Value>, Vec<f64>> = HashMap::new();
    for (row, value) in values.iter().enumerate() {
        if let (Some(v), Some(key)) = (value, group_of(row)) {
            samples.entry(key).or_default().push(*v);
        }
    }
    let medians: HashMap<Vec<&Value>, f64> = samples
        .into_iter()
        .filter_map(|(key, mut vals)| median(&mut vals).map(|m| (key, m)))
        .collect();

    let mut filled = 0;
    for (row, value) in values.iter_mut().enumerate() {
        if value.is_some() {
            continue;
        }
        if let Some(m) = group_of(row).and_then(|key| medians.get(&key)) {
            *value = Some(*m);
            filled += 1;
        }
    }
    filled
}
