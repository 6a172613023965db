//! Categorical text normalization.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CleanError, Result};
use crate::table::{ColumnType, Table, Value};

/// Summary of a categorical cleanup pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoricalReport {
    pub columns: Vec<String>,
    pub values_changed: usize,
}

/// Title-case a string: a letter is uppercased when the character before it
/// is not a letter, lowercased otherwise.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut after_letter = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if after_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(ch);
            after_letter = false;
        }
    }
    out
}

/// Trim and title-case text cells.
///
/// With `columns = None` every `Text` column is processed. Missing and
/// non-text cells are left untouched.
pub fn clean_categoricals(
    table: &Table,
    columns: Option<&[String]>,
) -> Result<(Table, CategoricalReport)> {
    let targets: Vec<usize> = match columns {
        Some(names) => names
            .iter()
            .map(|name| {
                table
                    .column_index(name)
                    .ok_or_else(|| CleanError::missing_column(name, "categorical cleanup"))
            })
            .collect::<Result<_>>()?,
        None => (0..table.column_count())
            .filter(|&idx| table.dtypes[idx] == ColumnType::Text)
            .collect(),
    };

    let mut out = table.clone();
    let mut changed = 0;
    for row in out.rows.iter_mut() {
        for &idx in &targets {
            if let Value::Text(s) = &row[idx] {
                let cleaned = title_case(s.trim());
                if &cleaned != s {
                    row[idx] = Value::Text(cleaned);
                    changed += 1;
                }
            }
        }
    }

    let report = CategoricalReport {
        columns: targets.iter().map(|&idx| table.headers[idx].clone()).collect(),
        values_changed: changed,
    };
    info!(
        columns = report.columns.len(),
        changed, "categorical columns normalized"
    );
    Ok((out, report))
}
