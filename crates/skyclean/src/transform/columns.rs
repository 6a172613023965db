//! Column label normalization and semantic renaming.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::table::Table;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9a-zA-Z]+").unwrap());
static REPEATED_UNDERSCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_+").unwrap());

/// One header change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRename {
    pub from: String,
    pub to: String,
}

/// Summary of a header rewrite.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenameReport {
    /// Number of headers examined.
    pub columns_processed: usize,
    /// Headers whose name actually changed.
    pub renames: Vec<ColumnRename>,
    /// Map entries skipped because the target name was already taken.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<ColumnRename>,
}

/// Normalize a column label to lowercase snake form.
///
/// Runs of non-alphanumeric characters become a single underscore.
/// CamelCase boundaries are not split: `LoyaltyCard` becomes `loyaltycard`.
pub fn normalize_column_name(name: &str) -> String {
    let replaced = NON_ALNUM.replace_all(name.trim(), "_");
    let lowered = replaced.to_lowercase();
    let collapsed = REPEATED_UNDERSCORE.replace_all(&lowered, "_");
    collapsed.trim_matches('_').to_string()
}

/// Normalize a list of column labels, preserving order.
pub fn normalize_column_names(names: &[String]) -> Vec<String> {
    names.iter().map(|n| normalize_column_name(n)).collect()
}

/// Return a copy of `table` with normalized headers.
pub fn normalize_columns(table: &Table) -> (Table, RenameReport) {
    let normalized = normalize_column_names(&table.headers);

    let renames: Vec<ColumnRename> = table
        .headers
        .iter()
        .zip(&normalized)
        .filter(|(from, to)| from != to)
        .map(|(from, to)| ColumnRename {
            from: from.clone(),
            to: to.clone(),
        })
        .collect();

    for rename in &renames {
        debug!(from = %rename.from, to = %rename.to, "normalized column name");
    }
    info!(
        columns = table.column_count(),
        changed = renames.len(),
        "column name normalization finished"
    );

    let mut out = table.clone();
    out.headers = normalized;
    (
        out,
        RenameReport {
            columns_processed: table.column_count(),
            renames,
            skipped: Vec::new(),
        },
    )
}

/// Apply a semantic rename map to the columns that exist in `table`.
///
/// Keys absent from the table are ignored. A rename whose target is
/// already a column is skipped rather than producing duplicate headers.
pub fn rename_semantic(
    table: &Table,
    rename_map: &IndexMap<String, String>,
) -> (Table, RenameReport) {
    let mut out = table.clone();
    let mut report = RenameReport {
        columns_processed: table.column_count(),
        ..RenameReport::default()
    };

    for (from, to) in rename_map {
        let Some(idx) = out.column_index(from) else {
            continue;
        };
        let rename = ColumnRename {
            from: from.clone(),
            to: to.clone(),
        };
        if from != to && out.has_column(to) {
            warn!(from = %from, to = %to, "rename target already exists, skipping");
            report.skipped.push(rename);
            continue;
        }
        out.headers[idx] = to.clone();
        debug!(from = %from, to = %to, "renamed column");
        report.renames.push(rename);
    }

    info!(renamed = report.renames.len(), "semantic column renaming applied");
    (out, report)
}
