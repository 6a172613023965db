//! The cleaning driver and its public API.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::CleanerConfig;
use crate::error::Result;
use crate::join::{JoinReport, Joiner};
use crate::output::{StagedFile, stage_json, stage_table};
use crate::table::Table;
use crate::transform::{
    CategoricalReport, DedupReport, ImputeReport, RenameReport, SanitizeReport, TypeReport,
    clean_categoricals, correct_types, deduplicate, derive_status, impute_grouped_median,
    normalize_columns, nullify_negatives, rename_semantic,
};
use crate::validation::{ConsistencyReport, check_consistency};

/// Everything each pipeline step reported, in execution order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanReport {
    pub join: JoinReport,
    pub column_normalization: RenameReport,
    pub semantic_renames: RenameReport,
    pub deduplication: DedupReport,
    pub type_correction: TypeReport,
    pub sanitization: Vec<SanitizeReport>,
    pub imputation: ImputeReport,
    pub categoricals: CategoricalReport,
    pub consistency: ConsistencyReport,
    /// Second type-correction pass, run after imputation.
    pub final_type_correction: TypeReport,
    /// `(rows, columns)` of the cleaned table.
    pub final_shape: (usize, usize),
    /// Where the cleaned table was written, if it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    pub finished_at: DateTime<Utc>,
}

/// A cleaned table together with its report.
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub table: Table,
    pub report: CleanReport,
}

/// Runs the fixed cleaning sequence.
pub struct Cleaner {
    config: CleanerConfig,
    joiner: Joiner,
}

impl Cleaner {
    /// Create a cleaner with default configuration.
    pub fn new() -> Self {
        Self::with_config(CleanerConfig::default())
    }

    /// Create a cleaner with custom configuration.
    pub fn with_config(config: CleanerConfig) -> Self {
        let joiner = Joiner::new(config.parser.clone(), config.merge_suffixes.clone());
        Self { config, joiner }
    }

    /// Load both files and merge them, without cleaning.
    pub fn join_files(
        &self,
        flights: impl AsRef<Path>,
        loyalty: impl AsRef<Path>,
    ) -> Result<(Table, JoinReport)> {
        self.joiner.load_and_join(flights, loyalty)
    }

    /// Run the whole pipeline on two files and export the result.
    ///
    /// Nothing is written unless every step succeeds.
    pub fn run(
        &self,
        flights: impl AsRef<Path>,
        loyalty: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<CleanOutcome> {
        let (merged, join) = self.join_files(flights, loyalty)?;
        let mut outcome = self.clean_joined(merged, join)?;
        self.export(&mut outcome, output, None)?;
        Ok(outcome)
    }

    /// Run every step after loading on two in-memory tables.
    pub fn clean_tables(&self, flights: &Table, loyalty: &Table) -> Result<CleanOutcome> {
        let (merged, join) = self.joiner.join(flights, loyalty)?;
        self.clean_joined(merged, join)
    }

    /// Write the cleaned table and, optionally, the JSON run report.
    ///
    /// Both files are staged before either is published. If any write
    /// fails, neither file is left at its target path.
    pub fn export(
        &self,
        outcome: &mut CleanOutcome,
        output: impl AsRef<Path>,
        report: Option<&Path>,
    ) -> Result<()> {
        let output = output.as_ref();
        outcome.report.output = Some(output.to_path_buf());

        let result = self.publish(outcome, output, report);
        if result.is_err() {
            outcome.report.output = None;
        }
        result
    }

    fn publish(&self, outcome: &CleanOutcome, output: &Path, report: Option<&Path>) -> Result<()> {
        let staged_report = report.map(|path| stage_json(&outcome.report, path)).transpose()?;
        let staged_table = match stage_table(&outcome.table, output, self.config.output_delimiter) {
            Ok(staged) => staged,
            Err(e) => {
                staged_report.into_iter().for_each(StagedFile::discard);
                return Err(e);
            }
        };

        if let Some(staged_report) = staged_report {
            let report_path = staged_report.target().to_path_buf();
            if let Err(e) = staged_report.commit() {
                staged_table.discard();
                return Err(e);
            }
            if let Err(e) = staged_table.commit() {
                let _ = fs::remove_file(&report_path);
                return Err(e);
            }
            info!(path = %report_path.display(), "run report written");
        } else {
            staged_table.commit()?;
        }

        info!(
            path = %output.display(),
            rows = outcome.table.row_count(),
            columns = outcome.table.column_count(),
            "cleaned table exported"
        );
        Ok(())
    }

    /// Run every step after the join on an already merged table.
    pub fn clean_joined(&self, merged: Table, join: JoinReport) -> Result<CleanOutcome> {
        let config = &self.config;

        let (table, column_normalization) = normalize_columns(&merged);
        let (table, semantic_renames) = rename_semantic(&table, &config.rename_map);
        let (table, deduplication) = deduplicate(&table, config.keep);
        let (mut table, type_correction) = correct_types(&table, &config.dtype_map)?;

        let mut sanitization = Vec::with_capacity(config.sanitize_columns.len());
        for column in &config.sanitize_columns {
            let (sanitized, report) = nullify_negatives(&table, column)?;
            table = sanitized;
            sanitization.push(report);
        }

        let (table, imputation) = impute_grouped_median(&table, &config.imputation)?;
        let table = derive_status(&table, &config.status)?;
        let (table, categoricals) =
            clean_categoricals(&table, config.categorical_columns.as_deref())?;
        let consistency = check_consistency(&table, &config.consistency_rules);
        let (table, final_type_correction) = correct_types(&table, &config.dtype_map)?;

        info!(
            rows = table.row_count(),
            columns = table.column_count(),
            "cleaning finished"
        );

        let report = CleanReport {
            join,
            column_normalization,
            semantic_renames,
            deduplication,
            type_correction,
            sanitization,
            imputation,
            categoricals,
            consistency,
            final_type_correction,
            final_shape: table.shape(),
            output: None,
            finished_at: Utc::now(),
        };

        Ok(CleanOutcome { table, report })
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}
