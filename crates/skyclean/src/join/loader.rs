//! Load two source files and merge them on a detected key.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::input::{Parser, ParserConfig, SourceMetadata};
use crate::table::Table;

use super::key::{Correspondence, common_columns, correspondence, detect_join_key};
use super::merge::merge;
use super::strategy::JoinStrategy;

/// How two tables will be (or were) joined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinPlan {
    /// Every column name shared by both tables, sorted.
    pub common_columns: Vec<String>,
    /// The selected join key.
    pub key: String,
    /// Key correspondence scores.
    pub correspondence: Correspondence,
    /// Strategy chosen from the scores.
    pub strategy: JoinStrategy,
}

impl JoinPlan {
    /// Detect the key, score it and pick a strategy.
    pub fn for_tables(left: &Table, right: &Table) -> Result<Self> {
        let key = detect_join_key(left, right)?;
        let correspondence = correspondence(left, right, &key)?;
        Ok(Self {
            common_columns: common_columns(left, right),
            strategy: JoinStrategy::from_correspondence(&correspondence),
            key,
            correspondence,
        })
    }
}

/// Summary of a load-and-join step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinReport {
    /// Metadata of the left (flight activity) file, when loaded from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_source: Option<SourceMetadata>,
    /// Metadata of the right (loyalty history) file, when loaded from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_source: Option<SourceMetadata>,
    /// `(rows, columns)` of the left table.
    pub left_shape: (usize, usize),
    /// `(rows, columns)` of the right table.
    pub right_shape: (usize, usize),
    pub plan: JoinPlan,
    /// `(rows, columns)` of the merged table.
    pub result_shape: (usize, usize),
}

/// Loads source files and joins them.
pub struct Joiner {
    parser: Parser,
    suffixes: (String, String),
}

impl Joiner {
    pub fn new(parser_config: ParserConfig, suffixes: (String, String)) -> Self {
        Self {
            parser: Parser::with_config(parser_config),
            suffixes,
        }
    }

    /// Read a delimited file into a typed table.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        let (raw, source) = self.parser.parse_file(path)?;
        Ok((Table::from_raw(&raw), source))
    }

    /// Load both files, then plan and perform the join.
    pub fn load_and_join(
        &self,
        left_path: impl AsRef<Path>,
        right_path: impl AsRef<Path>,
    ) -> Result<(Table, JoinReport)> {
        let (left, left_source) = self.load(left_path)?;
        let (right, right_source) = self.load(right_path)?;

        let (merged, mut report) = self.join(&left, &right)?;
        report.left_source = Some(left_source);
        report.right_source = Some(right_source);
        Ok((merged, report))
    }

    /// Plan and perform the join of two in-memory tables.
    pub fn join(&self, left: &Table, right: &Table) -> Result<(Table, JoinReport)> {
        let plan = JoinPlan::for_tables(left, right)?;

        info!(
            key = %plan.key,
            common = ?plan.common_columns,
            match_left = plan.correspondence.match_left,
            match_right = plan.correspondence.match_right,
            strategy = %plan.strategy,
            "join plan selected: {}",
            plan.strategy.rationale()
        );

        let merged = merge(
            left,
            right,
            &plan.key,
            plan.strategy,
            (&self.suffixes.0, &self.suffixes.1),
        )?;

        info!(
            rows = merged.row_count(),
            columns = merged.column_count(),
            "merged datasets ({})",
            plan.strategy
        );

        let report = JoinReport {
            left_source: None,
            right_source: None,
            left_shape: left.shape(),
            right_shape: right.shape(),
            result_shape: merged.shape(),
            plan,
        };

        Ok((merged, report))
    }
}
