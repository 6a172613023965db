//! Named configuration tables consumed by the pipeline steps.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::input::ParserConfig;
use crate::table::ColumnType;
use crate::transform::{ImputationConfig, KeepPolicy, StatusConfig};
use crate::validation::ConsistencyRule;

/// Default input file with monthly flight activity per customer.
pub const DEFAULT_FLIGHTS_PATH: &str = "data/raw/Customer Flight Activity.csv";
/// Default input file with one loyalty history record per customer.
pub const DEFAULT_LOYALTY_PATH: &str = "data/raw/Customer Loyalty History.csv";
/// Default location of the cleaned export.
pub const DEFAULT_OUTPUT_PATH: &str = "data/processed/customer_loyalty_clean.csv";

/// Configuration for a cleaning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanerConfig {
    /// Parser configuration for both inputs.
    pub parser: ParserConfig,
    /// Suffixes for non-key columns present on both sides of the merge.
    pub merge_suffixes: (String, String),
    /// Renames applied after column name normalization.
    pub rename_map: IndexMap<String, String>,
    /// Which duplicate occurrence survives.
    pub keep: KeepPolicy,
    /// Target types per column.
    pub dtype_map: IndexMap<String, ColumnType>,
    /// Columns whose negative values are invalid.
    pub sanitize_columns: Vec<String>,
    pub imputation: ImputationConfig,
    pub status: StatusConfig,
    /// Categorical columns to tidy (None = every text column).
    pub categorical_columns: Option<Vec<String>>,
    pub consistency_rules: Vec<ConsistencyRule>,
    /// Delimiter of the exported file.
    pub output_delimiter: u8,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            merge_suffixes: ("_x".to_string(), "_y".to_string()),
            rename_map: default_rename_map(),
            keep: KeepPolicy::First,
            dtype_map: default_dtype_map(),
            sanitize_columns: vec!["salary".to_string()],
            imputation: ImputationConfig::default(),
            status: StatusConfig::default(),
            categorical_columns: None,
            consistency_rules: ConsistencyRule::flight_defaults(),
            output_delimiter: b',',
        }
    }
}

/// `year`, `month` and `clv` are ambiguous once both datasets are merged.
pub fn default_rename_map() -> IndexMap<String, String> {
    [
        ("year", "flight_year"),
        ("month", "flight_month"),
        ("clv", "customer_lifetime_value"),
    ]
    .into_iter()
    .map(|(from, to)| (from.to_string(), to.to_string()))
    .collect()
}

pub fn default_dtype_map() -> IndexMap<String, ColumnType> {
    [
        ("cancellation_year", ColumnType::NullableInteger),
        ("cancellation_month", ColumnType::NullableInteger),
        ("points_accumulated", ColumnType::Integer),
        ("distance", ColumnType::Float),
        ("dollar_cost_points_redeemed", ColumnType::Float),
    ]
    .into_iter()
    .map(|(column, dtype)| (column.to_string(), dtype))
    .collect()
}
