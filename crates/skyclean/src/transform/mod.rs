//! Table transformations. Each takes a borrowed table and returns a new one.

mod cast;
mod categorical;
mod columns;
mod dedup;
mod impute;
mod sanitize;
mod status;

pub use cast::{TypeChange, TypeReport, cast_value, correct_types};
pub use categorical::{CategoricalReport, clean_categoricals, title_case};
pub use columns::{
    ColumnRename, RenameReport, normalize_column_name, normalize_column_names, normalize_columns,
    rename_semantic,
};
pub use dedup::{DedupReport, KeepPolicy, deduplicate};
pub use impute::{ImputationConfig, ImputeReport, TierFill, impute_grouped_median, median};
pub use sanitize::{SanitizeReport, nullify_negatives};
pub use status::{CustomerStatus, StatusConfig, derive_status};
