//! skyclean: join and clean airline loyalty datasets.
//!
//! Two delimited files (monthly flight activity and customer loyalty
//! history) are loaded, merged on their shared key with a join strategy
//! chosen from key correspondence, and passed through a fixed sequence of
//! cleaning steps before export.
//!
//! # Pipeline
//!
//! 1. Load both files and detect the join key
//! 2. Score key correspondence and pick inner/left/right/outer
//! 3. Normalize column names and apply semantic renames
//! 4. Drop exact duplicate rows
//! 5. Correct column types
//! 6. Turn negative salaries into missing values
//! 7. Impute salaries from grouped medians
//! 8. Derive customer status, tidy categorical text
//! 9. Count logical inconsistencies and export
//!
//! # Example
//!
//! ```no_run
//! use skyclean::Cleaner;
//!
//! let cleaner = Cleaner::new();
//! let outcome = cleaner
//!     .run(
//!         "data/raw/Customer Flight Activity.csv",
//!         "data/raw/Customer Loyalty History.csv",
//!         "data/processed/customer_loyalty_clean.csv",
//!     )
//!     .unwrap();
//!
//! println!("Join strategy: {}", outcome.report.join.plan.strategy);
//! println!("Rows written: {}", outcome.table.row_count());
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod join;
pub mod output;
pub mod table;
pub mod transform;
pub mod validation;

mod cleaner;

pub use crate::cleaner::{CleanOutcome, CleanReport, Cleaner};
pub use config::CleanerConfig;
pub use error::{CleanError, Result};
pub use input::{Parser, ParserConfig, RawTable, SourceMetadata};
pub use join::{Correspondence, JoinPlan, JoinReport, JoinStrategy};
pub use table::{ColumnType, Table, Value};
pub use validation::{ConsistencyReport, ConsistencyRule};
