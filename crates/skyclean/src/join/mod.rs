//! Join key detection, correspondence analysis, strategy selection and merge.

mod key;
mod loader;
mod merge;
mod strategy;

pub use key::{Correspondence, common_columns, correspondence, detect_join_key};
pub use loader::{JoinPlan, JoinReport, Joiner};
pub use merge::merge;
pub use strategy::JoinStrategy;
