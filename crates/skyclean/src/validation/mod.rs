//! Diagnostic checks that never modify data.

mod consistency;

pub use consistency::{CheckResult, ConsistencyReport, ConsistencyRule, check_consistency};
