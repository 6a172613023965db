//! Join strategy selection from correspondence scores.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::key::Correspondence;

/// Relational join semantics used for the merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinStrategy {
    /// Rows present in both tables.
    Inner,
    /// Every left row plus its matches.
    Left,
    /// Every right row plus its matches.
    Right,
    /// Union of both sides.
    Outer,
}

impl JoinStrategy {
    /// Choose the strategy for a pair of match percentages.
    ///
    /// A side at 100% has every key covered by the other side, so only the
    /// incomplete side needs all of its rows preserved.
    pub fn select(match_left: f64, match_right: f64) -> Self {
        let left_full = match_left >= 100.0;
        let right_full = match_right >= 100.0;
        match (left_full, right_full) {
            (true, true) => JoinStrategy::Inner,
            (false, true) => JoinStrategy::Left,
            (true, false) => JoinStrategy::Right,
            (false, false) => JoinStrategy::Outer,
        }
    }

    pub fn from_correspondence(c: &Correspondence) -> Self {
        Self::select(c.match_left, c.match_right)
    }

    /// Short explanation of why this strategy applies.
    pub fn rationale(&self) -> &'static str {
        match self {
            JoinStrategy::Inner => "full key correspondence",
            JoinStrategy::Left => "left dataset has keys without a match",
            JoinStrategy::Right => "right dataset has keys without a match",
            JoinStrategy::Outer => "partial correspondence on both sides",
        }
    }
}

impl fmt::Display for JoinStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JoinStrategy::Inner => "inner",
            JoinStrategy::Left => "left",
            JoinStrategy::Right => "right",
            JoinStrategy::Outer => "outer",
        };
        f.write_str(name)
    }
}
