use std::fmt;
use std::time::Duration;

use gridbench_core::Point;

/// Why a start or goal cell was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum QueryFault {
    OutOfBounds,
    Blocked,
}

impl fmt::Display for QueryFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => f.write_str("outside the grid"),
            Self::Blocked => f.write_str("on a blocked cell"),
        }
    }
}

/// Errors from a single search.
///
/// An unreachable goal is not an error: it is reported as an infinite cost.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The start or goal cannot be searched from or to.
    #[error("invalid query endpoint {pos}: {reason}")]
    InvalidQuery { pos: Point, reason: QueryFault },
    /// The search ran longer than its time budget.
    #[error("search exceeded its time budget of {budget:?}")]
    Timeout { budget: Duration },
}
