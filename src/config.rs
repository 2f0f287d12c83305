//! Per-phase sort configuration
//!
//! One [`SortPolicy`] governs the grouping of map output and another,
//! independent one governs the grouping of reduce output. Policies are
//! fixed at task construction and read-only for the duration of a run.

use serde::{Deserialize, Serialize};

/// Sort switches for one partition pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortPolicy {
    /// Master switch. When `false`, every group keeps arrival order no
    /// matter what shape the records have.
    pub enabled: bool,
    /// Include the value in the effective sort key. For pair records this
    /// is the only way sorting happens at all; for triple records the
    /// value breaks ties after the sort element.
    pub with_value: bool,
    /// Reverse the stably-sorted ascending order. Applied after the
    /// stable sort, so ties keep a deterministic order.
    pub reverse: bool,
}

impl Default for SortPolicy {
    fn default() -> Self {
        SortPolicy {
            enabled: true,
            with_value: false,
            reverse: false,
        }
    }
}

impl SortPolicy {
    /// Arrival order everywhere, regardless of record shape.
    pub fn disabled() -> Self {
        SortPolicy {
            enabled: false,
            ..SortPolicy::default()
        }
    }

    /// Sort by value for pairs, and by `(sort, value)` for triples.
    pub fn by_value() -> Self {
        SortPolicy {
            with_value: true,
            ..SortPolicy::default()
        }
    }

    /// Descending variant of this policy.
    pub fn reversed(self) -> Self {
        SortPolicy {
            reverse: true,
            ..self
        }
    }
}
