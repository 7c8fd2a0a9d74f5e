//! Build-time structure reporting and per-state activity history.
//!
//! Both views are sized at construction and refreshed at the end of every
//! tick; reading them never walks the tree or allocates.

use serde::{Deserialize, Serialize};

/// One row of the structure report, in depth-first (enter) order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StructureEntry {
    /// Nesting depth; the root region's head is at depth 0.
    pub depth: usize,
    /// Display name of the state.
    pub name: &'static str,
    /// Whether the state was active at the end of the last tick.
    pub is_active: bool,
}

/// Sizes derived from the tree shape at build time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeMetrics {
    /// Number of states, heads included.
    pub state_count: usize,
    /// Number of regions (composite and orthogonal alike).
    pub fork_count: usize,
    /// Upper bound on simultaneously active leaves; reporting only.
    pub deep_width: usize,
    /// Height of the tree.
    pub reverse_depth: usize,
}

/// Advances one state's rolling activity counter.
///
/// The counter stays positive while the state is active and negative while
/// inactive, saturating in both directions, so a glance at the history shows
/// for roughly how many ticks each state has been in its current phase.
pub(crate) fn advance_activity(counter: i8, is_active: bool) -> i8 {
    if is_active {
        if counter > 0 {
            counter.saturating_add(1)
        } else {
            1
        }
    } else if counter < 0 {
        counter.saturating_sub(1)
    } else {
        -1
    }
}
