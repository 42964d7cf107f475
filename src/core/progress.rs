//! The progress/lane derivation rule.
//!
//! This is the canonical rule keeping a task's lane membership and its
//! displayed completion percentage consistent: subtask completion counts
//! map to a percentage, and the percentage maps to the unique lane for
//! it (100 is done, 0 is todo, anything between is in-progress).

use crate::core::task::{Lane, Subtask};

/// Completion percentage of a subtask list, or `None` when it is empty.
///
/// Rounds half-up on the percentage, no special-casing for ties.
pub fn percent_complete(subtasks: &[Subtask]) -> Option<u8> {
    if subtasks.is_empty() {
        return None;
    }
    let done = subtasks.iter().filter(|s| s.done).count();
    Some(round_percent(done, subtasks.len()))
}

/// The lane implied by a completion percentage.
pub fn lane_for(progress: u8) -> Lane {
    if progress == 100 {
        Lane::Done
    } else if progress > 0 {
        Lane::InProgress
    } else {
        Lane::Todo
    }
}

/// Derive `(progress, lane)` from a subtask list.
///
/// An empty list carries no information, so the fallbacks pass through
/// unchanged; otherwise the derived percentage and its implied lane win.
/// Total over its inputs, no error conditions.
pub fn derive(subtasks: &[Subtask], fallback_progress: u8, fallback_lane: Lane) -> (u8, Lane) {
    match percent_complete(subtasks) {
        Some(progress) => (progress, lane_for(progress)),
        None => (fallback_progress, fallback_lane),
    }
}

/// `round(100 * done / total)`, half-up, as an exact integer computation.
fn round_percent(done: usize, total: usize) -> u8 {
    debug_assert!(total > 0);
    ((200 * done + total) / (2 * total)) as u8
}
