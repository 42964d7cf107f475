//! Subtask mutations on a task's checklist.
//!
//! Each operation builds the new subtask list, re-derives progress and
//! lane, and returns the partial update to persist. No I/O happens here;
//! the caller hands the patch to the store.

use crate::core::progress;
use crate::core::task::{Lane, Subtask, SubtaskId, Task, TaskPatch};

/// Fallbacks used when the resulting list carries no information.
///
/// A done task keeps rendering complete unless its subtasks contradict
/// it, so done falls back to 100 rather than the stored progress.
fn fallbacks(task: &Task) -> (u8, Lane) {
    let progress = if task.lane == Lane::Done {
        100
    } else {
        task.progress
    };
    (progress, task.lane)
}

/// Append a new unchecked subtask with the given title.
///
/// Empty or whitespace-only titles are silently ignored (no update).
pub fn add(task: &Task, title: &str) -> Option<TaskPatch> {
    let title = title.trim();
    if title.is_empty() {
        return None;
    }

    let mut updated = task.subtasks.clone();
    updated.push(Subtask::new(title));

    let (fallback_progress, fallback_lane) = fallbacks(task);
    let (progress, lane) = progress::derive(&updated, fallback_progress, fallback_lane);
    Some(TaskPatch::with_subtasks(updated, progress, lane))
}

/// Flip `done` on the matching subtask and re-derive.
///
/// Returns `None` when no subtask has the given id.
pub fn toggle(task: &Task, subtask_id: SubtaskId) -> Option<TaskPatch> {
    if task.subtask(subtask_id).is_none() {
        return None;
    }

    let updated: Vec<Subtask> = task
        .subtasks
        .iter()
        .map(|s| {
            if s.id == subtask_id {
                let mut flipped = s.clone();
                flipped.done = !flipped.done;
                flipped
            } else {
                s.clone()
            }
        })
        .collect();

    let (fallback_progress, fallback_lane) = fallbacks(task);
    let (progress, lane) = progress::derive(&updated, fallback_progress, fallback_lane);
    Some(TaskPatch::with_subtasks(updated, progress, lane))
}

/// Remove the matching subtask.
///
/// Returns `None` when no subtask has the given id. Removing the last
/// subtask does not recompute: the emptied list is persisted with the
/// task's previous progress and lane, reverting it to manual control.
pub fn remove(task: &Task, subtask_id: SubtaskId) -> Option<TaskPatch> {
    if task.subtask(subtask_id).is_none() {
        return None;
    }

    let updated: Vec<Subtask> = task
        .subtasks
        .iter()
        .filter(|s| s.id != subtask_id)
        .cloned()
        .collect();

    if updated.is_empty() {
        return Some(TaskPatch::with_subtasks(updated, task.progress, task.lane));
    }

    let (fallback_progress, fallback_lane) = fallbacks(task);
    let (progress, lane) = progress::derive(&updated, fallback_progress, fallback_lane);
    Some(TaskPatch::with_subtasks(updated, progress, lane))
}
