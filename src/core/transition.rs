//! Lane transitions (card drops) and manual progress.
//!
//! Dropping a card on a lane is the one escape hatch from subtask-driven
//! derivation: it sets the lane explicitly and adjusts progress (and, for
//! the done lane, the subtasks themselves) to keep the card consistent.

use crate::core::progress;
use crate::core::task::{Lane, Subtask, Task, TaskPatch};

/// Reserved minimum so a fresh in-progress task never displays as 0% or
/// 100%, which would collide with the todo/done boundaries.
const IN_PROGRESS_FLOOR: u8 = 1;

/// Compute the update for dropping a task onto a lane.
///
/// Returns `None` when the task is already in the target lane. Dropping
/// onto done force-completes every subtask so the derived view stays
/// consistent with the manual override.
pub fn move_to_lane(task: &Task, target: Lane) -> Option<TaskPatch> {
    if task.lane == target {
        return None;
    }

    let patch = match target {
        Lane::Todo => TaskPatch::new(0, Lane::Todo),
        Lane::Done => {
            if task.has_subtasks() {
                let forced: Vec<Subtask> = task
                    .subtasks
                    .iter()
                    .map(|s| {
                        let mut done = s.clone();
                        done.done = true;
                        done
                    })
                    .collect();
                TaskPatch::with_subtasks(forced, 100, Lane::Done)
            } else {
                TaskPatch::new(100, Lane::Done)
            }
        }
        Lane::InProgress => {
            let progress = if task.progress > 0 && task.progress < 100 {
                task.progress
            } else {
                IN_PROGRESS_FLOOR
            };
            TaskPatch::new(progress, Lane::InProgress)
        }
    };

    Some(patch)
}

/// Compute the update for a manual progress change (the card slider).
///
/// Only a task with no subtasks is manually adjustable; for one with a
/// checklist the slider is inert and no update is emitted. The value is
/// clamped to [0,100] and the lane follows the three-way partition.
pub fn set_progress(task: &Task, value: u8) -> Option<TaskPatch> {
    if task.has_subtasks() {
        return None;
    }

    let progress = value.min(100);
    if progress == task.progress {
        return None;
    }

    Some(TaskPatch::new(progress, progress::lane_for(progress)))
}
