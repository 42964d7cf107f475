//! Pure domain logic: boards, tasks, and the progress/lane rules.
//!
//! Nothing in this module performs I/O. Mutation rules take task values
//! and return the partial update to persist; the store applies it.

pub mod board;
pub mod progress;
pub mod subtasks;
pub mod task;
pub mod transition;
