//! Document store abstraction.
//!
//! Boards and their task collections live behind this trait. Writers
//! emit whole documents or typed patches; every change fans out the
//! full current task set of the affected board to all subscribers, so
//! a viewer never has to reconcile partial deltas. Last write wins at
//! the document level; there is no merge rule.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::core::board::{Board, BoardId};
use crate::core::task::{Task, TaskId, TaskPatch};
use crate::Result;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Full current task set for one board, sorted by creation time.
pub type TaskSnapshot = Vec<Task>;

/// Persistence seam for boards and tasks.
///
/// All operations are asynchronous; callers treat writes as
/// fire-and-forget apart from surfacing errors to the user.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Write a board document (create or overwrite whole).
    async fn put_board(&self, board: Board) -> Result<()>;

    /// Read one board document.
    async fn board(&self, id: BoardId) -> Result<Board>;

    /// List all board documents.
    async fn boards(&self) -> Result<Vec<Board>>;

    /// Delete a board and its entire task collection.
    async fn delete_board(&self, id: BoardId) -> Result<()>;

    /// Write a task document (create or overwrite whole).
    async fn put_task(&self, board_id: BoardId, task: Task) -> Result<()>;

    /// Read one task document.
    async fn task(&self, board_id: BoardId, id: TaskId) -> Result<Task>;

    /// Read a board's full task collection, sorted by creation time.
    async fn tasks(&self, board_id: BoardId) -> Result<TaskSnapshot>;

    /// Apply a progress/lane/subtasks patch to a task.
    async fn patch_task(&self, board_id: BoardId, id: TaskId, patch: TaskPatch) -> Result<()>;

    /// Set or clear a task's assignment.
    async fn assign_task(
        &self,
        board_id: BoardId,
        id: TaskId,
        uid: Option<String>,
        name: Option<String>,
    ) -> Result<()>;

    /// Delete a task document outright (no tombstone).
    async fn delete_task(&self, board_id: BoardId, id: TaskId) -> Result<()>;

    /// Subscribe to a board's task collection.
    ///
    /// The receiver gets the full current task set after every change by
    /// any writer. It does not replay the current state; seed the viewer
    /// with [`DocumentStore::tasks`] first.
    async fn subscribe(&self, board_id: BoardId) -> Result<broadcast::Receiver<TaskSnapshot>>;
}
