//! Board command surface.
//!
//! `BoardController` is what a UI calls: every mutation checks the
//! acting user's role against the board document, applies the pure core
//! rule, and emits the resulting update to the store. Persistence
//! failures propagate to the caller; nothing here retries or rolls back.

use std::sync::Arc;

use crate::core::board::{Board, BoardId, Member, Role};
use crate::core::task::{Lane, SubtaskId, Task, TaskDraft, TaskId};
use crate::core::{subtasks, transition};
use crate::store::DocumentStore;
use crate::{klog, klog_debug, Error, Result};

/// Permission-gated operations on one board for one acting user.
pub struct BoardController {
    store: Arc<dyn DocumentStore>,
    board_id: BoardId,
    user: String,
}

impl BoardController {
    pub fn new(store: Arc<dyn DocumentStore>, board_id: BoardId, user: &str) -> Self {
        Self {
            store,
            board_id,
            user: user.to_string(),
        }
    }

    pub fn board_id(&self) -> BoardId {
        self.board_id
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Load the board, requiring view access.
    pub async fn board(&self) -> Result<Board> {
        let board = self.store.board(self.board_id).await?;
        if !board.can_view(&self.user) {
            return Err(self.denied("view board"));
        }
        Ok(board)
    }

    /// Load the full task set, requiring view access.
    pub async fn tasks(&self) -> Result<Vec<Task>> {
        self.board().await?;
        self.store.tasks(self.board_id).await
    }

    /// Load one task, requiring view access.
    pub async fn task(&self, id: TaskId) -> Result<Task> {
        self.board().await?;
        self.store.task(self.board_id, id).await
    }

    /// Create a task from a draft. Title must be non-empty.
    pub async fn create_task(&self, mut draft: TaskDraft) -> Result<Task> {
        self.require_edit("create task").await?;

        draft.title = draft.title.trim().to_string();
        if draft.title.is_empty() {
            return Err(Error::Validation("task title must not be empty".to_string()));
        }

        let task = Task::create(draft, &self.user);
        klog!(
            "Task {} created on board {} in lane {}",
            task.id.short(),
            self.board_id.short(),
            task.lane
        );
        self.store.put_task(self.board_id, task.clone()).await?;
        Ok(task)
    }

    /// Append a subtask. Returns false when the title was empty
    /// (silently ignored, nothing written).
    pub async fn add_subtask(&self, task_id: TaskId, title: &str) -> Result<bool> {
        self.require_edit("add subtask").await?;
        let task = self.store.task(self.board_id, task_id).await?;

        match subtasks::add(&task, title) {
            Some(patch) => {
                self.store.patch_task(self.board_id, task_id, patch).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Flip a subtask's done flag. Returns false for an unknown id.
    pub async fn toggle_subtask(&self, task_id: TaskId, subtask_id: SubtaskId) -> Result<bool> {
        self.require_edit("toggle subtask").await?;
        let task = self.store.task(self.board_id, task_id).await?;

        match subtasks::toggle(&task, subtask_id) {
            Some(patch) => {
                klog_debug!(
                    "Toggle subtask {} on task {}: progress {} -> {}",
                    subtask_id.short(),
                    task_id.short(),
                    task.progress,
                    patch.progress
                );
                self.store.patch_task(self.board_id, task_id, patch).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a subtask. Returns false for an unknown id.
    pub async fn remove_subtask(&self, task_id: TaskId, subtask_id: SubtaskId) -> Result<bool> {
        self.require_edit("remove subtask").await?;
        let task = self.store.task(self.board_id, task_id).await?;

        match subtasks::remove(&task, subtask_id) {
            Some(patch) => {
                self.store.patch_task(self.board_id, task_id, patch).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drop a task onto a lane. Returns false when it was already there.
    pub async fn move_task(&self, task_id: TaskId, target: Lane) -> Result<bool> {
        self.require_edit("move task").await?;
        let task = self.store.task(self.board_id, task_id).await?;

        match transition::move_to_lane(&task, target) {
            Some(patch) => {
                klog!("Task {} moved {} -> {}", task_id.short(), task.lane, target);
                self.store.patch_task(self.board_id, task_id, patch).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Manually set progress on a subtask-less task. Returns false when
    /// nothing changed (checklist-driven task or same value).
    pub async fn set_task_progress(&self, task_id: TaskId, value: u8) -> Result<bool> {
        self.require_edit("set progress").await?;
        let task = self.store.task(self.board_id, task_id).await?;

        match transition::set_progress(&task, value) {
            Some(patch) => {
                self.store.patch_task(self.board_id, task_id, patch).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Assign the task to a board member, or clear the assignment.
    pub async fn assign_task(&self, task_id: TaskId, assignee: Option<&str>) -> Result<()> {
        let board = self.require_edit("assign task").await?;
        self.store.task(self.board_id, task_id).await?;

        match assignee {
            Some(uid) => {
                if !board.is_owner(uid) && board.member(uid).is_none() {
                    return Err(Error::MemberNotFound(uid.to_string()));
                }
                self.store
                    .assign_task(
                        self.board_id,
                        task_id,
                        Some(uid.to_string()),
                        Some(uid.to_string()),
                    )
                    .await
            }
            None => {
                self.store
                    .assign_task(self.board_id, task_id, None, None)
                    .await
            }
        }
    }

    /// Delete a task after confirmation.
    ///
    /// The confirmation capability is injected by the caller (interactive
    /// prompt, `-y` flag, test constant); a declined confirmation leaves
    /// the task untouched and returns false.
    pub async fn delete_task<F>(&self, task_id: TaskId, confirm: F) -> Result<bool>
    where
        F: FnOnce(&Task) -> bool,
    {
        self.require_edit("delete task").await?;
        let task = self.store.task(self.board_id, task_id).await?;

        if !confirm(&task) {
            klog_debug!("Delete of task {} declined", task_id.short());
            return Ok(false);
        }

        klog!("Task {} deleted from board {}", task_id.short(), self.board_id.short());
        self.store.delete_task(self.board_id, task_id).await?;
        Ok(true)
    }

    /// Invite a member. Owner only; duplicates are rejected.
    pub async fn add_member(&self, uid: &str, role: Role) -> Result<()> {
        let mut board = self.require_owner("add member").await?;
        board.add_member(Member::new(uid, role))?;
        klog!("Member {} added to board {} as {}", uid, self.board_id.short(), role);
        self.store.put_board(board).await
    }

    /// Remove an invited member. Owner only.
    pub async fn remove_member(&self, uid: &str) -> Result<()> {
        let mut board = self.require_owner("remove member").await?;
        board.remove_member(uid)?;
        self.store.put_board(board).await
    }

    async fn require_edit(&self, action: &str) -> Result<Board> {
        let board = self.store.board(self.board_id).await?;
        if !board.can_edit(&self.user) {
            return Err(self.denied(action));
        }
        Ok(board)
    }

    async fn require_owner(&self, action: &str) -> Result<Board> {
        let board = self.store.board(self.board_id).await?;
        if !board.is_owner(&self.user) {
            return Err(self.denied(action));
        }
        Ok(board)
    }

    fn denied(&self, action: &str) -> Error {
        Error::PermissionDenied {
            user: self.user.clone(),
            action: action.to_string(),
        }
    }
}
