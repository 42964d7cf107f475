//! Test fixtures for integration tests.
//!
//! Provides a board with a standard cast (owner, editor, viewer) over an
//! in-memory store, plus task/subtask builders.

use std::sync::Arc;

use kanso::controller::BoardController;
use kanso::core::board::{Board, BoardId, Member, Role};
use kanso::core::task::{Subtask, TaskDraft};
use kanso::store::{DocumentStore, MemoryStore};

pub const OWNER: &str = "owner@example.com";
pub const EDITOR: &str = "editor@example.com";
pub const VIEWER: &str = "viewer@example.com";

/// A board on an in-memory store with the standard cast of users.
pub struct TestBoard {
    pub store: Arc<MemoryStore>,
    pub board_id: BoardId,
}

impl TestBoard {
    /// Create a board owned by [`OWNER`] with an editor and a viewer.
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let mut board = Board::create("Test board", "Integration fixtures", OWNER);
        board.add_member(Member::new(EDITOR, Role::Editor)).unwrap();
        board.add_member(Member::new(VIEWER, Role::Viewer)).unwrap();
        let board_id = board.id;
        store.put_board(board).await.unwrap();
        Self { store, board_id }
    }

    /// A controller acting as the given user.
    pub fn as_user(&self, user: &str) -> BoardController {
        BoardController::new(self.store.clone(), self.board_id, user)
    }

    /// A controller acting as the board owner.
    pub fn owner(&self) -> BoardController {
        self.as_user(OWNER)
    }
}

/// A draft with just a title, everything else defaulted.
pub fn draft(title: &str) -> TaskDraft {
    TaskDraft {
        title: title.to_string(),
        ..Default::default()
    }
}

/// A draft carrying initial subtasks with the given done flags.
pub fn draft_with_subtasks(title: &str, done_flags: &[bool]) -> TaskDraft {
    let subtasks = done_flags
        .iter()
        .enumerate()
        .map(|(i, &done)| {
            let mut s = Subtask::new(&format!("step {}", i + 1));
            s.done = done;
            s
        })
        .collect();
    TaskDraft {
        title: title.to_string(),
        subtasks,
        ..Default::default()
    }
}
