//! JSON-file-backed document store.
//!
//! Wraps [`MemoryStore`] semantics with durable state: the whole data
//! set is loaded on open and rewritten atomically after every mutation
//! (tmp file + rename, with a `.bak` copy of the previous state).

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::core::board::{Board, BoardId};
use crate::core::task::{Task, TaskId, TaskPatch};
use crate::store::{DocumentStore, MemoryStore, TaskSnapshot};
use crate::util::blocking;
use crate::{klog_debug, Result};

const STATE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct BoardRecord {
    board: Board,
    tasks: Vec<Task>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedState {
    version: u32,
    boards: Vec<BoardRecord>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            boards: Vec::new(),
        }
    }
}

/// [`DocumentStore`] persisted as a single JSON file.
pub struct FileStore {
    path: PathBuf,
    mem: MemoryStore,
}

impl FileStore {
    /// Open (or create) the store at the given path.
    pub async fn open(path: &Path) -> Result<Self> {
        let state = {
            let path = path.to_path_buf();
            blocking(move || {
                if !path.exists() {
                    klog_debug!("FileStore: no state file, starting empty");
                    return Ok(PersistedState::default());
                }
                let contents = fs::read_to_string(&path)?;
                let state: PersistedState = serde_json::from_str(&contents)?;
                klog_debug!("FileStore: loaded {} boards", state.boards.len());
                Ok(state)
            })
            .await?
        };

        let mem = MemoryStore::new();
        for record in state.boards {
            let board_id = record.board.id;
            mem.put_board(record.board).await?;
            for task in record.tasks {
                mem.put_task(board_id, task).await?;
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            mem,
        })
    }

    /// Rewrite the state file from the in-memory data set.
    async fn persist(&self) -> Result<()> {
        let mut records = Vec::new();
        for board in self.mem.boards().await? {
            let tasks = self.mem.tasks(board.id).await?;
            records.push(BoardRecord { board, tasks });
        }
        let state = PersistedState {
            version: STATE_VERSION,
            boards: records,
        };
        let contents = serde_json::to_string_pretty(&state)?;

        let path = self.path.clone();
        blocking(move || {
            if let Some(parent) = path.parent() {
                if !parent.exists() {
                    fs::create_dir_all(parent)?;
                }
            }

            if path.exists() {
                let backup_path = path.with_extension("json.bak");
                fs::copy(&path, &backup_path)?;
            }

            let temp_path = path.with_extension("json.tmp");
            fs::write(&temp_path, &contents)?;
            fs::rename(&temp_path, &path)?;
            klog_debug!("FileStore: state saved to {}", path.display());

            Ok(())
        })
        .await
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn put_board(&self, board: Board) -> Result<()> {
        self.mem.put_board(board).await?;
        self.persist().await
    }

    async fn board(&self, id: BoardId) -> Result<Board> {
        self.mem.board(id).await
    }

    async fn boards(&self) -> Result<Vec<Board>> {
        self.mem.boards().await
    }

    async fn delete_board(&self, id: BoardId) -> Result<()> {
        self.mem.delete_board(id).await?;
        self.persist().await
    }

    async fn put_task(&self, board_id: BoardId, task: Task) -> Result<()> {
        self.mem.put_task(board_id, task).await?;
        self.persist().await
    }

    async fn task(&self, board_id: BoardId, id: TaskId) -> Result<Task> {
        self.mem.task(board_id, id).await
    }

    async fn tasks(&self, board_id: BoardId) -> Result<TaskSnapshot> {
        self.mem.tasks(board_id).await
    }

    async fn patch_task(&self, board_id: BoardId, id: TaskId, patch: TaskPatch) -> Result<()> {
        self.mem.patch_task(board_id, id, patch).await?;
        self.persist().await
    }

    async fn assign_task(
        &self,
        board_id: BoardId,
        id: TaskId,
        uid: Option<String>,
        name: Option<String>,
    ) -> Result<()> {
        self.mem.assign_task(board_id, id, uid, name).await?;
        self.persist().await
    }

    async fn delete_task(&self, board_id: BoardId, id: TaskId) -> Result<()> {
        self.mem.delete_task(board_id, id).await?;
        self.persist().await
    }

    async fn subscribe(&self, board_id: BoardId) -> Result<broadcast::Receiver<TaskSnapshot>> {
        self.mem.subscribe(board_id).await
    }
}
