//! In-process document store.
//!
//! One slot per board holds the board document, its task collection,
//! and the broadcast channel fanning full snapshots out to subscribers.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};

use crate::core::board::{Board, BoardId};
use crate::core::task::{Task, TaskId, TaskPatch};
use crate::store::{DocumentStore, TaskSnapshot};
use crate::{klog_debug, Error, Result};

/// Dropped snapshots are harmless: every message is full state, so a
/// lagged subscriber catches up on the next one.
const SNAPSHOT_CHANNEL_CAPACITY: usize = 16;

struct BoardSlot {
    board: Board,
    tasks: HashMap<TaskId, Task>,
    snapshots: broadcast::Sender<TaskSnapshot>,
}

impl BoardSlot {
    fn new(board: Board) -> Self {
        let (snapshots, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        Self {
            board,
            tasks: HashMap::new(),
            snapshots,
        }
    }

    /// Current task set sorted by creation time (lane sort key).
    fn snapshot(&self) -> TaskSnapshot {
        let mut tasks: Vec<Task> = self.tasks.values().cloned().collect();
        tasks.sort_by_key(|t| (t.created_at, t.id.0));
        tasks
    }

    fn notify(&self) {
        // No subscribers is fine; send only fails when none exist.
        let _ = self.snapshots.send(self.snapshot());
    }
}

/// In-memory [`DocumentStore`].
#[derive(Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<BoardId, BoardSlot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn put_board(&self, board: Board) -> Result<()> {
        let mut slots = self.slots.write().await;
        match slots.get_mut(&board.id) {
            Some(slot) => slot.board = board,
            None => {
                klog_debug!("MemoryStore: new board {}", board.id.short());
                slots.insert(board.id, BoardSlot::new(board));
            }
        }
        Ok(())
    }

    async fn board(&self, id: BoardId) -> Result<Board> {
        let slots = self.slots.read().await;
        slots
            .get(&id)
            .map(|slot| slot.board.clone())
            .ok_or(Error::BoardNotFound(id))
    }

    async fn boards(&self) -> Result<Vec<Board>> {
        let slots = self.slots.read().await;
        let mut boards: Vec<Board> = slots.values().map(|s| s.board.clone()).collect();
        boards.sort_by_key(|b| b.created_at);
        Ok(boards)
    }

    async fn delete_board(&self, id: BoardId) -> Result<()> {
        let mut slots = self.slots.write().await;
        // Dropping the slot closes the snapshot channel for subscribers.
        slots.remove(&id).ok_or(Error::BoardNotFound(id))?;
        Ok(())
    }

    async fn put_task(&self, board_id: BoardId, task: Task) -> Result<()> {
        let mut slots = self.slots.write().await;
        let slot = slots
            .get_mut(&board_id)
            .ok_or(Error::BoardNotFound(board_id))?;
        klog_debug!(
            "MemoryStore: put task {} on board {}",
            task.id.short(),
            board_id.short()
        );
        slot.tasks.insert(task.id, task);
        slot.notify();
        Ok(())
    }

    async fn task(&self, board_id: BoardId, id: TaskId) -> Result<Task> {
        let slots = self.slots.read().await;
        let slot = slots.get(&board_id).ok_or(Error::BoardNotFound(board_id))?;
        slot.tasks.get(&id).cloned().ok_or(Error::TaskNotFound(id))
    }

    async fn tasks(&self, board_id: BoardId) -> Result<TaskSnapshot> {
        let slots = self.slots.read().await;
        let slot = slots.get(&board_id).ok_or(Error::BoardNotFound(board_id))?;
        Ok(slot.snapshot())
    }

    async fn patch_task(&self, board_id: BoardId, id: TaskId, patch: TaskPatch) -> Result<()> {
        let mut slots = self.slots.write().await;
        let slot = slots
            .get_mut(&board_id)
            .ok_or(Error::BoardNotFound(board_id))?;
        let task = slot.tasks.get_mut(&id).ok_or(Error::TaskNotFound(id))?;
        klog_debug!(
            "MemoryStore: patch task {} progress={} lane={}",
            id.short(),
            patch.progress,
            patch.lane
        );
        task.apply_patch(&patch);
        slot.notify();
        Ok(())
    }

    async fn assign_task(
        &self,
        board_id: BoardId,
        id: TaskId,
        uid: Option<String>,
        name: Option<String>,
    ) -> Result<()> {
        let mut slots = self.slots.write().await;
        let slot = slots
            .get_mut(&board_id)
            .ok_or(Error::BoardNotFound(board_id))?;
        let task = slot.tasks.get_mut(&id).ok_or(Error::TaskNotFound(id))?;
        task.assign(uid.as_deref(), name.as_deref());
        slot.notify();
        Ok(())
    }

    async fn delete_task(&self, board_id: BoardId, id: TaskId) -> Result<()> {
        let mut slots = self.slots.write().await;
        let slot = slots
            .get_mut(&board_id)
            .ok_or(Error::BoardNotFound(board_id))?;
        slot.tasks.remove(&id).ok_or(Error::TaskNotFound(id))?;
        klog_debug!("MemoryStore: deleted task {}", id.short());
        slot.notify();
        Ok(())
    }

    async fn subscribe(&self, board_id: BoardId) -> Result<broadcast::Receiver<TaskSnapshot>> {
        let slots = self.slots.read().await;
        let slot = slots.get(&board_id).ok_or(Error::BoardNotFound(board_id))?;
        Ok(slot.snapshots.subscribe())
    }
}
