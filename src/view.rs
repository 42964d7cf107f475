//! Live board view.
//!
//! The view owns the client-side cache of a board's task documents as
//! explicit state: it is refreshed wholesale from store snapshots via
//! [`BoardView::replace_all`] and queried by lane for rendering. The
//! derivation core stays stateless; this is the only stateful piece on
//! the read path.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::board::BoardId;
use crate::core::task::{Lane, Task, TaskId};
use crate::store::{DocumentStore, TaskSnapshot};
use crate::{klog_debug, klog_error};

/// Board-level numbers rendered above the columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSummary {
    /// Tasks at 100% progress.
    pub finished: usize,
    /// All tasks on the board.
    pub total: usize,
    /// Rounded mean progress across all tasks (0 for an empty board).
    pub overall_percent: u8,
}

/// Client-side cache of one board's task collection.
#[derive(Debug, Default)]
pub struct BoardView {
    tasks: HashMap<TaskId, Task>,
}

impl BoardView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wholesale refresh from a store snapshot.
    pub fn replace_all(&mut self, snapshot: TaskSnapshot) {
        klog_debug!("BoardView: refresh with {} tasks", snapshot.len());
        self.tasks = snapshot.into_iter().map(|t| (t.id, t)).collect();
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in one lane, sorted by creation time.
    pub fn lane(&self, lane: Lane) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks.values().filter(|t| t.lane == lane).collect();
        tasks.sort_by_key(|t| (t.created_at, t.id.0));
        tasks
    }

    /// Overall progress numbers for the board header.
    pub fn summary(&self) -> BoardSummary {
        let total = self.tasks.len();
        let finished = self.tasks.values().filter(|t| t.progress == 100).count();
        let overall_percent = if total == 0 {
            0
        } else {
            let sum: usize = self.tasks.values().map(|t| t.progress as usize).sum();
            ((2 * sum + total) / (2 * total)) as u8
        };
        BoardSummary {
            finished,
            total,
            overall_percent,
        }
    }
}

/// Keep a shared [`BoardView`] synchronized with the store.
///
/// Seeds the view with the current task set, then applies every
/// broadcast snapshot until the token is cancelled or the board is
/// deleted (channel closed).
pub fn spawn_refresh(
    store: Arc<dyn DocumentStore>,
    board_id: BoardId,
    view: Arc<RwLock<BoardView>>,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut rx = match store.subscribe(board_id).await {
            Ok(rx) => rx,
            Err(e) => {
                klog_error!("refresh: subscribe failed for {}: {}", board_id.short(), e);
                return;
            }
        };

        match store.tasks(board_id).await {
            Ok(tasks) => view.write().await.replace_all(tasks),
            Err(e) => klog_error!("refresh: initial load failed: {}", e),
        }

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                snapshot = rx.recv() => match snapshot {
                    Ok(tasks) => view.write().await.replace_all(tasks),
                    // Snapshots are full state; whatever we missed is
                    // superseded by the next message.
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }
    })
}
