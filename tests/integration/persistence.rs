//! File-backed store durability and the live refresh loop.

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use kanso::controller::BoardController;
use kanso::core::board::Board;
use kanso::core::task::Lane;
use kanso::store::{DocumentStore, FileStore, MemoryStore};
use kanso::view::{spawn_refresh, BoardView};

use crate::fixtures::{draft, draft_with_subtasks, OWNER};

async fn open_store(dir: &TempDir) -> Arc<FileStore> {
    Arc::new(
        FileStore::open(&dir.path().join("boards.json"))
            .await
            .unwrap(),
    )
}

#[tokio::test]
async fn derivation_state_survives_reopen() {
    let dir = TempDir::new().unwrap();

    let board = Board::create("durable", "", OWNER);
    let board_id = board.id;
    let task_id;
    {
        let store = open_store(&dir).await;
        store.put_board(board).await.unwrap();
        let owner = BoardController::new(store.clone(), board_id, OWNER);
        let task = owner
            .create_task(draft_with_subtasks("t", &[false, false]))
            .await
            .unwrap();
        task_id = task.id;
        owner.move_task(task_id, Lane::Done).await.unwrap();
    }

    let store = open_store(&dir).await;
    let owner = BoardController::new(store.clone(), board_id, OWNER);
    let task = owner.task(task_id).await.unwrap();
    assert_eq!(task.progress, 100);
    assert_eq!(task.lane, Lane::Done);
    assert!(task.subtasks.iter().all(|s| s.done));
}

#[tokio::test]
async fn membership_survives_reopen() {
    let dir = TempDir::new().unwrap();

    let board = Board::create("durable", "", OWNER);
    let board_id = board.id;
    {
        let store = open_store(&dir).await;
        store.put_board(board).await.unwrap();
        let owner = BoardController::new(store.clone(), board_id, OWNER);
        owner
            .add_member("late@example.com", kanso::core::board::Role::Editor)
            .await
            .unwrap();
    }

    let store = open_store(&dir).await;
    let late = BoardController::new(store.clone(), board_id, "late@example.com");
    late.create_task(draft("after reopen")).await.unwrap();
}

#[tokio::test]
async fn deleted_tasks_stay_deleted() {
    let dir = TempDir::new().unwrap();

    let board = Board::create("durable", "", OWNER);
    let board_id = board.id;
    let task_id;
    {
        let store = open_store(&dir).await;
        store.put_board(board).await.unwrap();
        let owner = BoardController::new(store.clone(), board_id, OWNER);
        let task = owner.create_task(draft("doomed")).await.unwrap();
        task_id = task.id;
        assert!(owner.delete_task(task_id, |_| true).await.unwrap());
    }

    let store = open_store(&dir).await;
    let owner = BoardController::new(store, board_id, OWNER);
    assert!(owner.task(task_id).await.is_err());
    assert!(owner.tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn refresh_loop_tracks_controller_writes() {
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let board = Board::create("live", "", OWNER);
    let board_id = board.id;
    store.put_board(board).await.unwrap();

    let view = Arc::new(RwLock::new(BoardView::new()));
    let token = CancellationToken::new();
    let handle = spawn_refresh(store.clone(), board_id, view.clone(), token.clone());

    let owner = BoardController::new(store.clone(), board_id, OWNER);
    let task = owner.create_task(draft("watched")).await.unwrap();
    owner.move_task(task.id, Lane::InProgress).await.unwrap();

    // Let the refresh loop drain the snapshots.
    let mut seen = None;
    for _ in 0..50 {
        {
            let view = view.read().await;
            if let Some(task) = view.get(task.id) {
                if task.lane == Lane::InProgress {
                    seen = Some((task.progress, task.lane));
                    break;
                }
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(seen, Some((1, Lane::InProgress)));

    token.cancel();
    handle.await.unwrap();
}
