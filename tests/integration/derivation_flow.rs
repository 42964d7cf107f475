//! End-to-end scenarios for the progress/lane derivation rule.
//!
//! Each scenario runs through the controller against a live store and
//! then checks what a subscriber would see, so the pure rule, the patch
//! shape, and the snapshot fan-out are all exercised together.

use kanso::core::task::Lane;
use kanso::store::DocumentStore;

use crate::fixtures::{draft, draft_with_subtasks, TestBoard};

#[tokio::test]
async fn add_first_subtask_keeps_task_in_todo() {
    let fixture = TestBoard::new().await;
    let owner = fixture.owner();
    let task = owner.create_task(draft("fresh")).await.unwrap();

    owner.add_subtask(task.id, "A").await.unwrap();

    let current = owner.task(task.id).await.unwrap();
    assert_eq!(current.subtasks.len(), 1);
    assert_eq!(current.subtasks[0].title, "A");
    assert!(!current.subtasks[0].done);
    assert_eq!(current.progress, 0);
    assert_eq!(current.lane, Lane::Todo);
}

#[tokio::test]
async fn completing_all_subtasks_moves_task_to_done() {
    let fixture = TestBoard::new().await;
    let owner = fixture.owner();
    let task = owner
        .create_task(draft_with_subtasks("half done", &[true, false]))
        .await
        .unwrap();
    assert_eq!(task.progress, 50);

    let open = task.subtasks.iter().find(|s| !s.done).unwrap().id;
    owner.toggle_subtask(task.id, open).await.unwrap();

    let current = owner.task(task.id).await.unwrap();
    assert_eq!(current.progress, 100);
    assert_eq!(current.lane, Lane::Done);
}

#[tokio::test]
async fn unchecking_a_subtask_demotes_the_task() {
    let fixture = TestBoard::new().await;
    let owner = fixture.owner();
    let task = owner
        .create_task(draft_with_subtasks("both done", &[true, true]))
        .await
        .unwrap();

    let first = task.subtasks[0].id;
    owner.toggle_subtask(task.id, first).await.unwrap();

    let current = owner.task(task.id).await.unwrap();
    assert_eq!(current.progress, 50);
    assert_eq!(current.lane, Lane::InProgress);
}

#[tokio::test]
async fn drop_onto_done_force_completes_subtasks() {
    let fixture = TestBoard::new().await;
    let owner = fixture.owner();
    let task = owner
        .create_task(draft_with_subtasks("incomplete", &[false, false]))
        .await
        .unwrap();

    let moved = owner.move_task(task.id, Lane::Done).await.unwrap();
    assert!(moved);

    let current = owner.task(task.id).await.unwrap();
    assert_eq!(current.progress, 100);
    assert_eq!(current.lane, Lane::Done);
    assert!(current.subtasks.iter().all(|s| s.done));
}

#[tokio::test]
async fn drop_from_todo_into_in_progress_uses_floor() {
    let fixture = TestBoard::new().await;
    let owner = fixture.owner();
    let task = owner.create_task(draft("fresh")).await.unwrap();

    owner.move_task(task.id, Lane::InProgress).await.unwrap();

    let current = owner.task(task.id).await.unwrap();
    assert_eq!(current.progress, 1);
    assert_eq!(current.lane, Lane::InProgress);
}

#[tokio::test]
async fn drop_onto_current_lane_emits_no_update() {
    let fixture = TestBoard::new().await;
    let owner = fixture.owner();
    let task = owner.create_task(draft("fresh")).await.unwrap();

    // Subscribe after creation; a same-lane drop must not produce a snapshot.
    let mut rx = fixture.store.subscribe(fixture.board_id).await.unwrap();
    let moved = owner.move_task(task.id, Lane::Todo).await.unwrap();
    assert!(!moved);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn removing_last_subtask_retains_progress_and_lane() {
    let fixture = TestBoard::new().await;
    let owner = fixture.owner();
    let task = owner
        .create_task(draft_with_subtasks("single", &[false]))
        .await
        .unwrap();

    // Complete it, then remove the only subtask.
    let only = task.subtasks[0].id;
    owner.toggle_subtask(task.id, only).await.unwrap();
    owner.remove_subtask(task.id, only).await.unwrap();

    let current = owner.task(task.id).await.unwrap();
    assert!(current.subtasks.is_empty());
    assert_eq!(current.progress, 100);
    assert_eq!(current.lane, Lane::Done);
}

#[tokio::test]
async fn double_toggle_restores_original_state() {
    let fixture = TestBoard::new().await;
    let owner = fixture.owner();
    let task = owner
        .create_task(draft_with_subtasks("trio", &[true, false, false]))
        .await
        .unwrap();
    let original = owner.task(task.id).await.unwrap();

    let target = original.subtasks[1].id;
    owner.toggle_subtask(task.id, target).await.unwrap();
    owner.toggle_subtask(task.id, target).await.unwrap();

    let current = owner.task(task.id).await.unwrap();
    assert_eq!(current.subtasks, original.subtasks);
    assert_eq!(current.progress, original.progress);
    assert_eq!(current.lane, original.lane);
}

#[tokio::test]
async fn manual_progress_only_for_subtaskless_tasks() {
    let fixture = TestBoard::new().await;
    let owner = fixture.owner();

    let plain = owner.create_task(draft("plain")).await.unwrap();
    assert!(owner.set_task_progress(plain.id, 40).await.unwrap());
    let current = owner.task(plain.id).await.unwrap();
    assert_eq!(current.progress, 40);
    assert_eq!(current.lane, Lane::InProgress);

    let listed = owner
        .create_task(draft_with_subtasks("listed", &[false]))
        .await
        .unwrap();
    assert!(!owner.set_task_progress(listed.id, 40).await.unwrap());
}

#[tokio::test]
async fn subscriber_sees_each_derivation_step() {
    let fixture = TestBoard::new().await;
    let owner = fixture.owner();
    let task = owner.create_task(draft("watched")).await.unwrap();

    let mut rx = fixture.store.subscribe(fixture.board_id).await.unwrap();

    owner.add_subtask(task.id, "step").await.unwrap();
    let snapshot = rx.recv().await.unwrap();
    assert_eq!(snapshot[0].progress, 0);
    assert_eq!(snapshot[0].lane, Lane::Todo);

    let subtask_id = snapshot[0].subtasks[0].id;
    owner.toggle_subtask(task.id, subtask_id).await.unwrap();
    let snapshot = rx.recv().await.unwrap();
    assert_eq!(snapshot[0].progress, 100);
    assert_eq!(snapshot[0].lane, Lane::Done);
}
