//! Board membership, permissions, assignment, and deletion flows.

use kanso::core::board::Role;
use kanso::core::task::Lane;
use kanso::view::BoardView;
use kanso::Error;

use crate::fixtures::{draft, TestBoard, EDITOR, OWNER, VIEWER};

#[tokio::test]
async fn editor_can_run_the_full_task_lifecycle() {
    let fixture = TestBoard::new().await;
    let editor = fixture.as_user(EDITOR);

    let task = editor.create_task(draft("by editor")).await.unwrap();
    editor.add_subtask(task.id, "a").await.unwrap();
    editor.move_task(task.id, Lane::Done).await.unwrap();
    assert!(editor.delete_task(task.id, |_| true).await.unwrap());
}

#[tokio::test]
async fn viewer_is_read_only() {
    let fixture = TestBoard::new().await;
    let owner = fixture.owner();
    let task = owner.create_task(draft("t")).await.unwrap();

    let viewer = fixture.as_user(VIEWER);
    assert!(viewer.board().await.is_ok());
    assert_eq!(viewer.tasks().await.unwrap().len(), 1);

    assert!(matches!(
        viewer.add_subtask(task.id, "x").await.unwrap_err(),
        Error::PermissionDenied { .. }
    ));
    assert!(matches!(
        viewer.delete_task(task.id, |_| true).await.unwrap_err(),
        Error::PermissionDenied { .. }
    ));
}

#[tokio::test]
async fn stranger_sees_nothing() {
    let fixture = TestBoard::new().await;
    let stranger = fixture.as_user("stranger@example.com");
    assert!(matches!(
        stranger.board().await.unwrap_err(),
        Error::PermissionDenied { .. }
    ));
}

#[tokio::test]
async fn only_owner_manages_members() {
    let fixture = TestBoard::new().await;

    let editor = fixture.as_user(EDITOR);
    assert!(matches!(
        editor
            .add_member("friend@example.com", Role::Viewer)
            .await
            .unwrap_err(),
        Error::PermissionDenied { .. }
    ));

    let owner = fixture.owner();
    owner
        .add_member("friend@example.com", Role::Editor)
        .await
        .unwrap();

    // The new editor can now mutate.
    let friend = fixture.as_user("friend@example.com");
    friend.create_task(draft("by friend")).await.unwrap();

    // And duplicates are rejected.
    assert!(matches!(
        owner
            .add_member("friend@example.com", Role::Viewer)
            .await
            .unwrap_err(),
        Error::MemberExists(_)
    ));
}

#[tokio::test]
async fn removing_a_member_revokes_access() {
    let fixture = TestBoard::new().await;
    let owner = fixture.owner();
    owner.remove_member(EDITOR).await.unwrap();

    let editor = fixture.as_user(EDITOR);
    assert!(matches!(
        editor.create_task(draft("late")).await.unwrap_err(),
        Error::PermissionDenied { .. }
    ));
}

#[tokio::test]
async fn assignment_round_trip() {
    let fixture = TestBoard::new().await;
    let owner = fixture.owner();
    let task = owner.create_task(draft("t")).await.unwrap();

    owner.assign_task(task.id, Some(VIEWER)).await.unwrap();
    let current = owner.task(task.id).await.unwrap();
    assert_eq!(current.assigned_to.as_deref(), Some(VIEWER));

    // The owner themselves is a valid assignee.
    owner.assign_task(task.id, Some(OWNER)).await.unwrap();

    owner.assign_task(task.id, None).await.unwrap();
    assert!(owner.task(task.id).await.unwrap().assigned_to.is_none());
}

#[tokio::test]
async fn declined_confirmation_keeps_the_task() {
    let fixture = TestBoard::new().await;
    let owner = fixture.owner();
    let task = owner.create_task(draft("precious")).await.unwrap();

    let deleted = owner.delete_task(task.id, |_| false).await.unwrap();
    assert!(!deleted);
    assert!(owner.task(task.id).await.is_ok());
}

#[tokio::test]
async fn board_summary_matches_task_state() {
    let fixture = TestBoard::new().await;
    let owner = fixture.owner();

    let a = owner.create_task(draft("a")).await.unwrap();
    let b = owner.create_task(draft("b")).await.unwrap();
    owner.create_task(draft("c")).await.unwrap();

    owner.move_task(a.id, Lane::Done).await.unwrap();
    owner.set_task_progress(b.id, 50).await.unwrap();

    let mut view = BoardView::new();
    view.replace_all(owner.tasks().await.unwrap());

    let summary = view.summary();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.finished, 1);
    assert_eq!(summary.overall_percent, 50);

    assert_eq!(view.lane(Lane::Todo).len(), 1);
    assert_eq!(view.lane(Lane::InProgress).len(), 1);
    assert_eq!(view.lane(Lane::Done).len(), 1);
}
