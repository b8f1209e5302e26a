//! Integration tests for task synchronization.
//!
//! Drives `SyncController` against a `MemoryGateway` and checks the store,
//! the in-flight set, the error banner and the calls that reached the
//! gateway.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use todoterm::filter::{self, Filter};
use todoterm::gateway::memory::{GatewayCall, GatewayOp, MemoryGateway};
use todoterm::sync::{DEFAULT_NOTICE_DELAY, ErrorKind, SyncController, SyncError};
use todoterm_proto::task::{Task, TaskId, TaskPatch, UserId};

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

const USER: UserId = UserId::new(1);

fn task(id: u64, title: &str, completed: bool) -> Task {
    Task {
        id: TaskId::new(id),
        user_id: USER,
        title: title.to_string(),
        completed,
    }
}

fn titles(ctl: &SyncController<MemoryGateway>) -> Vec<&str> {
    ctl.store().tasks().iter().map(|t| t.title.as_str()).collect()
}

/// Controller over a gateway seeded with `tasks`, already loaded.
async fn loaded(tasks: Vec<Task>) -> SyncController<MemoryGateway> {
    loaded_with(Arc::new(MemoryGateway::with_tasks(tasks))).await
}

async fn loaded_with(gateway: Arc<MemoryGateway>) -> SyncController<MemoryGateway> {
    let mut ctl = SyncController::new(gateway, USER, DEFAULT_NOTICE_DELAY);
    ctl.load();
    ctl.run_until_idle().await;
    ctl
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

#[tokio::test]
async fn load_only_fetches_own_tasks() {
    let mut other = task(9, "not mine", false);
    other.user_id = UserId::new(2);
    let ctl = loaded(vec![task(1, "mine", false), other]).await;

    assert_eq!(titles(&ctl), ["mine"]);
    assert_eq!(ctl.gateway().calls(), [GatewayCall::List(USER)]);
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_appends_task_with_gateway_id() {
    let mut ctl = loaded(vec![task(1, "A", false)]).await;
    ctl.create("  B  ").unwrap();
    ctl.run_until_idle().await;

    assert_eq!(ctl.store().tasks().len(), 2);
    let created = &ctl.store().tasks()[1];
    assert_eq!(created.id, TaskId::new(2));
    assert_eq!(created.title, "B");
    assert!(!created.completed);
    assert!(ctl.store().draft().is_none());
    assert!(ctl.store().in_flight().is_empty());
}

#[tokio::test]
async fn create_failure_clears_draft_and_keeps_input() {
    let gateway = Arc::new(MemoryGateway::new());
    gateway.fail(GatewayOp::Create);
    let mut ctl = loaded_with(gateway).await;

    ctl.set_input("Buy milk");
    ctl.submit().unwrap();
    ctl.run_until_idle().await;

    assert!(ctl.store().tasks().is_empty());
    assert!(ctl.store().draft().is_none());
    assert!(!ctl.store().is_in_flight(TaskId::DRAFT));
    assert_eq!(ctl.input(), "Buy milk");
    assert_eq!(ctl.notice().current(), Some(ErrorKind::AddTodo));
}

#[tokio::test]
async fn blank_title_never_reaches_gateway() {
    let mut ctl = loaded(vec![]).await;
    assert_eq!(ctl.create("   "), Err(SyncError::EmptyTitle));
    assert_eq!(ctl.create(""), Err(SyncError::EmptyTitle));

    assert_eq!(ctl.gateway().call_count(GatewayOp::Create), 0);
    assert!(ctl.store().draft().is_none());
    assert_eq!(ctl.notice().current(), Some(ErrorKind::EmptyTitle));
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_removes_task() {
    let mut ctl = loaded(vec![task(1, "A", false)]).await;
    let outcome = ctl.delete(TaskId::new(1));
    assert!(ctl.store().is_in_flight(TaskId::new(1)));

    ctl.run_until_idle().await;
    assert!(outcome.wait().await);
    assert!(ctl.store().tasks().is_empty());
    assert!(ctl.store().in_flight().is_empty());
}

#[tokio::test]
async fn delete_failure_leaves_list_unchanged() {
    let gateway = Arc::new(MemoryGateway::with_tasks(vec![task(1, "A", false)]));
    gateway.fail(GatewayOp::Delete);
    let mut ctl = loaded_with(gateway).await;

    let outcome = ctl.delete(TaskId::new(1));
    ctl.run_until_idle().await;

    assert!(!outcome.wait().await);
    assert_eq!(ctl.store().tasks(), [task(1, "A", false)]);
    assert!(ctl.store().in_flight().is_empty());
    assert_eq!(ctl.notice().current(), Some(ErrorKind::DeleteTodo));
}

#[tokio::test]
async fn delete_completed_issues_one_delete_per_completed_task() {
    let gateway = Arc::new(MemoryGateway::with_tasks(vec![
        task(1, "A", true),
        task(2, "B", false),
        task(3, "C", true),
        task(4, "D", true),
    ]));
    gateway.fail_for(GatewayOp::Delete, TaskId::new(3));
    let mut ctl = loaded_with(gateway).await;

    assert_eq!(ctl.delete_completed(), 3);
    ctl.run_until_idle().await;

    assert_eq!(ctl.gateway().call_count(GatewayOp::Delete), 3);
    // The failed delete does not stop the others.
    assert_eq!(titles(&ctl), ["B", "C"]);
    assert_eq!(ctl.notice().current(), Some(ErrorKind::DeleteTodo));
    assert!(ctl.store().in_flight().is_empty());
}

#[tokio::test]
async fn delete_completed_with_nothing_completed_is_noop() {
    let mut ctl = loaded(vec![task(1, "A", false)]).await;
    assert_eq!(ctl.delete_completed(), 0);
    assert!(!ctl.has_pending());
}

// ---------------------------------------------------------------------------
// Toggle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn toggle_flips_only_that_task() {
    let mut ctl = loaded(vec![task(1, "A", false), task(2, "B", false)]).await;
    ctl.toggle(TaskId::new(1));
    ctl.run_until_idle().await;

    assert_eq!(ctl.store().tasks(), [task(1, "A", true), task(2, "B", false)]);
    let Some(GatewayCall::Update(id, patch)) = ctl.gateway().calls().pop() else {
        panic!("expected an update call");
    };
    assert_eq!(id, TaskId::new(1));
    assert_eq!(patch, TaskPatch::full(&task(1, "A", true)));
}

#[tokio::test]
async fn toggle_failure_leaves_list_unchanged() {
    let gateway = Arc::new(MemoryGateway::with_tasks(vec![task(1, "A", false)]));
    gateway.fail(GatewayOp::Update);
    let mut ctl = loaded_with(gateway).await;

    ctl.toggle(TaskId::new(1));
    ctl.run_until_idle().await;

    assert_eq!(ctl.store().tasks(), [task(1, "A", false)]);
    assert_eq!(ctl.notice().current(), Some(ErrorKind::UpdateTodo));
    assert!(ctl.store().in_flight().is_empty());
}

#[tokio::test]
async fn toggle_all_completes_everything() {
    let mut ctl = loaded(vec![task(1, "A", false), task(2, "B", true), task(3, "C", false)]).await;
    assert_eq!(ctl.toggle_all(), 2);
    assert!(ctl.store().is_in_flight(TaskId::new(1)));
    assert!(!ctl.store().is_in_flight(TaskId::new(2)));
    assert!(ctl.store().is_in_flight(TaskId::new(3)));
    ctl.run_until_idle().await;

    assert!(filter::all_completed(ctl.store().tasks()));
    assert_eq!(ctl.gateway().call_count(GatewayOp::Update), 2);
}

#[tokio::test]
async fn toggle_all_reopens_when_all_completed() {
    let mut ctl = loaded(vec![task(1, "A", true), task(2, "B", true)]).await;
    assert_eq!(ctl.toggle_all(), 2);
    ctl.run_until_idle().await;

    assert_eq!(filter::active_count(ctl.store().tasks()), 2);
}

#[tokio::test]
async fn toggle_all_on_empty_list_does_nothing() {
    let mut ctl = loaded(vec![]).await;
    assert_eq!(ctl.toggle_all(), 0);
    assert!(!ctl.has_pending());
}

#[tokio::test]
async fn rapid_double_toggle_is_sequential() {
    let mut ctl = loaded(vec![task(1, "A", false)]).await;
    ctl.toggle(TaskId::new(1));
    ctl.toggle(TaskId::new(1));
    ctl.run_until_idle().await;

    let updates: Vec<bool> = ctl
        .gateway()
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            GatewayCall::Update(_, patch) => patch.completed,
            _ => None,
        })
        .collect();
    assert_eq!(updates, [true, false]);
    assert_eq!(ctl.store().tasks(), [task(1, "A", false)]);
}

// ---------------------------------------------------------------------------
// Rename
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rename_updates_title() {
    let mut ctl = loaded(vec![task(1, "A", true)]).await;
    let outcome = ctl.rename(TaskId::new(1), "  renamed ");
    ctl.run_until_idle().await;

    assert!(outcome.wait().await);
    assert_eq!(ctl.store().tasks(), [task(1, "renamed", true)]);
}

#[tokio::test]
async fn rename_to_blank_deletes() {
    let mut ctl = loaded(vec![task(1, "A", false), task(2, "B", false)]).await;
    let outcome = ctl.rename(TaskId::new(1), "   ");
    ctl.run_until_idle().await;

    assert!(outcome.wait().await);
    assert_eq!(titles(&ctl), ["B"]);
    assert_eq!(ctl.gateway().call_count(GatewayOp::Update), 0);
    assert_eq!(ctl.gateway().call_count(GatewayOp::Delete), 1);
}

#[tokio::test]
async fn rename_failure_keeps_old_title() {
    let gateway = Arc::new(MemoryGateway::with_tasks(vec![task(1, "A", false)]));
    gateway.fail(GatewayOp::Update);
    let mut ctl = loaded_with(gateway).await;

    let outcome = ctl.rename(TaskId::new(1), "B");
    ctl.run_until_idle().await;

    assert!(!outcome.wait().await);
    assert_eq!(titles(&ctl), ["A"]);
    assert_eq!(ctl.notice().current(), Some(ErrorKind::UpdateTodo));
}

#[tokio::test]
async fn rename_unknown_id_fails_without_request() {
    let mut ctl = loaded(vec![task(1, "A", false)]).await;
    let outcome = ctl.rename(TaskId::new(5), "B");

    assert!(!outcome.wait().await);
    assert!(!ctl.has_pending());
    assert_eq!(ctl.gateway().call_count(GatewayOp::Update), 0);
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[tokio::test]
async fn active_filter_hides_completed() {
    let mut ctl = loaded(vec![task(1, "A", true), task(2, "B", false)]).await;
    ctl.set_filter(Filter::Active);
    let visible: Vec<TaskId> = ctl.visible().iter().map(|t| t.id).collect();
    assert_eq!(visible, [TaskId::new(2)]);
}

#[tokio::test]
async fn store_revision_advances_on_change() {
    let mut ctl = loaded(vec![task(1, "A", false)]).await;
    let revisions = ctl.store().subscribe();
    assert!(!revisions.has_changed().unwrap());

    ctl.toggle(TaskId::new(1));
    assert!(revisions.has_changed().unwrap());
    ctl.run_until_idle().await;
    assert!(!ctl.store().tasks().is_empty());
}
