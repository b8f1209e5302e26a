//! Integration tests for inline title editing.
//!
//! Covers the `TitleEditor` lifecycle against a `SyncController`: begin,
//! type, commit, and how the editor reacts to the rename outcome.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use todoterm::editor::TitleEditor;
use todoterm::gateway::memory::{GatewayOp, MemoryGateway};
use todoterm::sync::{DEFAULT_NOTICE_DELAY, ErrorKind, SyncController};
use todoterm_proto::task::{Task, TaskId, UserId};

fn task(id: u64, title: &str) -> Task {
    Task {
        id: TaskId::new(id),
        user_id: UserId::new(1),
        title: title.to_string(),
        completed: false,
    }
}

async fn setup(gateway: MemoryGateway) -> SyncController<MemoryGateway> {
    let mut ctl = SyncController::new(Arc::new(gateway), UserId::new(1), DEFAULT_NOTICE_DELAY);
    ctl.load();
    ctl.run_until_idle().await;
    ctl
}

fn retype(editor: &mut TitleEditor, text: &str) {
    while editor.state().is_some_and(|s| !s.buffer.is_empty()) {
        editor.pop();
    }
    for c in text.chars() {
        editor.push(c);
    }
}

#[tokio::test]
async fn begin_seeds_buffer_with_title() {
    let ctl = setup(MemoryGateway::with_tasks(vec![task(1, "Buy milk")])).await;
    let mut editor = TitleEditor::new();
    editor.begin(&ctl.store().tasks()[0]);

    assert!(editor.is_editing_task(TaskId::new(1)));
    assert_eq!(editor.state().unwrap().buffer, "Buy milk");
}

#[tokio::test]
async fn unchanged_title_exits_without_request() {
    let mut ctl = setup(MemoryGateway::with_tasks(vec![task(1, "Buy milk")])).await;
    let mut editor = TitleEditor::new();
    editor.begin(&ctl.store().tasks()[0].clone());

    // Surrounding whitespace does not count as a change.
    retype(&mut editor, "  Buy milk ");
    editor.commit(&mut ctl);

    assert!(!editor.is_editing());
    assert!(!ctl.has_pending());
    assert_eq!(ctl.gateway().call_count(GatewayOp::Update), 0);
}

#[tokio::test]
async fn successful_rename_exits_editing() {
    let mut ctl = setup(MemoryGateway::with_tasks(vec![task(1, "Buy milk")])).await;
    let mut editor = TitleEditor::new();
    editor.begin(&ctl.store().tasks()[0].clone());

    retype(&mut editor, "Buy oat milk");
    editor.commit(&mut ctl);
    assert!(editor.state().unwrap().is_pending());
    assert_eq!(editor.poll(), None);

    // Typing is ignored while the rename is in flight.
    editor.push('!');
    assert_eq!(editor.state().unwrap().buffer, "Buy oat milk");

    ctl.run_until_idle().await;
    assert_eq!(editor.poll(), Some(true));
    assert!(!editor.is_editing());
    assert_eq!(ctl.store().tasks()[0].title, "Buy oat milk");
}

#[tokio::test]
async fn failed_rename_keeps_buffer() {
    let gateway = MemoryGateway::with_tasks(vec![task(1, "Buy milk")]);
    gateway.fail(GatewayOp::Update);
    let mut ctl = setup(gateway).await;
    let mut editor = TitleEditor::new();
    editor.begin(&ctl.store().tasks()[0].clone());

    retype(&mut editor, "Buy bread");
    editor.commit(&mut ctl);
    ctl.run_until_idle().await;

    assert_eq!(editor.poll(), Some(false));
    let state = editor.state().unwrap();
    assert_eq!(state.buffer, "Buy bread");
    assert!(!state.is_pending());
    assert_eq!(ctl.store().tasks()[0].title, "Buy milk");
    assert_eq!(ctl.notice().current(), Some(ErrorKind::UpdateTodo));

    // The user can retry once the collection recovers.
    ctl.gateway().clear_failures();
    editor.commit(&mut ctl);
    ctl.run_until_idle().await;
    assert_eq!(editor.poll(), Some(true));
    assert_eq!(ctl.store().tasks()[0].title, "Buy bread");
}

#[tokio::test]
async fn clearing_title_deletes_task() {
    let mut ctl = setup(MemoryGateway::with_tasks(vec![task(1, "Buy milk"), task(2, "Walk dog")])).await;
    let mut editor = TitleEditor::new();
    editor.begin(&ctl.store().tasks()[0].clone());

    retype(&mut editor, "   ");
    editor.commit(&mut ctl);
    ctl.run_until_idle().await;

    assert_eq!(editor.poll(), Some(true));
    assert!(!editor.is_editing());
    assert_eq!(ctl.store().tasks(), [task(2, "Walk dog")]);
    assert_eq!(ctl.gateway().call_count(GatewayOp::Delete), 1);
}

#[tokio::test]
async fn cancel_discards_buffer() {
    let mut ctl = setup(MemoryGateway::with_tasks(vec![task(1, "Buy milk")])).await;
    let mut editor = TitleEditor::new();
    editor.begin(&ctl.store().tasks()[0].clone());

    retype(&mut editor, "something else");
    editor.cancel();
    editor.commit(&mut ctl);

    assert!(!editor.is_editing());
    assert_eq!(ctl.gateway().call_count(GatewayOp::Update), 0);
    assert_eq!(ctl.store().tasks()[0].title, "Buy milk");
}
