//! Integration tests for the HTTP gateway.
//!
//! Starts `todoterm-server` in-process on an ephemeral port and drives it
//! through `HttpGateway`, both directly and through `SyncController`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use todoterm::gateway::http::{GatewayConfig, HttpGateway};
use todoterm::gateway::{GatewayError, TaskGateway};
use todoterm::sync::{DEFAULT_NOTICE_DELAY, ErrorKind, SyncController};
use todoterm_proto::task::{NewTask, Task, TaskId, TaskPatch, UserId};
use todoterm_server::collection::TaskCollection;
use url::Url;

const USER: UserId = UserId::new(1);

/// Start the server in-process and return a gateway pointed at it.
async fn start(seed: Vec<Task>) -> (HttpGateway, tokio::task::JoinHandle<()>) {
    let collection = Arc::new(TaskCollection::with_tasks(seed));
    let (addr, handle) = todoterm_server::api::start_server_with_state("127.0.0.1:0", collection)
        .await
        .expect("failed to start server");

    let gateway = HttpGateway::new(&GatewayConfig {
        base_url: Url::parse(&format!("http://{addr}/")).unwrap(),
        user_id: USER,
        request_timeout: Duration::from_secs(5),
    })
    .unwrap();
    (gateway, handle)
}

fn task(id: u64, user: u64, title: &str, completed: bool) -> Task {
    Task {
        id: TaskId::new(id),
        user_id: UserId::new(user),
        title: title.to_string(),
        completed,
    }
}

// =============================================================================
// Raw gateway calls
// =============================================================================

#[tokio::test]
async fn list_returns_only_requested_user() {
    let (gateway, _handle) = start(vec![task(1, 1, "mine", false), task(2, 2, "theirs", true)]).await;
    let tasks = gateway.list(USER).await.unwrap();
    assert_eq!(tasks, [task(1, 1, "mine", false)]);
}

#[tokio::test]
async fn create_returns_assigned_id() {
    let (gateway, _handle) = start(vec![]).await;
    let created = gateway
        .create(NewTask {
            user_id: USER,
            title: "first".to_string(),
            completed: false,
        })
        .await
        .unwrap();
    assert_eq!(created, task(1, 1, "first", false));
    assert_eq!(gateway.list(USER).await.unwrap().len(), 1);
}

#[tokio::test]
async fn create_blank_title_is_rejected() {
    let (gateway, _handle) = start(vec![]).await;
    let result = gateway
        .create(NewTask {
            user_id: USER,
            title: "  ".to_string(),
            completed: false,
        })
        .await;
    assert!(matches!(result, Err(GatewayError::Status { status: 422 })));
}

#[tokio::test]
async fn update_applies_patch() {
    let (gateway, _handle) = start(vec![task(1, 1, "a", false)]).await;
    let patch = TaskPatch {
        completed: Some(true),
        ..TaskPatch::default()
    };
    let updated = gateway.update(TaskId::new(1), patch).await.unwrap();
    assert_eq!(updated, task(1, 1, "a", true));
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let (gateway, _handle) = start(vec![]).await;
    let id = TaskId::new(77);
    assert!(matches!(
        gateway.update(id, TaskPatch::default()).await,
        Err(GatewayError::NotFound(missing)) if missing == id
    ));
    assert!(matches!(gateway.delete(id).await, Err(GatewayError::NotFound(_))));
}

#[tokio::test]
async fn delete_removes_task() {
    let (gateway, _handle) = start(vec![task(1, 1, "a", false)]).await;
    gateway.delete(TaskId::new(1)).await.unwrap();
    assert!(gateway.list(USER).await.unwrap().is_empty());
}

#[tokio::test]
async fn stopped_server_is_request_error() {
    let (gateway, handle) = start(vec![]).await;
    handle.abort();
    let _ = handle.await;

    let result = gateway.list(USER).await;
    assert!(matches!(result, Err(GatewayError::Request(_))));
}

// =============================================================================
// Controller over HTTP
// =============================================================================

#[tokio::test]
async fn controller_round_trip_over_http() {
    let (gateway, _handle) = start(vec![task(1, 1, "existing", false)]).await;
    let mut ctl = SyncController::new(Arc::new(gateway), USER, DEFAULT_NOTICE_DELAY);

    ctl.load();
    ctl.run_until_idle().await;
    assert_eq!(ctl.store().tasks().len(), 1);

    ctl.create("new one").unwrap();
    ctl.toggle(TaskId::new(1));
    ctl.run_until_idle().await;

    let renamed = ctl.rename(TaskId::new(2), "renamed");
    ctl.run_until_idle().await;
    assert!(renamed.wait().await);

    assert_eq!(
        ctl.store().tasks(),
        [task(1, 1, "existing", true), task(2, 1, "renamed", false)]
    );
    assert_eq!(ctl.gateway().list(USER).await.unwrap(), ctl.store().tasks());
    assert_eq!(ctl.notice().current(), None);
}

#[tokio::test]
async fn controller_reports_missing_task_as_update_error() {
    let (gateway, _handle) = start(vec![task(1, 1, "a", false)]).await;
    let mut ctl = SyncController::new(Arc::new(gateway), USER, DEFAULT_NOTICE_DELAY);
    ctl.load();
    ctl.run_until_idle().await;

    // Removed behind the controller's back.
    ctl.gateway().delete(TaskId::new(1)).await.unwrap();

    ctl.toggle(TaskId::new(1));
    ctl.run_until_idle().await;
    assert_eq!(ctl.notice().current(), Some(ErrorKind::UpdateTodo));
    assert_eq!(ctl.store().tasks(), [task(1, 1, "a", false)]);
}
