//! HTTP API over the [`TaskCollection`].
//!
//! | method   | path          | body        | response          |
//! |----------|---------------|-------------|-------------------|
//! | `GET`    | `/todos`      |             | `[Task]`          |
//! | `POST`   | `/todos`      | `NewTask`   | `201` + `Task`    |
//! | `PATCH`  | `/todos/{id}` | `TaskPatch` | `Task`            |
//! | `DELETE` | `/todos/{id}` |             | `200` + `{}`      |
//!
//! `GET /todos` takes an optional `userId` query parameter. Unknown ids
//! answer `404`; blank titles answer `422`.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use todoterm_proto::task::{NewTask, Task, TaskId, TaskPatch, UserId};

use crate::collection::{CollectionError, TaskCollection};

/// Error answered by an API handler.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The collection rejected the request.
    #[error(transparent)]
    Collection(#[from] CollectionError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Collection(CollectionError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Collection(CollectionError::InvalidTitle(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

/// Query string of `GET /todos`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Only return tasks owned by this user.
    pub user_id: Option<UserId>,
}

/// Build the API router over `collection`.
pub fn router(collection: Arc<TaskCollection>) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).patch(update_todo).delete(delete_todo))
        .with_state(collection)
}

async fn list_todos(
    State(collection): State<Arc<TaskCollection>>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Task>> {
    Json(collection.list(query.user_id).await)
}

async fn get_todo(
    State(collection): State<Arc<TaskCollection>>,
    Path(id): Path<TaskId>,
) -> Result<Json<Task>, ApiError> {
    collection
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| CollectionError::NotFound(id).into())
}

async fn create_todo(
    State(collection): State<Arc<TaskCollection>>,
    Json(new): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = collection.create(new).await.inspect_err(|e| {
        tracing::debug!(error = %e, "create rejected");
    })?;
    tracing::info!(task_id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_todo(
    State(collection): State<Arc<TaskCollection>>,
    Path(id): Path<TaskId>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Task>, ApiError> {
    let task = collection.update(id, &patch).await.inspect_err(|e| {
        tracing::debug!(task_id = %id, error = %e, "update rejected");
    })?;
    tracing::info!(task_id = %id, "task updated");
    Ok(Json(task))
}

async fn delete_todo(
    State(collection): State<Arc<TaskCollection>>,
    Path(id): Path<TaskId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    collection.delete(id).await.inspect_err(|e| {
        tracing::debug!(task_id = %id, error = %e, "delete rejected");
    })?;
    tracing::info!(task_id = %id, "task deleted");
    Ok(Json(serde_json::json!({})))
}

/// Starts the API server on the given address with an empty collection.
///
/// Returns the actual bound address (useful when binding to port 0) and a
/// join handle for the server task.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the address.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_state(addr, Arc::new(TaskCollection::new())).await
}

/// Starts the API server over a pre-filled [`TaskCollection`].
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the address.
pub async fn start_server_with_state(
    addr: &str,
    collection: Arc<TaskCollection>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(collection);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "api server error");
        }
    });

    Ok((bound_addr, handle))
}
