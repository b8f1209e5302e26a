//! Gateway abstraction over the remote todo collection.
//!
//! Defines the [`TaskGateway`] trait the sync controller talks to.
//! Concrete implementations:
//! - [`http::HttpGateway`]: JSON over HTTP against a `/todos` collection
//! - [`memory::MemoryGateway`]: in-process collection for testing

pub mod http;
pub mod memory;

use std::fmt;

use todoterm_proto::task::{NewTask, Task, TaskId, TaskPatch, UserId};

/// Describes which kind of gateway is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayType {
    /// Remote collection reached over HTTP.
    Http,
    /// In-process collection for testing.
    Memory,
}

impl fmt::Display for GatewayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => write!(f, "HTTP"),
            Self::Memory => write!(f, "Memory"),
        }
    }
}

/// Errors that can occur while talking to the collection.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("request failed: {0}")]
    Request(String),

    /// The collection answered with a non-success status.
    #[error("collection returned HTTP {status}")]
    Status {
        /// Numeric HTTP status code.
        status: u16,
    },

    /// The response body could not be decoded.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The task does not exist in the collection.
    #[error("task {0} not found")]
    NotFound(TaskId),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
            }
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// Async CRUD access to one user's task collection.
///
/// Every method either completes with the collection's answer or fails
/// with a [`GatewayError`]; callers treat any error as a rejected
/// operation. Implementations never retry on their own.
pub trait TaskGateway: Send + Sync {
    /// Fetch every task owned by `user`, in collection order.
    fn list(
        &self,
        user: UserId,
    ) -> impl std::future::Future<Output = Result<Vec<Task>, GatewayError>> + Send;

    /// Create a task; the returned task carries the assigned identifier.
    fn create(
        &self,
        task: NewTask,
    ) -> impl std::future::Future<Output = Result<Task, GatewayError>> + Send;

    /// Apply `patch` to the task with identifier `id`.
    fn update(
        &self,
        id: TaskId,
        patch: TaskPatch,
    ) -> impl std::future::Future<Output = Result<Task, GatewayError>> + Send;

    /// Delete the task with identifier `id`.
    fn delete(&self, id: TaskId)
    -> impl std::future::Future<Output = Result<(), GatewayError>> + Send;

    /// Return the type of this gateway.
    fn gateway_type(&self) -> GatewayType;
}
