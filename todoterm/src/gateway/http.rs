//! HTTP gateway for a REST-style `/todos` collection.
//!
//! Routes used:
//!
//! ```text
//! GET    /todos?userId={id}   -> [Task]
//! POST   /todos               -> Task
//! PATCH  /todos/{id}          -> Task
//! DELETE /todos/{id}          -> (empty)
//! ```
//!
//! Any non-2xx answer is reported as [`GatewayError::Status`] (404 on a
//! single task becomes [`GatewayError::NotFound`]).

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use url::Url;

use todoterm_proto::task::{NewTask, Task, TaskId, TaskPatch, UserId};

use super::{GatewayError, GatewayType, TaskGateway};

/// Settings needed to reach the collection for one user.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the API; `todos` is resolved relative to it.
    pub base_url: Url,
    /// Owner whose tasks are listed and created.
    pub user_id: UserId,
    /// Upper bound for a single request, enforced by the HTTP client.
    pub request_timeout: Duration,
}

/// [`TaskGateway`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    /// Build a gateway for the collection described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Request`] if the HTTP client cannot be built.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GatewayError::Request(format!("failed building HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: with_trailing_slash(config.base_url.clone()),
        })
    }

    fn collection_url(&self) -> Result<Url, GatewayError> {
        self.base_url
            .join("todos")
            .map_err(|e| GatewayError::Request(e.to_string()))
    }

    fn item_url(&self, id: TaskId) -> Result<Url, GatewayError> {
        self.base_url
            .join(&format!("todos/{id}"))
            .map_err(|e| GatewayError::Request(e.to_string()))
    }
}

/// `Url::join` replaces the last path segment unless the base ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Map a non-success response for a single task onto a [`GatewayError`].
fn check_item_status(response: Response, id: TaskId) -> Result<Response, GatewayError> {
    match response.status() {
        StatusCode::NOT_FOUND => Err(GatewayError::NotFound(id)),
        status if !status.is_success() => Err(GatewayError::Status {
            status: status.as_u16(),
        }),
        _ => Ok(response),
    }
}

impl TaskGateway for HttpGateway {
    async fn list(&self, user: UserId) -> Result<Vec<Task>, GatewayError> {
        let response = self
            .client
            .get(self.collection_url()?)
            .query(&[("userId", user.get())])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn create(&self, task: NewTask) -> Result<Task, GatewayError> {
        let response = self
            .client
            .post(self.collection_url()?)
            .json(&task)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Task, GatewayError> {
        let response = self
            .client
            .patch(self.item_url(id)?)
            .json(&patch)
            .send()
            .await?;
        Ok(check_item_status(response, id)?.json().await?)
    }

    async fn delete(&self, id: TaskId) -> Result<(), GatewayError> {
        let response = self.client.delete(self.item_url(id)?).send().await?;
        check_item_status(response, id)?;
        Ok(())
    }

    fn gateway_type(&self) -> GatewayType {
        GatewayType::Http
    }
}
