//! In-memory todo collection.
//!
//! Tasks are kept in a [`BTreeMap`] keyed by id so listings come back in
//! creation order. Ids are assigned from 1 upward and never reused.

use std::collections::BTreeMap;

use tokio::sync::RwLock;

use todoterm_proto::task::{NewTask, Task, TaskId, TaskPatch, TitleError, UserId, normalize_title};

/// Errors returned by [`TaskCollection`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    /// No task has this id.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// The title is empty after trimming.
    #[error(transparent)]
    InvalidTitle(#[from] TitleError),
}

struct Inner {
    tasks: BTreeMap<TaskId, Task>,
    next_id: u64,
}

/// Thread-safe task collection shared by the API handlers.
pub struct TaskCollection {
    inner: RwLock<Inner>,
}

impl Default for TaskCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                tasks: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Creates a collection holding `tasks` as-is.
    ///
    /// New ids continue after the largest seeded id.
    #[must_use]
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let tasks: BTreeMap<TaskId, Task> = tasks.into_iter().map(|t| (t.id, t)).collect();
        let next_id = tasks.keys().next_back().map_or(1, |id| id.get() + 1);
        Self {
            inner: RwLock::new(Inner { tasks, next_id }),
        }
    }

    /// Tasks owned by `user`, or every task if `user` is `None`.
    pub async fn list(&self, user: Option<UserId>) -> Vec<Task> {
        let inner = self.inner.read().await;
        inner
            .tasks
            .values()
            .filter(|t| user.is_none_or(|u| t.user_id == u))
            .cloned()
            .collect()
    }

    /// Look up a single task.
    pub async fn get(&self, id: TaskId) -> Option<Task> {
        self.inner.read().await.tasks.get(&id).cloned()
    }

    /// Store a new task under a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidTitle`] for a blank title.
    pub async fn create(&self, new: NewTask) -> Result<Task, CollectionError> {
        let title = normalize_title(&new.title)?;
        let mut inner = self.inner.write().await;
        let id = TaskId::new(inner.next_id);
        inner.next_id += 1;

        let task = Task {
            id,
            user_id: new.user_id,
            title,
            completed: new.completed,
        };
        inner.tasks.insert(id, task.clone());
        drop(inner);

        tracing::debug!(task_id = %id, user_id = %task.user_id, "task stored");
        Ok(task)
    }

    /// Apply `patch` to task `id` and return the result.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`] for an unknown id, or
    /// [`CollectionError::InvalidTitle`] if the patch sets a blank title.
    pub async fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, CollectionError> {
        let mut patch = patch.clone();
        if let Some(title) = patch.title.as_deref() {
            patch.title = Some(normalize_title(title)?);
        }

        let mut inner = self.inner.write().await;
        let task = inner
            .tasks
            .get_mut(&id)
            .ok_or(CollectionError::NotFound(id))?;
        *task = patch.apply(task);
        Ok(task.clone())
    }

    /// Remove task `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`] for an unknown id.
    pub async fn delete(&self, id: TaskId) -> Result<Task, CollectionError> {
        self.inner
            .write()
            .await
            .tasks
            .remove(&id)
            .ok_or(CollectionError::NotFound(id))
    }

    /// Number of stored tasks.
    pub async fn len(&self) -> usize {
        self.inner.read().await.tasks.len()
    }

    /// Whether the collection is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.tasks.is_empty()
    }
}
