//! Task types exchanged with the `/todos` collection.
//!
//! Field names follow the collection's JSON (`userId`, not `user_id`), so
//! the same structs serve as request bodies, response bodies, and the
//! client's in-memory model.

use serde::{Deserialize, Serialize};

/// Server-assigned task identifier.
///
/// [`TaskId::DRAFT`] (zero) is reserved for a task that has not been
/// saved yet; the collection never hands it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Placeholder identifier for a task whose creation is still in flight.
    pub const DRAFT: Self = Self(0);

    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Whether this is the unsaved-draft placeholder.
    #[must_use]
    pub const fn is_draft(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the user that owns a task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wraps a raw user identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-assigned identifier ([`TaskId::DRAFT`] while unsaved).
    pub id: TaskId,
    /// Owner of the task.
    pub user_id: UserId,
    /// Trimmed, non-empty title.
    pub title: String,
    /// Completion flag.
    pub completed: bool,
}

impl Task {
    /// Builds the unsaved placeholder shown while a creation is in flight.
    #[must_use]
    pub const fn draft(user_id: UserId, title: String) -> Self {
        Self {
            id: TaskId::DRAFT,
            user_id,
            title,
            completed: false,
        }
    }

    /// Returns a copy with the completion flag replaced.
    #[must_use]
    pub fn with_completed(&self, completed: bool) -> Self {
        Self {
            completed,
            ..self.clone()
        }
    }

    /// Returns a copy with the title replaced.
    #[must_use]
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }
}

/// Body of `POST /todos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Owner of the new task.
    pub user_id: UserId,
    /// Title, already trimmed by the caller.
    pub title: String,
    /// Initial completion flag.
    pub completed: bool,
}

impl From<&Task> for NewTask {
    fn from(task: &Task) -> Self {
        Self {
            user_id: task.user_id,
            title: task.title.clone(),
            completed: task.completed,
        }
    }
}

/// Body of `PATCH /todos/{id}`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// New owner, if changing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// New title, if changing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New completion flag, if changing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// A patch carrying every field of `task`.
    #[must_use]
    pub fn full(task: &Task) -> Self {
        Self {
            user_id: Some(task.user_id),
            title: Some(task.title.clone()),
            completed: Some(task.completed),
        }
    }

    /// Applies the patch to `task`, returning the updated copy.
    #[must_use]
    pub fn apply(&self, task: &Task) -> Task {
        Task {
            id: task.id,
            user_id: self.user_id.unwrap_or(task.user_id),
            title: self.title.clone().unwrap_or_else(|| task.title.clone()),
            completed: self.completed.unwrap_or(task.completed),
        }
    }
}

/// Errors from title validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TitleError {
    /// The title is empty or only whitespace.
    #[error("title should not be empty")]
    Empty,
}

/// Trims `raw` and rejects titles that end up empty.
///
/// # Errors
///
/// Returns [`TitleError::Empty`] when nothing but whitespace is left.
pub fn normalize_title(raw: &str) -> Result<String, TitleError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TitleError::Empty);
    }
    Ok(trimmed.to_string())
}
