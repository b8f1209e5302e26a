//! Inline title editing for a single task.

use todoterm_proto::task::{Task, TaskId};

use crate::gateway::TaskGateway;
use crate::sync::{Outcome, SyncController};

/// Editing state for the task being renamed.
#[derive(Debug)]
pub struct EditState {
    /// Task being edited.
    pub id: TaskId,
    /// Text typed so far.
    pub buffer: String,
    /// Rename (or delete) waiting for the gateway.
    pending: Option<Outcome>,
}

impl EditState {
    /// Whether a commit is waiting for the gateway.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Title editor for the task list. At most one task is edited at a time.
#[derive(Debug, Default)]
pub struct TitleEditor {
    state: Option<EditState>,
}

impl TitleEditor {
    /// An editor that is not editing anything.
    #[must_use]
    pub const fn new() -> Self {
        Self { state: None }
    }

    /// The current editing state.
    #[must_use]
    pub const fn state(&self) -> Option<&EditState> {
        self.state.as_ref()
    }

    /// Whether a task is being edited.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.state.is_some()
    }

    /// Whether `id` is the task being edited.
    #[must_use]
    pub fn is_editing_task(&self, id: TaskId) -> bool {
        self.state.as_ref().is_some_and(|s| s.id == id)
    }

    /// Start editing `task`, seeding the buffer with its title.
    pub fn begin(&mut self, task: &Task) {
        self.state = Some(EditState {
            id: task.id,
            buffer: task.title.clone(),
            pending: None,
        });
    }

    /// Append a character to the buffer.
    pub fn push(&mut self, c: char) {
        if let Some(state) = self.state.as_mut().filter(|s| s.pending.is_none()) {
            state.buffer.push(c);
        }
    }

    /// Remove the last character of the buffer.
    pub fn pop(&mut self) {
        if let Some(state) = self.state.as_mut().filter(|s| s.pending.is_none()) {
            state.buffer.pop();
        }
    }

    /// Leave editing mode and discard the buffer.
    pub fn cancel(&mut self) {
        self.state = None;
    }

    /// Commit the buffer.
    ///
    /// An unchanged title (after trimming) leaves editing mode without a
    /// request. Anything else goes through [`SyncController::rename`] (a
    /// blank title deletes the task) and the editor stays open until
    /// [`poll`](Self::poll) sees the result.
    pub fn commit<G: TaskGateway + 'static>(&mut self, controller: &mut SyncController<G>) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if state.pending.is_some() {
            return;
        }

        let trimmed = state.buffer.trim();
        let unchanged = controller
            .store()
            .get(state.id)
            .is_some_and(|t| t.title == trimmed);
        if unchanged {
            self.state = None;
            return;
        }

        state.pending = Some(controller.rename(state.id, trimmed));
    }

    /// Check a pending commit. Success leaves editing mode; failure keeps
    /// the buffer so the user can retry or cancel.
    ///
    /// Returns the result once it has arrived.
    pub fn poll(&mut self) -> Option<bool> {
        let state = self.state.as_mut()?;
        let ok = state.pending.as_mut()?.try_get()?;
        state.pending = None;
        if ok {
            self.state = None;
        }
        Some(ok)
    }
}
