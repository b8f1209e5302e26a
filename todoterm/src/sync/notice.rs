//! Transient error banner state.
//!
//! At most one [`ErrorKind`] is shown at a time. Raising an error starts a
//! timer that clears it after the configured delay; raising another error
//! before then aborts the old timer and starts a new one. Each timer is
//! tagged with a generation number and only the current generation's
//! expiry clears the banner.

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::Settlement;

/// Default time an error stays visible.
pub const DEFAULT_NOTICE_DELAY: Duration = Duration::from_secs(3);

/// Classification of a failed user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The initial fetch failed.
    LoadTodos,
    /// Creating a task failed.
    AddTodo,
    /// Deleting a task failed.
    DeleteTodo,
    /// Changing a task's status or title failed.
    UpdateTodo,
    /// A new task was submitted with an empty title.
    EmptyTitle,
}

impl ErrorKind {
    /// Banner text for this kind.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::LoadTodos => "Unable to load todos",
            Self::AddTodo => "Unable to add a todo",
            Self::DeleteTodo => "Unable to delete a todo",
            Self::UpdateTodo => "Unable to update a todo",
            Self::EmptyTitle => "Title should not be empty",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// The currently displayed error, if any, and its expiry timer.
#[derive(Debug)]
pub struct ErrorNotice {
    current: Option<ErrorKind>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
    delay: Duration,
}

impl ErrorNotice {
    /// An empty notice whose errors expire after `delay`.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            current: None,
            generation: 0,
            timer: None,
            delay,
        }
    }

    /// The error being shown.
    #[must_use]
    pub const fn current(&self) -> Option<ErrorKind> {
        self.current
    }

    /// Generation of the most recently raised error.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// How long an error stays visible.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Show `kind` and (re)start the expiry timer.
    ///
    /// The expiry arrives as a [`Settlement::NoticeExpired`] on `expired`.
    pub(crate) fn raise(&mut self, kind: ErrorKind, expired: mpsc::UnboundedSender<Settlement>) {
        self.cancel_timer();
        self.generation += 1;
        self.current = Some(kind);

        let generation = self.generation;
        let delay = self.delay;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = expired.send(Settlement::NoticeExpired { generation });
        }));
    }

    /// Clear the banner if `generation` is still the current one.
    ///
    /// Returns whether the banner was cleared.
    pub(crate) fn expire(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.current.is_none() {
            return false;
        }
        self.current = None;
        self.timer = None;
        true
    }

    /// Clear the banner now, regardless of the timer.
    pub fn dismiss(&mut self) {
        self.cancel_timer();
        self.current = None;
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for ErrorNotice {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
