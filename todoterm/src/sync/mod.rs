//! Synchronization controller.
//!
//! [`SyncController`] turns user intents into gateway requests and applies
//! their results to the [`TaskStore`]. Requests run as spawned tokio tasks
//! whose only effect is a `Settlement` sent back on a channel; the owner
//! of the controller (the UI loop, or a test) applies settlements one at a
//! time with [`SyncController::drain_settlements`],
//! [`SyncController::settle_next`] or [`SyncController::run_until_idle`].
//!
//! ```text
//! intent ──> controller ──spawn──> gateway request
//!               ^                        │
//!               └──── Settlement <───────┘
//! ```
//!
//! At most one request per task identifier is outstanding. Requests for a
//! busy identifier wait in a per-identifier queue and start when the
//! previous one settles.

pub mod notice;
pub mod outcome;

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use todoterm_proto::task::{NewTask, Task, TaskId, TaskPatch, TitleError, UserId, normalize_title};

use crate::filter::{self, Filter};
use crate::gateway::{GatewayError, TaskGateway};
use crate::store::TaskStore;

pub use notice::{DEFAULT_NOTICE_DELAY, ErrorKind, ErrorNotice};
pub use outcome::Outcome;

/// Requests the controller refuses before contacting the gateway.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// The submitted title is empty after trimming.
    #[error("title should not be empty")]
    EmptyTitle,
    /// A creation is still in flight; the input is locked until it settles.
    #[error("a task is already being created")]
    CreationPending,
}

impl From<TitleError> for SyncError {
    fn from(err: TitleError) -> Self {
        match err {
            TitleError::Empty => Self::EmptyTitle,
        }
    }
}

/// Field changed by a successful update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Change {
    Completed(bool),
    Title(String),
}

impl Change {
    fn apply_to(&self, task: &Task) -> Task {
        match self {
            Self::Completed(completed) => task.with_completed(*completed),
            Self::Title(title) => task.with_title(title.clone()),
        }
    }
}

/// Result of one gateway request (or notice timer), delivered to the controller.
#[derive(Debug)]
pub(crate) enum Settlement {
    Loaded(Result<Vec<Task>, GatewayError>),
    Created(Result<Task, GatewayError>),
    Updated {
        id: TaskId,
        change: Change,
        result: Result<Task, GatewayError>,
        reply: Option<oneshot::Sender<bool>>,
    },
    Deleted {
        id: TaskId,
        result: Result<(), GatewayError>,
        reply: oneshot::Sender<bool>,
    },
    NoticeExpired {
        generation: u64,
    },
}

/// An operation waiting for its identifier to become free.
#[derive(Debug)]
enum Queued {
    /// Flip whatever the flag is when the operation starts.
    Toggle,
    /// Set the flag to a fixed value (toggle-all).
    SetCompleted(bool),
    Rename {
        title: String,
        reply: oneshot::Sender<bool>,
    },
    Delete {
        reply: oneshot::Sender<bool>,
    },
}

/// Orchestrates task operations against a [`TaskGateway`].
pub struct SyncController<G> {
    gateway: Arc<G>,
    user_id: UserId,
    store: TaskStore,
    notice: ErrorNotice,
    filter: Filter,
    /// Text of the new-task input.
    input: String,
    queued: HashMap<TaskId, VecDeque<Queued>>,
    /// Gateway requests spawned but not yet applied.
    pending: usize,
    tx: mpsc::UnboundedSender<Settlement>,
    rx: mpsc::UnboundedReceiver<Settlement>,
}

impl<G: TaskGateway + 'static> SyncController<G> {
    /// Creates a controller for `user_id`'s tasks.
    ///
    /// Errors stay on the banner for `notice_delay`.
    #[must_use]
    pub fn new(gateway: Arc<G>, user_id: UserId, notice_delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            gateway,
            user_id,
            store: TaskStore::new(),
            notice: ErrorNotice::new(notice_delay),
            filter: Filter::default(),
            input: String::new(),
            queued: HashMap::new(),
            pending: 0,
            tx,
            rx,
        }
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    /// The task store.
    #[must_use]
    pub const fn store(&self) -> &TaskStore {
        &self.store
    }

    /// The error banner.
    #[must_use]
    pub const fn notice(&self) -> &ErrorNotice {
        &self.notice
    }

    /// The gateway requests go through.
    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Owner of the managed tasks.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Current status filter.
    #[must_use]
    pub const fn filter(&self) -> Filter {
        self.filter
    }

    /// Select a status filter.
    pub const fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Tasks passing the current filter.
    #[must_use]
    pub fn visible(&self) -> Vec<&Task> {
        filter::visible(self.store.tasks(), self.filter)
    }

    /// Text of the new-task input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Mutable access to the new-task input.
    pub const fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    /// Replace the new-task input.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Whether any gateway request has not been applied yet.
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending > 0
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Fetch the task list. A failure shows [`ErrorKind::LoadTodos`].
    pub fn load(&mut self) {
        tracing::info!(user_id = %self.user_id, "loading tasks");
        let gateway = Arc::clone(&self.gateway);
        let user = self.user_id;
        self.spawn(async move { Settlement::Loaded(gateway.list(user).await) });
    }

    /// Create a task from the input text.
    ///
    /// # Errors
    ///
    /// See [`create`](Self::create).
    pub fn submit(&mut self) -> Result<(), SyncError> {
        let title = self.input.clone();
        self.create(&title)
    }

    /// Create a task titled `title` (trimmed).
    ///
    /// The draft is shown and [`TaskId::DRAFT`] is in flight until the
    /// gateway answers. On success the created task is appended and the
    /// input is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::EmptyTitle`] (and shows it) for a blank title,
    /// or [`SyncError::CreationPending`] while an earlier creation is in
    /// flight. Neither contacts the gateway.
    pub fn create(&mut self, title: &str) -> Result<(), SyncError> {
        if self.store.draft().is_some() {
            return Err(SyncError::CreationPending);
        }
        let title = match normalize_title(title) {
            Ok(title) => title,
            Err(e) => {
                self.raise(ErrorKind::EmptyTitle);
                return Err(e.into());
            }
        };

        let draft = Task::draft(self.user_id, title);
        let body = NewTask::from(&draft);
        self.store.add_in_flight(TaskId::DRAFT);
        self.store.set_draft(Some(draft));

        tracing::debug!(title = %body.title, "creating task");
        let gateway = Arc::clone(&self.gateway);
        self.spawn(async move { Settlement::Created(gateway.create(body).await) });
        Ok(())
    }

    /// Delete the task `id`.
    ///
    /// The outcome resolves to whether the task was deleted. The request is
    /// issued even for an identifier missing from the list; the draft
    /// identifier resolves to `false` without one.
    pub fn delete(&mut self, id: TaskId) -> Outcome {
        if id.is_draft() {
            return Outcome::ready(false);
        }
        let (reply, outcome) = Outcome::channel();
        self.schedule(id, Queued::Delete { reply });
        outcome
    }

    /// Delete every task in `ids`, each independently.
    pub fn delete_many(&mut self, ids: impl IntoIterator<Item = TaskId>) {
        for id in ids {
            drop(self.delete(id));
        }
    }

    /// Delete every completed task. Returns how many deletes were requested.
    pub fn delete_completed(&mut self) -> usize {
        let ids = filter::completed_ids(self.store.tasks());
        let count = ids.len();
        tracing::debug!(count, "clearing completed tasks");
        self.delete_many(ids);
        count
    }

    /// Flip the completion flag of task `id`. Unknown identifiers are ignored.
    pub fn toggle(&mut self, id: TaskId) {
        if self.store.get(id).is_none() {
            return;
        }
        self.schedule(id, Queued::Toggle);
    }

    /// Complete every task, or reopen every task if all are completed.
    ///
    /// Only tasks whose flag differs from the target are touched. Returns
    /// how many updates were requested.
    pub fn toggle_all(&mut self) -> usize {
        let target = !filter::all_completed(self.store.tasks());
        let ids: Vec<TaskId> = self
            .store
            .tasks()
            .iter()
            .filter(|t| t.completed != target)
            .map(|t| t.id)
            .collect();

        tracing::debug!(completed = target, count = ids.len(), "toggling all tasks");
        for &id in &ids {
            self.schedule(id, Queued::SetCompleted(target));
        }
        ids.len()
    }

    /// Rename task `id` to `title` (trimmed).
    ///
    /// A blank title deletes the task instead. The outcome resolves to
    /// whether the rename (or delete) succeeded; an unknown identifier
    /// resolves to `false`.
    pub fn rename(&mut self, id: TaskId, title: &str) -> Outcome {
        if self.store.get(id).is_none() {
            return Outcome::ready(false);
        }
        let Ok(title) = normalize_title(title) else {
            tracing::debug!(task_id = %id, "empty title, deleting task");
            return self.delete(id);
        };

        let (reply, outcome) = Outcome::channel();
        self.schedule(id, Queued::Rename { title, reply });
        outcome
    }

    /// Hide the error banner now.
    pub fn dismiss_error(&mut self) {
        self.notice.dismiss();
    }

    // -----------------------------------------------------------------------
    // Settlement driving
    // -----------------------------------------------------------------------

    /// Apply every settlement that has already arrived, without waiting.
    ///
    /// Returns how many were applied.
    pub fn drain_settlements(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(settlement) = self.rx.try_recv() {
            self.apply(settlement);
            applied += 1;
        }
        applied
    }

    /// Wait for the next settlement (or notice expiry) and apply it.
    pub async fn settle_next(&mut self) {
        if let Some(settlement) = self.rx.recv().await {
            self.apply(settlement);
        }
    }

    /// Apply settlements until no gateway request is outstanding.
    pub async fn run_until_idle(&mut self) {
        while self.pending > 0 {
            self.settle_next().await;
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn spawn(&mut self, request: impl Future<Output = Settlement> + Send + 'static) {
        self.pending += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(request.await);
        });
    }

    fn raise(&mut self, kind: ErrorKind) {
        self.notice.raise(kind, self.tx.clone());
    }

    /// Start `op` now, or queue it behind the request already running for `id`.
    fn schedule(&mut self, id: TaskId, op: Queued) {
        if self.store.is_in_flight(id) {
            tracing::debug!(task_id = %id, "task busy, queueing operation");
            self.queued.entry(id).or_default().push_back(op);
        } else {
            self.start(id, op, false);
        }
    }

    /// Issue the request for `op`. Returns `false` if there was nothing to do.
    ///
    /// A queued operation whose task disappeared while it waited does nothing.
    fn start(&mut self, id: TaskId, op: Queued, was_queued: bool) -> bool {
        let op = match op {
            Queued::Delete { reply } if !was_queued => {
                self.spawn_delete(id, reply);
                self.store.add_in_flight(id);
                return true;
            }
            other => other,
        };
        let Some(task) = self.store.get(id).cloned() else {
            tracing::debug!(task_id = %id, "task no longer present");
            match op {
                Queued::Rename { reply, .. } | Queued::Delete { reply } => {
                    let _ = reply.send(false);
                }
                Queued::Toggle | Queued::SetCompleted(_) => {}
            }
            return false;
        };

        match op {
            Queued::Toggle => {
                let completed = !task.completed;
                self.spawn_update(task.with_completed(completed), Change::Completed(completed), None);
            }
            Queued::SetCompleted(completed) => {
                if task.completed == completed {
                    return false;
                }
                self.spawn_update(task.with_completed(completed), Change::Completed(completed), None);
            }
            Queued::Rename { title, reply } => {
                self.spawn_update(task.with_title(title.clone()), Change::Title(title), Some(reply));
            }
            Queued::Delete { reply } => self.spawn_delete(id, reply),
        }
        self.store.add_in_flight(id);
        true
    }

    fn spawn_delete(&mut self, id: TaskId, reply: oneshot::Sender<bool>) {
        let gateway = Arc::clone(&self.gateway);
        self.spawn(async move {
            let result = gateway.delete(id).await;
            Settlement::Deleted { id, result, reply }
        });
    }

    fn spawn_update(&mut self, task: Task, change: Change, reply: Option<oneshot::Sender<bool>>) {
        let id = task.id;
        let patch = TaskPatch::full(&task);
        let gateway = Arc::clone(&self.gateway);
        self.spawn(async move {
            let result = gateway.update(id, patch).await;
            Settlement::Updated {
                id,
                change,
                result,
                reply,
            }
        });
    }

    /// Start the next queued operation for `id`, or clear its in-flight mark.
    fn finish(&mut self, id: TaskId) {
        while let Some(op) = self.queued.get_mut(&id).and_then(VecDeque::pop_front) {
            if self.start(id, op, true) {
                return;
            }
        }
        self.queued.remove(&id);
        self.store.remove_in_flight(id);
    }

    fn apply(&mut self, settlement: Settlement) {
        match settlement {
            Settlement::Loaded(result) => {
                self.pending = self.pending.saturating_sub(1);
                match result {
                    Ok(tasks) => {
                        tracing::info!(count = tasks.len(), "tasks loaded");
                        self.store.set_tasks(tasks);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to load tasks");
                        self.raise(ErrorKind::LoadTodos);
                    }
                }
            }
            Settlement::Created(result) => {
                self.pending = self.pending.saturating_sub(1);
                match result {
                    Ok(task) => {
                        tracing::info!(task_id = %task.id, "task created");
                        self.store.push_task(task);
                        self.input.clear();
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to create task");
                        self.raise(ErrorKind::AddTodo);
                    }
                }
                self.finish(TaskId::DRAFT);
                self.store.set_draft(None);
            }
            Settlement::Updated {
                id,
                change,
                result,
                reply,
            } => {
                self.pending = self.pending.saturating_sub(1);
                let ok = match result {
                    Ok(_) => {
                        tracing::debug!(task_id = %id, ?change, "task updated");
                        self.store.replace_task(id, |t| change.apply_to(t));
                        true
                    }
                    Err(e) => {
                        tracing::warn!(task_id = %id, error = %e, "failed to update task");
                        self.raise(ErrorKind::UpdateTodo);
                        false
                    }
                };
                if let Some(reply) = reply {
                    let _ = reply.send(ok);
                }
                self.finish(id);
            }
            Settlement::Deleted { id, result, reply } => {
                self.pending = self.pending.saturating_sub(1);
                let ok = match result {
                    Ok(()) => {
                        tracing::debug!(task_id = %id, "task deleted");
                        self.store.remove_task(id);
                        true
                    }
                    Err(e) => {
                        tracing::warn!(task_id = %id, error = %e, "failed to delete task");
                        self.raise(ErrorKind::DeleteTodo);
                        false
                    }
                };
                let _ = reply.send(ok);
                self.finish(id);
            }
            Settlement::NoticeExpired { generation } => {
                if self.notice.expire(generation) {
                    tracing::trace!(generation, "error notice expired");
                }
            }
        }
    }
}
