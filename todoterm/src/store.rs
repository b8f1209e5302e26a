//! In-memory task store.
//!
//! Holds the task list, the draft shown while a creation is in flight, and
//! the set of identifiers with an unsettled network operation. State is
//! only ever replaced, never edited in place, and every replacement bumps
//! a revision published on a [`watch`] channel so observers can redraw.

use std::collections::HashSet;

use tokio::sync::watch;

use todoterm_proto::task::{Task, TaskId};

/// Authoritative client-side task state.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    draft: Option<Task>,
    in_flight: HashSet<TaskId>,
    revision: watch::Sender<u64>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// An empty store at revision 0.
    #[must_use]
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            tasks: Vec::new(),
            draft: None,
            in_flight: HashSet::new(),
            revision,
        }
    }

    /// The task list in display order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The pending creation placeholder, if any.
    #[must_use]
    pub const fn draft(&self) -> Option<&Task> {
        self.draft.as_ref()
    }

    /// Identifiers with an unsettled network operation.
    #[must_use]
    pub const fn in_flight(&self) -> &HashSet<TaskId> {
        &self.in_flight
    }

    /// Whether `id` has an unsettled network operation.
    #[must_use]
    pub fn is_in_flight(&self, id: TaskId) -> bool {
        self.in_flight.contains(&id)
    }

    /// Look up a task by identifier.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Current revision; increases by one per state change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Subscribe to revision changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Replace the whole task list.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.bump();
    }

    /// Set or clear the creation placeholder.
    pub fn set_draft(&mut self, draft: Option<Task>) {
        self.draft = draft;
        self.bump();
    }

    /// Mark `id` as in flight. Adding a present id changes nothing.
    pub fn add_in_flight(&mut self, id: TaskId) {
        if self.in_flight.insert(id) {
            self.bump();
        }
    }

    /// Clear the in-flight mark for `id`. Removing an absent id changes nothing.
    pub fn remove_in_flight(&mut self, id: TaskId) {
        if self.in_flight.remove(&id) {
            self.bump();
        }
    }

    /// Append `task` to the list.
    pub fn push_task(&mut self, task: Task) {
        let mut tasks = self.tasks.clone();
        tasks.push(task);
        self.set_tasks(tasks);
    }

    /// Drop the task with identifier `id`. Returns whether it was present.
    pub fn remove_task(&mut self, id: TaskId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        let tasks = self.tasks.iter().filter(|t| t.id != id).cloned().collect();
        self.set_tasks(tasks);
        true
    }

    /// Rewrite the task with identifier `id` through `update`.
    ///
    /// Returns whether the task was present; an absent id leaves the list
    /// and revision untouched.
    pub fn replace_task(&mut self, id: TaskId, update: impl FnOnce(&Task) -> Task) -> bool {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            return false;
        };
        let mut tasks = self.tasks.clone();
        tasks[index] = update(&self.tasks[index]);
        self.set_tasks(tasks);
        true
    }

    fn bump(&self) {
        self.revision.send_modify(|r| *r += 1);
    }
}
