//! In-process gateway for testing.
//!
//! [`MemoryGateway`] keeps a task collection in memory, records every call
//! it receives, and can be told to reject chosen operations so failure
//! paths can be exercised without a network.

use std::collections::HashSet;

use parking_lot::Mutex;

use todoterm_proto::task::{NewTask, Task, TaskId, TaskPatch, UserId};

use super::{GatewayError, GatewayType, TaskGateway};

/// Which gateway operation a call or injected failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOp {
    /// `list`
    List,
    /// `create`
    Create,
    /// `update`
    Update,
    /// `delete`
    Delete,
}

/// A call received by the [`MemoryGateway`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// `list(user)`
    List(UserId),
    /// `create(task)`
    Create(NewTask),
    /// `update(id, patch)`
    Update(TaskId, TaskPatch),
    /// `delete(id)`
    Delete(TaskId),
}

impl GatewayCall {
    /// The operation this call invoked.
    #[must_use]
    pub const fn op(&self) -> GatewayOp {
        match self {
            Self::List(_) => GatewayOp::List,
            Self::Create(_) => GatewayOp::Create,
            Self::Update(..) => GatewayOp::Update,
            Self::Delete(_) => GatewayOp::Delete,
        }
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    tasks: Vec<Task>,
    next_id: u64,
    calls: Vec<GatewayCall>,
    /// `(op, None)` rejects every call of that op; `(op, Some(id))` only that id.
    failures: HashSet<(GatewayOp, Option<TaskId>)>,
}

impl MemoryState {
    fn should_fail(&self, op: GatewayOp, id: Option<TaskId>) -> bool {
        self.failures.contains(&(op, None))
            || id.is_some_and(|id| self.failures.contains(&(op, Some(id))))
    }
}

/// Task collection held in memory.
#[derive(Debug)]
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGateway {
    /// An empty collection; identifiers are assigned from 1.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tasks(Vec::new())
    }

    /// A collection pre-filled with `tasks`.
    ///
    /// New identifiers continue after the largest seeded one.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|t| t.id.get()).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(MemoryState {
                tasks,
                next_id,
                ..MemoryState::default()
            }),
        }
    }

    /// Reject every subsequent call of `op`.
    pub fn fail(&self, op: GatewayOp) {
        self.state.lock().failures.insert((op, None));
    }

    /// Reject subsequent calls of `op` that target `id`.
    pub fn fail_for(&self, op: GatewayOp, id: TaskId) {
        self.state.lock().failures.insert((op, Some(id)));
    }

    /// Stop rejecting anything.
    pub fn clear_failures(&self) {
        self.state.lock().failures.clear();
    }

    /// Snapshot of the collection.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().tasks.clone()
    }

    /// Every call received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state.lock().calls.clone()
    }

    /// Number of calls received for `op`.
    #[must_use]
    pub fn call_count(&self, op: GatewayOp) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.op() == op)
            .count()
    }
}

impl TaskGateway for MemoryGateway {
    async fn list(&self, user: UserId) -> Result<Vec<Task>, GatewayError> {
        let mut state = self.state.lock();
        state.calls.push(GatewayCall::List(user));
        if state.should_fail(GatewayOp::List, None) {
            return Err(GatewayError::Status { status: 500 });
        }
        Ok(state
            .tasks
            .iter()
            .filter(|t| t.user_id == user)
            .cloned()
            .collect())
    }

    async fn create(&self, task: NewTask) -> Result<Task, GatewayError> {
        let mut state = self.state.lock();
        state.calls.push(GatewayCall::Create(task.clone()));
        if state.should_fail(GatewayOp::Create, None) {
            return Err(GatewayError::Status { status: 500 });
        }
        let created = Task {
            id: TaskId::new(state.next_id),
            user_id: task.user_id,
            title: task.title,
            completed: task.completed,
        };
        state.next_id += 1;
        state.tasks.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Task, GatewayError> {
        let mut state = self.state.lock();
        state.calls.push(GatewayCall::Update(id, patch.clone()));
        if state.should_fail(GatewayOp::Update, Some(id)) {
            return Err(GatewayError::Status { status: 500 });
        }
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(GatewayError::NotFound(id))?;
        *task = patch.apply(task);
        Ok(task.clone())
    }

    async fn delete(&self, id: TaskId) -> Result<(), GatewayError> {
        let mut state = self.state.lock();
        state.calls.push(GatewayCall::Delete(id));
        if state.should_fail(GatewayOp::Delete, Some(id)) {
            return Err(GatewayError::Status { status: 500 });
        }
        let before = state.tasks.len();
        state.tasks.retain(|t| t.id != id);
        if state.tasks.len() == before {
            return Err(GatewayError::NotFound(id));
        }
        Ok(())
    }

    fn gateway_type(&self) -> GatewayType {
        GatewayType::Memory
    }
}
