use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use gridsearch_core::ExpansionError;

use super::types::{Lane, Priority, TaskId, TaskOutcome};

/// Error type for task execution. Any error fails the whole run.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("{stage} expansion failed: {source}")]
    Expansion {
        stage: String,
        #[source]
        source: ExpansionError,
    },
    #[error("input of {0} was never produced")]
    MissingInput(String),
    #[error("output of {0} was already written")]
    SlotFilled(String),
    #[error("task panicked: {0}")]
    Panicked(String),
}

/// A unit of work the scheduler can execute.
///
/// Tasks run at most once. They grow the task graph by spawning children
/// through the [`TaskContext`] they are handed.
pub trait SearchTask: Send {
    /// Stage name for logging, metrics and failure reports.
    fn name(&self) -> &'static str;

    fn lane(&self) -> Lane;

    fn priority(&self) -> Priority;

    fn execute(&self, ctx: &mut TaskContext) -> Result<TaskOutcome, TaskError>;
}

/// A task waiting to join the graph, with the producers it depends on.
pub(crate) struct TaskSpec {
    pub(crate) id: TaskId,
    pub(crate) after: Vec<TaskId>,
    pub(crate) task: Box<dyn SearchTask>,
}

impl std::fmt::Debug for TaskSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskSpec")
            .field("id", &self.id)
            .field("name", &self.task.name())
            .field("after", &self.after)
            .finish()
    }
}

/// Hands out task ids. Shared between the scheduler and every running task.
#[derive(Debug, Clone, Default)]
pub(crate) struct IdAllocator {
    next: Arc<AtomicU64>,
}

impl IdAllocator {
    pub(crate) fn next(&self) -> TaskId {
        TaskId::new(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// What a running task sees of the scheduler.
///
/// Children are buffered and only join the graph once the parent completes,
/// so a failed task never leaves partial work behind.
#[derive(Debug)]
pub struct TaskContext {
    id: TaskId,
    ids: IdAllocator,
    spawned: Vec<TaskSpec>,
}

impl TaskContext {
    pub(crate) fn new(id: TaskId, ids: IdAllocator) -> Self {
        Self {
            id,
            ids,
            spawned: Vec::new(),
        }
    }

    /// Id of the running task.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Spawn an independent child.
    pub fn spawn(&mut self, task: impl SearchTask + 'static) -> TaskId {
        self.spawn_after(&[], task)
    }

    /// Spawn a child that becomes ready once every task in `after` completed.
    /// Producers spawned earlier from the same context may be named here.
    pub fn spawn_after(&mut self, after: &[TaskId], task: impl SearchTask + 'static) -> TaskId {
        let id = self.ids.next();
        self.spawned.push(TaskSpec {
            id,
            after: after.to_vec(),
            task: Box::new(task),
        });
        id
    }

    pub fn spawned(&self) -> usize {
        self.spawned.len()
    }

    pub(crate) fn into_spawned(self) -> Vec<TaskSpec> {
        self.spawned
    }
}
