use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use tracing::debug;

use crate::scheduler::metrics::SchedulerMetrics;
use crate::scheduler::state::TaskGraph;
use crate::scheduler::task::{IdAllocator, SearchTask, TaskError, TaskSpec};
use crate::scheduler::types::{SchedulerConfig, TaskId, TaskOutcome};

/// Why a run ended without finishing its task graph.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("task {task} ({name}) failed: {source}")]
    TaskFailed {
        task: TaskId,
        name: &'static str,
        #[source]
        source: TaskError,
    },
    #[error("{blocked} tasks wait on producers that can never complete")]
    Stalled { blocked: usize },
    #[error("worker event channel disconnected")]
    Disconnected,
}

/// Worker to dispatcher notification.
pub(super) enum Event {
    Completed {
        id: TaskId,
        name: &'static str,
        outcome: TaskOutcome,
        spawned: Vec<TaskSpec>,
        elapsed: Duration,
    },
    Failed {
        id: TaskId,
        name: &'static str,
        error: TaskError,
    },
}

/// The dataflow scheduler. Runs a dynamically growing set of
/// [`SearchTask`]s on two worker pools until no task is left.
pub struct Scheduler {
    pub(super) config: SchedulerConfig,
    pub(super) graph: TaskGraph,
    pub(super) ids: IdAllocator,
    pub(super) metrics: SchedulerMetrics,
    pub(super) events_tx: Sender<Event>,
    pub(super) events_rx: Receiver<Event>,
    /// First failure seen. Once set, nothing new is dispatched.
    pub(super) failure: Option<SchedulerError>,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        let (events_tx, events_rx) = crossbeam_channel::unbounded();
        Self {
            config,
            graph: TaskGraph::default(),
            ids: IdAllocator::default(),
            metrics: SchedulerMetrics::default(),
            events_tx,
            events_rx,
            failure: None,
        }
    }

    /// Add a root task that is ready immediately.
    pub fn submit(&mut self, task: impl SearchTask + 'static) -> TaskId {
        self.submit_after(&[], task)
    }

    /// Add a root task that waits for every task in `after` to complete.
    pub fn submit_after(&mut self, after: &[TaskId], task: impl SearchTask + 'static) -> TaskId {
        let id = self.ids.next();
        debug!(task = %id, name = task.name(), deps = after.len(), "Submitted task");
        self.graph.insert(TaskSpec {
            id,
            after: after.to_vec(),
            task: Box::new(task),
        });
        id
    }

    /// Tasks not yet finished.
    pub fn pending(&self) -> usize {
        self.graph.live()
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}
