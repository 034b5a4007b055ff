use std::fmt;

use serde::{Deserialize, Serialize};

pub use gridsearch_core::SchedulerConfig;

/// Identifier of one task in a scheduler run.
///
/// Only the scheduler hands these out, so every id a task can name as a
/// dependency belongs to a task that is either live or already finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Task execution priority. Higher value = dispatched earlier among ready tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Priority(pub u32);

impl Priority {
    pub const LOWEST: Priority = Priority(0);
    pub const HIGHEST: Priority = Priority(u32::MAX);
}

/// Worker partition a task runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    /// Short bookkeeping tasks: reading results, spawning children, reporting.
    Control,
    /// Long-running calls into the expansion service.
    Compute,
}

impl Lane {
    pub const ALL: [Lane; 2] = [Lane::Control, Lane::Compute];

    pub(crate) fn index(self) -> usize {
        match self {
            Lane::Control => 0,
            Lane::Compute => 1,
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lane::Control => f.write_str("control"),
            Lane::Compute => f.write_str("compute"),
        }
    }
}

/// Per-task lifecycle: `Created -> Ready -> Running -> Completed | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    /// Waiting on at least one producer.
    Created,
    /// All producers completed; queued by priority.
    Ready,
    Running,
    Completed,
    Failed,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed)
    }
}

/// How a successfully finished task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskOutcome {
    Completed,
    /// Skipped its work after observing the termination signal.
    Pruned,
}
