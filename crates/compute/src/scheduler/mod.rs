//! Priority-driven dataflow scheduler for dynamically growing task graphs.
//!
//! Tasks declare the producers they depend on and a priority; ready tasks are
//! handed to one of two worker lanes, highest priority first. A running task
//! may spawn children, which join the graph when it completes. The first
//! failing task ends the run.

pub mod metrics;
pub mod runner;
pub(crate) mod state;
pub mod task;
pub mod types;

pub use metrics::SchedulerMetrics;
pub use runner::{Scheduler, SchedulerError};
pub use task::{SearchTask, TaskContext, TaskError};
pub use types::{Lane, Priority, SchedulerConfig, TaskId, TaskOutcome, TaskState};
