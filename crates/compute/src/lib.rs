//! Priority-driven parallel search over a dataflow task graph.

pub mod engine;
pub mod scheduler;
pub mod search;

pub use engine::{SearchEngine, SearchError, SearchOutcome};
pub use scheduler::{
    Lane, Priority, Scheduler, SchedulerConfig, SchedulerError, SchedulerMetrics, SearchTask,
    TaskContext, TaskError, TaskId, TaskOutcome,
};
