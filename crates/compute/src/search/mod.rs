//! Task graph constructor: turns one start board into fan-out, solve,
//! harvest and report tasks for the scheduler.

pub mod state;
pub mod tasks;

pub use state::{SearchShared, SearchStage};
pub use tasks::{ExpandTask, FanOutTask, HarvestTask, ReportTask, SolveTask};
