pub mod board;
pub mod config;
pub mod error;
pub mod expansion;
pub mod signal;
pub mod slot;

pub use board::*;
pub use config::{Config, SchedulerConfig, SearchParams};
pub use error::*;
pub use expansion::{ExpansionService, Solution, SolutionSink};
pub use signal::TerminationAccumulator;
pub use slot::Slot;
