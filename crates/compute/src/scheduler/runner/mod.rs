//! Dataflow scheduler runner -- owns the task graph and the worker pools.
//!
//! Split into focused submodules:
//! - `core`: Scheduler struct, errors, submission and accessors
//! - `execution`: the dispatcher loop and the worker-side task wrapper
//! - `scheduling`: handing ready tasks to pools and applying worker events

mod core;
mod execution;
mod scheduling;

pub use self::core::{Scheduler, SchedulerError};
