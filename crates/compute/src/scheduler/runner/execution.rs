use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use crossbeam_channel::Sender;
use tracing::{debug, info};

use crate::scheduler::metrics::SchedulerMetrics;
use crate::scheduler::task::{IdAllocator, SearchTask, TaskContext, TaskError};
use crate::scheduler::types::{Lane, TaskId};

use super::core::{Event, Scheduler, SchedulerError};

impl Scheduler {
    /// Run until every task has finished or one has failed.
    ///
    /// The calling thread becomes the dispatcher: it alone touches the task
    /// graph, while tasks execute on a compute pool and a control pool.
    /// After a failure, running tasks are drained and their children
    /// discarded before the failure is returned.
    pub fn run(mut self) -> Result<SchedulerMetrics, SchedulerError> {
        let compute_workers = self.config.resolved_worker_threads();
        let control_workers = self.config.control_threads.max(1);
        info!(
            "Scheduler starting with {} compute workers, {} control workers, {} tasks",
            compute_workers,
            control_workers,
            self.graph.live()
        );

        let compute = rayon::ThreadPoolBuilder::new()
            .num_threads(compute_workers)
            .thread_name(|i| format!("search-compute-{}", i))
            .build()?;
        let control = rayon::ThreadPoolBuilder::new()
            .num_threads(control_workers)
            .thread_name(|i| format!("search-control-{}", i))
            .build()?;

        let started = Instant::now();
        self.metrics = SchedulerMetrics::default();

        loop {
            if self.failure.is_none() {
                self.dispatch(Lane::Compute, &compute, compute_workers);
                self.dispatch(Lane::Control, &control, control_workers);
            }

            if self.graph.running() == 0 {
                if self.failure.is_some() || self.graph.is_empty() {
                    break;
                }
                return Err(SchedulerError::Stalled {
                    blocked: self.graph.blocked(),
                });
            }

            let event = self
                .events_rx
                .recv()
                .map_err(|_| SchedulerError::Disconnected)?;
            self.apply(event);
        }

        info!(
            "Scheduler stopped after {} tasks in {:.3}s",
            self.metrics.total_executed(),
            started.elapsed().as_secs_f64()
        );
        match self.failure.take() {
            Some(failure) => Err(failure),
            None => Ok(self.metrics),
        }
    }
}

/// Worker-side wrapper: run one task and report back to the dispatcher.
pub(super) fn execute_task(
    id: TaskId,
    task: Box<dyn SearchTask>,
    ids: IdAllocator,
    events: Sender<Event>,
) {
    let name = task.name();
    let started = Instant::now();
    let mut ctx = TaskContext::new(id, ids);

    let result = panic::catch_unwind(AssertUnwindSafe(|| task.execute(&mut ctx)));
    let event = match result {
        Ok(Ok(outcome)) => Event::Completed {
            id,
            name,
            outcome,
            spawned: ctx.into_spawned(),
            elapsed: started.elapsed(),
        },
        Ok(Err(error)) => Event::Failed { id, name, error },
        Err(payload) => Event::Failed {
            id,
            name,
            error: TaskError::Panicked(panic_message(payload.as_ref())),
        },
    };

    if events.send(event).is_err() {
        debug!(task = %id, name, "Dispatcher gone, dropping task result");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
