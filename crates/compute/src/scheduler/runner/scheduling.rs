use tracing::{debug, error};

use crate::scheduler::types::{Lane, TaskState};

use super::core::{Event, Scheduler, SchedulerError};
use super::execution::execute_task;

impl Scheduler {
    /// Hand ready tasks of `lane` to its pool while it has idle workers.
    pub(super) fn dispatch(&mut self, lane: Lane, pool: &rayon::ThreadPool, workers: usize) {
        self.metrics
            .observe_ready_depth(lane, self.graph.ready_len(lane));

        while self.graph.running_in(lane) < workers {
            let Some((id, task)) = self.graph.pop_ready(lane) else {
                break;
            };
            let ids = self.ids.clone();
            let events = self.events_tx.clone();
            pool.spawn(move || execute_task(id, task, ids, events));
        }

        if lane == Lane::Compute {
            self.metrics
                .observe_utilization(self.graph.running_in(lane), workers);
        }
    }

    /// Apply one worker event to the graph.
    pub(super) fn apply(&mut self, event: Event) {
        match event {
            Event::Completed {
                id,
                name,
                outcome,
                spawned,
                elapsed,
            } => {
                self.graph.finish(id, TaskState::Completed);
                self.metrics.record_execution(name, elapsed, outcome);
                if self.failure.is_some() {
                    debug!(task = %id, name, discarded = spawned.len(), "Run failed, discarding children");
                    return;
                }
                debug!(task = %id, name, ?outcome, children = spawned.len(), ?elapsed, "Task completed");
                for spec in spawned {
                    self.graph.insert(spec);
                }
            }
            Event::Failed { id, name, error } => {
                self.graph.finish(id, TaskState::Failed);
                self.metrics.record_failure();
                error!(task = %id, name, error = %error, "Task failed");
                if self.failure.is_none() {
                    self.failure = Some(SchedulerError::TaskFailed {
                        task: id,
                        name,
                        source: error,
                    });
                }
            }
        }
    }
}
