use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::types::{Lane, TaskOutcome};

/// Scheduler operational metrics for one run.
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerMetrics {
    /// When the dispatcher started.
    pub started_at: DateTime<Utc>,
    /// Total tasks executed by name.
    pub tasks_executed: HashMap<String, u64>,
    /// Average task duration by task name.
    pub avg_task_duration: HashMap<String, Duration>,
    /// Tasks that skipped their work because the search was already solved.
    pub tasks_pruned: u64,
    pub tasks_failed: u64,
    /// Deepest ready queue seen on the control lane.
    pub peak_ready_control: usize,
    /// Deepest ready queue seen on the compute lane.
    pub peak_ready_compute: usize,
    /// Highest fraction of compute workers busy at once (0.0 - 1.0).
    pub peak_worker_utilization: f64,
}

impl Default for SchedulerMetrics {
    fn default() -> Self {
        Self {
            started_at: Utc::now(),
            tasks_executed: HashMap::new(),
            avg_task_duration: HashMap::new(),
            tasks_pruned: 0,
            tasks_failed: 0,
            peak_ready_control: 0,
            peak_ready_compute: 0,
            peak_worker_utilization: 0.0,
        }
    }
}

impl SchedulerMetrics {
    /// Record a task execution.
    pub fn record_execution(&mut self, task_name: &str, duration: Duration, outcome: TaskOutcome) {
        *self.tasks_executed.entry(task_name.to_string()).or_default() += 1;
        if outcome == TaskOutcome::Pruned {
            self.tasks_pruned += 1;
        }

        // Update rolling average duration
        let count = self.tasks_executed[task_name];
        let prev_avg = self
            .avg_task_duration
            .get(task_name)
            .copied()
            .unwrap_or_default();

        // Incremental mean: new_avg = prev_avg + (duration - prev_avg) / count
        let new_avg = if count == 1 {
            duration
        } else {
            let prev_nanos = prev_avg.as_nanos() as f64;
            let cur_nanos = duration.as_nanos() as f64;
            let avg_nanos = prev_nanos + (cur_nanos - prev_nanos) / count as f64;
            Duration::from_nanos(avg_nanos as u64)
        };

        self.avg_task_duration
            .insert(task_name.to_string(), new_avg);
    }

    pub fn record_failure(&mut self) {
        self.tasks_failed += 1;
    }

    pub fn observe_ready_depth(&mut self, lane: Lane, depth: usize) {
        let peak = match lane {
            Lane::Control => &mut self.peak_ready_control,
            Lane::Compute => &mut self.peak_ready_compute,
        };
        *peak = (*peak).max(depth);
    }

    pub fn observe_utilization(&mut self, busy: usize, workers: usize) {
        if workers > 0 {
            self.peak_worker_utilization = self.peak_worker_utilization.max(busy as f64 / workers as f64);
        }
    }

    /// Tasks executed across all names, pruned ones included.
    pub fn total_executed(&self) -> u64 {
        self.tasks_executed.values().sum()
    }
}
