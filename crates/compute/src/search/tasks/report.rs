use std::sync::Arc;

use gridsearch_core::{CandidateRecord, Solution};
use tracing::info;

use crate::scheduler::{Lane, Priority, SearchTask, TaskContext, TaskError, TaskOutcome};
use crate::search::state::SearchShared;

/// Renders a full board and hands it to the solution sink.
pub struct ReportTask {
    shared: Arc<SearchShared>,
    record: CandidateRecord,
}

impl ReportTask {
    pub fn new(shared: Arc<SearchShared>, record: CandidateRecord) -> Self {
        Self { shared, record }
    }
}

impl SearchTask for ReportTask {
    fn name(&self) -> &'static str {
        "report"
    }

    fn lane(&self) -> Lane {
        Lane::Control
    }

    fn priority(&self) -> Priority {
        Priority::HIGHEST
    }

    fn execute(&self, ctx: &mut TaskContext) -> Result<TaskOutcome, TaskError> {
        let rendered = self
            .shared
            .service
            .render(&self.record.board)
            .map_err(|source| TaskError::Expansion {
                stage: self.name().to_string(),
                source,
            })?;

        info!(task = %ctx.id(), fill = self.record.fill_count, "Solution found");
        self.shared.sink.report(&Solution {
            board: self.record.board.clone(),
            fill_count: self.record.fill_count,
            rendered,
        });
        Ok(TaskOutcome::Completed)
    }
}
