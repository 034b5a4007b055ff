use std::sync::Arc;

use gridsearch_core::{CandidateRecord, Slot};

use crate::scheduler::{Lane, Priority, SearchTask, TaskContext, TaskError, TaskOutcome};
use crate::search::state::SearchShared;

use super::{ReportTask, SolveTask};

/// Sorts the results of one solve step: full boards raise the termination
/// signal and get reported, the rest recurse into new solve tasks.
pub struct HarvestTask {
    shared: Arc<SearchShared>,
    fill_count: u32,
    input: Slot<Vec<CandidateRecord>>,
}

impl HarvestTask {
    pub fn new(shared: Arc<SearchShared>, fill_count: u32, input: Slot<Vec<CandidateRecord>>) -> Self {
        Self {
            shared,
            fill_count,
            input,
        }
    }
}

impl SearchTask for HarvestTask {
    fn name(&self) -> &'static str {
        "harvest"
    }

    fn lane(&self) -> Lane {
        Lane::Control
    }

    fn priority(&self) -> Priority {
        Priority(self.fill_count)
    }

    fn execute(&self, ctx: &mut TaskContext) -> Result<TaskOutcome, TaskError> {
        let records = self
            .input
            .get()
            .ok_or_else(|| TaskError::MissingInput(self.name().to_string()))?;

        for record in records {
            if self.shared.is_full(record) {
                self.shared.signal.increment();
                ctx.spawn(ReportTask::new(Arc::clone(&self.shared), record.clone()));
            } else {
                ctx.spawn(SolveTask::new(Arc::clone(&self.shared), record.clone()));
            }
        }
        Ok(TaskOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::search::tasks::fixtures::{context, record, shared, Canned};

    #[test]
    fn full_boards_raise_signal_and_partial_ones_recurse() {
        let shared = shared(Canned(Ok(vec![])), Arc::default());
        let slot = Slot::new();
        // Board size 4: 16 cells make a full board.
        slot.fill(vec![record(1, 16), record(2, 12), record(3, 16)]).unwrap();
        let task = HarvestTask::new(Arc::clone(&shared), 10, slot);

        let mut ctx = context();
        task.execute(&mut ctx).unwrap();
        assert_eq!(ctx.spawned(), 3);
        assert_eq!(shared.signal.snapshot(), 2);
    }

    #[test]
    fn empty_result_ends_branch_quietly() {
        let shared = shared(Canned(Ok(vec![])), Arc::default());
        let slot = Slot::new();
        slot.fill(vec![]).unwrap();
        let task = HarvestTask::new(Arc::clone(&shared), 10, slot);

        let mut ctx = context();
        assert_eq!(task.execute(&mut ctx).unwrap(), TaskOutcome::Completed);
        assert_eq!(ctx.spawned(), 0);
        assert!(!shared.signal.is_raised());
    }
}
