use std::sync::Arc;

use gridsearch_core::{CandidateRecord, Slot};
use tracing::trace;

use crate::scheduler::{Lane, Priority, SearchTask, TaskContext, TaskError, TaskOutcome};
use crate::search::state::{SearchShared, SearchStage};

use super::{ExpandTask, HarvestTask};

/// One recursive solve step on a partial board.
///
/// Checks the termination signal on entry; once a solution has been found
/// the task does nothing, which prunes the rest of its subtree.
pub struct SolveTask {
    shared: Arc<SearchShared>,
    record: CandidateRecord,
}

impl SolveTask {
    pub fn new(shared: Arc<SearchShared>, record: CandidateRecord) -> Self {
        Self { shared, record }
    }
}

impl SearchTask for SolveTask {
    fn name(&self) -> &'static str {
        "solve"
    }

    fn lane(&self) -> Lane {
        Lane::Control
    }

    fn priority(&self) -> Priority {
        Priority(self.record.fill_count)
    }

    fn execute(&self, ctx: &mut TaskContext) -> Result<TaskOutcome, TaskError> {
        if self.shared.signal.is_raised() {
            trace!(task = %ctx.id(), fill = self.record.fill_count, "Already solved, pruning");
            return Ok(TaskOutcome::Pruned);
        }

        let slot = Slot::new();
        let expand = ctx.spawn(ExpandTask::new(
            Arc::clone(&self.shared),
            SearchStage::Solve,
            self.record.board.clone(),
            self.record.fill_count,
            slot.clone(),
        ));
        ctx.spawn_after(
            &[expand],
            HarvestTask::new(Arc::clone(&self.shared), self.record.fill_count, slot),
        );
        Ok(TaskOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::search::tasks::fixtures::{context, record, shared, Canned};

    #[test]
    fn spawns_expand_then_harvest() {
        let shared = shared(Canned(Ok(vec![])), Arc::default());
        let task = SolveTask::new(shared, record(1, 9));
        assert_eq!(task.priority(), Priority(9));

        let mut ctx = context();
        assert_eq!(task.execute(&mut ctx).unwrap(), TaskOutcome::Completed);
        assert_eq!(ctx.spawned(), 2);
    }

    #[test]
    fn raised_signal_prunes_without_children() {
        let shared = shared(Canned(Ok(vec![])), Arc::default());
        shared.signal.increment();
        let task = SolveTask::new(Arc::clone(&shared), record(1, 9));

        let mut ctx = context();
        assert_eq!(task.execute(&mut ctx).unwrap(), TaskOutcome::Pruned);
        assert_eq!(ctx.spawned(), 0);

        // Pruning again changes nothing.
        let again = SolveTask::new(shared, record(2, 10));
        let mut ctx = context();
        assert_eq!(again.execute(&mut ctx).unwrap(), TaskOutcome::Pruned);
        assert_eq!(ctx.spawned(), 0);
    }
}
