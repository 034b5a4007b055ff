use std::sync::Arc;

use gridsearch_core::{BoardHandle, CandidateRecord, ExpansionError, Slot};
use tracing::debug;

use crate::scheduler::{Lane, Priority, SearchTask, TaskContext, TaskError, TaskOutcome};
use crate::search::state::{SearchShared, SearchStage};

/// Calls the expansion service for one board and publishes the successors.
pub struct ExpandTask {
    shared: Arc<SearchShared>,
    stage: SearchStage,
    board: BoardHandle,
    /// Filled cells of `board`; no successor may have fewer.
    fill_count: u32,
    output: Slot<Vec<CandidateRecord>>,
}

impl ExpandTask {
    pub fn new(
        shared: Arc<SearchShared>,
        stage: SearchStage,
        board: BoardHandle,
        fill_count: u32,
        output: Slot<Vec<CandidateRecord>>,
    ) -> Self {
        Self {
            shared,
            stage,
            board,
            fill_count,
            output,
        }
    }

    fn malformed(&self, reason: String) -> TaskError {
        TaskError::Expansion {
            stage: self.stage.to_string(),
            source: ExpansionError::Malformed(reason),
        }
    }

    fn check(&self, records: &[CandidateRecord]) -> Result<(), TaskError> {
        let total = self.shared.params.total_cells();
        for record in records {
            if record.fill_count < self.fill_count {
                return Err(self.malformed(format!(
                    "successor has {} filled cells, its parent had {}",
                    record.fill_count, self.fill_count
                )));
            }
            if record.fill_count > total {
                return Err(self.malformed(format!(
                    "successor has {} filled cells on a board of {}",
                    record.fill_count, total
                )));
            }
        }
        Ok(())
    }
}

impl SearchTask for ExpandTask {
    fn name(&self) -> &'static str {
        match self.stage {
            SearchStage::Split1 => "expand:split1",
            SearchStage::Split2 => "expand:split2",
            SearchStage::Solve => "expand:solve",
        }
    }

    fn lane(&self) -> Lane {
        Lane::Compute
    }

    fn priority(&self) -> Priority {
        match self.stage {
            SearchStage::Solve => Priority(self.fill_count),
            SearchStage::Split1 | SearchStage::Split2 => Priority::LOWEST,
        }
    }

    fn execute(&self, ctx: &mut TaskContext) -> Result<TaskOutcome, TaskError> {
        let quota = self.stage.quota(&self.shared.params);
        let records = self
            .shared
            .service
            .expand(&self.board, self.stage.mode(), quota)
            .map_err(|source| TaskError::Expansion {
                stage: self.stage.to_string(),
                source,
            })?;
        self.check(&records)?;

        debug!(
            task = %ctx.id(),
            stage = %self.stage,
            fill = self.fill_count,
            successors = records.len(),
            "Expanded board"
        );
        self.output
            .fill(records)
            .map_err(|_| TaskError::SlotFilled(self.name().to_string()))?;
        Ok(TaskOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::search::tasks::fixtures::{context, record, shared, Canned, Collect};

    #[test]
    fn publishes_successors() {
        let shared = shared(Canned(Ok(vec![record(1, 5), record(2, 6)])), Arc::default());
        let slot = Slot::new();
        let task = ExpandTask::new(shared, SearchStage::Solve, BoardHandle::new(vec![0]), 5, slot.clone());

        assert_eq!(task.priority(), Priority(5));
        assert_eq!(task.execute(&mut context()).unwrap(), TaskOutcome::Completed);
        assert_eq!(slot.get().map(Vec::len), Some(2));
    }

    #[test]
    fn fan_out_runs_at_lowest_priority() {
        let shared = shared(Canned(Ok(vec![])), Arc::<Collect>::default());
        let task = ExpandTask::new(shared, SearchStage::Split2, BoardHandle::new(vec![0]), 9, Slot::new());
        assert_eq!(task.priority(), Priority::LOWEST);
        assert_eq!(task.name(), "expand:split2");
    }

    #[test]
    fn rejects_successor_with_fewer_filled_cells() {
        let shared = shared(Canned(Ok(vec![record(1, 7), record(2, 3)])), Arc::default());
        let slot = Slot::new();
        let task = ExpandTask::new(shared, SearchStage::Solve, BoardHandle::new(vec![0]), 5, slot.clone());

        let err = task.execute(&mut context()).unwrap_err();
        assert!(matches!(
            err,
            TaskError::Expansion { source: ExpansionError::Malformed(_), .. }
        ));
        assert!(!slot.is_filled());
    }

    #[test]
    fn rejects_fill_count_beyond_board() {
        let shared = shared(Canned(Ok(vec![record(1, 17)])), Arc::default());
        let task = ExpandTask::new(shared, SearchStage::Solve, BoardHandle::new(vec![0]), 0, Slot::new());
        assert!(task.execute(&mut context()).is_err());
    }

    #[test]
    fn service_error_carries_stage() {
        let shared = shared(
            Canned(Err(ExpansionError::InvalidHandle("garbage".into()))),
            Arc::default(),
        );
        let task = ExpandTask::new(shared, SearchStage::Split1, BoardHandle::new(vec![0]), 0, Slot::new());

        match task.execute(&mut context()) {
            Err(TaskError::Expansion { stage, source }) => {
                assert_eq!(stage, "split1");
                assert_eq!(source, ExpansionError::InvalidHandle("garbage".into()));
            }
            other => panic!("expected expansion error, got {:?}", other),
        }
    }

    #[test]
    fn second_write_to_output_fails() {
        let shared = shared(Canned(Ok(vec![])), Arc::default());
        let slot = Slot::new();
        slot.fill(vec![]).unwrap();
        let task = ExpandTask::new(shared, SearchStage::Solve, BoardHandle::new(vec![0]), 0, slot);
        assert!(matches!(task.execute(&mut context()), Err(TaskError::SlotFilled(_))));
    }
}
