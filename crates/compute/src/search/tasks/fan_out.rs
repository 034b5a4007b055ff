use std::sync::Arc;

use gridsearch_core::{CandidateRecord, Slot};

use crate::scheduler::{Lane, Priority, SearchTask, TaskContext, TaskError, TaskOutcome};
use crate::search::state::{SearchShared, SearchStage};

use super::{ExpandTask, SolveTask};

/// Consumes one fan-out level: feeds each successor into the next level, or
/// into the solve stage after the last level.
pub struct FanOutTask {
    shared: Arc<SearchShared>,
    stage: SearchStage,
    input: Slot<Vec<CandidateRecord>>,
}

impl FanOutTask {
    pub fn new(shared: Arc<SearchShared>, stage: SearchStage, input: Slot<Vec<CandidateRecord>>) -> Self {
        Self {
            shared,
            stage,
            input,
        }
    }
}

impl SearchTask for FanOutTask {
    fn name(&self) -> &'static str {
        match self.stage {
            SearchStage::Split1 => "fan-out:split1",
            SearchStage::Split2 | SearchStage::Solve => "fan-out:split2",
        }
    }

    fn lane(&self) -> Lane {
        Lane::Control
    }

    fn priority(&self) -> Priority {
        Priority::LOWEST
    }

    fn execute(&self, ctx: &mut TaskContext) -> Result<TaskOutcome, TaskError> {
        let records = self
            .input
            .get()
            .ok_or_else(|| TaskError::MissingInput(self.name().to_string()))?;

        match self.stage.next() {
            Some(next) => {
                for record in records {
                    let slot = Slot::new();
                    let expand = ctx.spawn(ExpandTask::new(
                        Arc::clone(&self.shared),
                        next,
                        record.board.clone(),
                        record.fill_count,
                        slot.clone(),
                    ));
                    ctx.spawn_after(&[expand], FanOutTask::new(Arc::clone(&self.shared), next, slot));
                }
            }
            None => {
                for record in records {
                    ctx.spawn(SolveTask::new(Arc::clone(&self.shared), record.clone()));
                }
            }
        }
        Ok(TaskOutcome::Completed)
    }
}
