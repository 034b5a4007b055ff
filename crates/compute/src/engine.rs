use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use gridsearch_core::{
    BoardHandle, ConfigError, ExpansionService, SchedulerConfig, SearchParams, Slot, SolutionSink,
};
use tracing::{info, info_span};
use uuid::Uuid;

use crate::scheduler::{Scheduler, SchedulerError, SchedulerMetrics};
use crate::search::{ExpandTask, FanOutTask, SearchShared, SearchStage};

/// Why a search could not run to completion.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Result of one completed search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub run_id: Uuid,
    /// Full boards reported. Zero means the board has no solution.
    pub solutions: u64,
    pub metrics: SchedulerMetrics,
    pub elapsed: Duration,
}

impl SearchOutcome {
    pub fn is_solved(&self) -> bool {
        self.solutions > 0
    }
}

/// Builds and runs the task graph for a board: two fan-out levels, then
/// recursive solve steps ordered by filled-cell count.
pub struct SearchEngine {
    service: Arc<dyn ExpansionService>,
    sink: Arc<dyn SolutionSink>,
    params: SearchParams,
    scheduler: SchedulerConfig,
}

impl SearchEngine {
    pub fn new(
        service: Arc<dyn ExpansionService>,
        sink: Arc<dyn SolutionSink>,
        params: SearchParams,
        scheduler: SchedulerConfig,
    ) -> Self {
        Self {
            service,
            sink,
            params,
            scheduler,
        }
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Read and parse the start board. Fails before any task is scheduled.
    pub fn load_board(&self, path: impl AsRef<Path>) -> Result<BoardHandle, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::BoardSource {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        self.service
            .parse(&text)
            .map_err(|e| ConfigError::BoardSource {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    /// Search from `start` until the task graph is exhausted.
    pub fn solve(&self, start: BoardHandle) -> Result<SearchOutcome, SearchError> {
        self.params.validate()?;

        let run_id = Uuid::new_v4();
        let span = info_span!("search", %run_id);
        let _guard = span.enter();
        let started = Instant::now();
        info!(
            "Search starting: boardsize={}, split1={}, split2={}, dfsquota={}",
            self.params.board_size, self.params.split1, self.params.split2, self.params.dfs_quota
        );

        let shared = Arc::new(SearchShared::new(
            Arc::clone(&self.service),
            Arc::clone(&self.sink),
            self.params.clone(),
        ));

        let mut scheduler = Scheduler::new(self.scheduler.clone());
        let slot = Slot::new();
        let expand = scheduler.submit(ExpandTask::new(
            Arc::clone(&shared),
            SearchStage::Split1,
            start,
            0,
            slot.clone(),
        ));
        scheduler.submit_after(
            &[expand],
            FanOutTask::new(Arc::clone(&shared), SearchStage::Split1, slot),
        );

        let metrics = scheduler.run()?;
        let outcome = SearchOutcome {
            run_id,
            solutions: shared.signal.snapshot(),
            metrics,
            elapsed: started.elapsed(),
        };
        info!(
            "Search finished in {:.3}s: {} solutions, {} tasks ({} pruned)",
            outcome.elapsed.as_secs_f64(),
            outcome.solutions,
            outcome.metrics.total_executed(),
            outcome.metrics.tasks_pruned
        );
        Ok(outcome)
    }
}
