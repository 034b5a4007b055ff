use std::fmt;
use std::sync::Arc;

use gridsearch_core::{
    CandidateRecord, ExpandMode, ExpansionService, SearchParams, SolutionSink,
    TerminationAccumulator,
};

/// Everything the tasks of one search run share.
pub struct SearchShared {
    pub service: Arc<dyn ExpansionService>,
    pub sink: Arc<dyn SolutionSink>,
    /// Raised once per reported solution; checked at the entry of every solve.
    pub signal: TerminationAccumulator,
    pub params: SearchParams,
}

impl SearchShared {
    pub fn new(
        service: Arc<dyn ExpansionService>,
        sink: Arc<dyn SolutionSink>,
        params: SearchParams,
    ) -> Self {
        Self {
            service,
            sink,
            signal: TerminationAccumulator::new(),
            params,
        }
    }

    /// A record is a solution once every cell is filled.
    pub fn is_full(&self, record: &CandidateRecord) -> bool {
        record.fill_count == self.params.total_cells()
    }
}

/// Which expansion a task performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchStage {
    /// First fan-out level, bounded by `split1`.
    Split1,
    /// Second fan-out level, bounded by `split2`.
    Split2,
    /// Recursive depth-first step, bounded by `dfs_quota`.
    Solve,
}

impl SearchStage {
    pub fn mode(self) -> ExpandMode {
        match self {
            SearchStage::Split1 | SearchStage::Split2 => ExpandMode::FanOut,
            SearchStage::Solve => ExpandMode::Step,
        }
    }

    pub fn quota(self, params: &SearchParams) -> u64 {
        match self {
            SearchStage::Split1 => params.split1,
            SearchStage::Split2 => params.split2,
            SearchStage::Solve => params.dfs_quota,
        }
    }

    /// Stage after this one, for fan-out levels.
    pub fn next(self) -> Option<SearchStage> {
        match self {
            SearchStage::Split1 => Some(SearchStage::Split2),
            SearchStage::Split2 | SearchStage::Solve => None,
        }
    }
}

impl fmt::Display for SearchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStage::Split1 => f.write_str("split1"),
            SearchStage::Split2 => f.write_str("split2"),
            SearchStage::Solve => f.write_str("solve"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_map_to_modes_and_quotas() {
        let params = SearchParams {
            board_size: 4,
            split1: 3,
            split2: 5,
            dfs_quota: 7,
        };
        assert_eq!(SearchStage::Split1.mode(), ExpandMode::FanOut);
        assert_eq!(SearchStage::Solve.mode(), ExpandMode::Step);
        assert_eq!(SearchStage::Split1.quota(&params), 3);
        assert_eq!(SearchStage::Split2.quota(&params), 5);
        assert_eq!(SearchStage::Solve.quota(&params), 7);
    }

    #[test]
    fn fan_out_has_two_levels() {
        assert_eq!(SearchStage::Split1.next(), Some(SearchStage::Split2));
        assert_eq!(SearchStage::Split2.next(), None);
        assert_eq!(SearchStage::Split2.to_string(), "split2");
    }
}
