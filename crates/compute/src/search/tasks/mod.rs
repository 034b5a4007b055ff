//! Task kinds of a search run.
//!
//! | task | lane | priority |
//! |---|---|---|
//! | [`ExpandTask`] | compute | 0 in fan-out, fill count in solve |
//! | [`FanOutTask`] | control | 0 |
//! | [`SolveTask`] | control | fill count |
//! | [`HarvestTask`] | control | fill count |
//! | [`ReportTask`] | control | highest |

mod expand;
mod fan_out;
mod harvest;
mod report;
mod solve;

pub use expand::ExpandTask;
pub use fan_out::FanOutTask;
pub use harvest::HarvestTask;
pub use report::ReportTask;
pub use solve::SolveTask;

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::{Arc, Mutex};

    use gridsearch_core::{
        BoardHandle, CandidateRecord, ExpandMode, ExpansionError, ExpansionService, SearchParams,
        Solution, SolutionSink,
    };

    use crate::scheduler::task::{IdAllocator, TaskContext};
    use crate::search::state::SearchShared;

    /// Returns the same successors for every call.
    pub struct Canned(pub Result<Vec<CandidateRecord>, ExpansionError>);

    impl ExpansionService for Canned {
        fn parse(&self, text: &str) -> Result<BoardHandle, ExpansionError> {
            Ok(BoardHandle::new(text.as_bytes().to_vec()))
        }

        fn expand(
            &self,
            _board: &BoardHandle,
            _mode: ExpandMode,
            _quota: u64,
        ) -> Result<Vec<CandidateRecord>, ExpansionError> {
            self.0.clone()
        }

        fn render(&self, board: &BoardHandle) -> Result<String, ExpansionError> {
            Ok(format!("board of {} bytes", board.len()))
        }
    }

    #[derive(Default)]
    pub struct Collect(pub Mutex<Vec<Solution>>);

    impl SolutionSink for Collect {
        fn report(&self, solution: &Solution) {
            self.0.lock().unwrap().push(solution.clone());
        }
    }

    pub fn record(tag: u8, fill_count: u32) -> CandidateRecord {
        CandidateRecord::new(BoardHandle::new(vec![tag]), fill_count)
    }

    pub fn shared(service: Canned, sink: Arc<Collect>) -> Arc<SearchShared> {
        let params = SearchParams {
            board_size: 4,
            split1: 2,
            split2: 2,
            dfs_quota: 10,
        };
        Arc::new(SearchShared::new(Arc::new(service), sink, params))
    }

    pub fn context() -> TaskContext {
        let ids = IdAllocator::default();
        TaskContext::new(ids.next(), ids)
    }
}
