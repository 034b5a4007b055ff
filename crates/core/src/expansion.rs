use crate::board::{BoardHandle, CandidateRecord, ExpandMode};
use crate::error::ExpansionError;

/// The external leaf computation: grows one board into successor boards.
///
/// Implementations must be safe to call from many workers at once and must
/// not have side effects observable beyond their return values.
pub trait ExpansionService: Send + Sync {
    /// Parse a textual board description into a handle.
    fn parse(&self, text: &str) -> Result<BoardHandle, ExpansionError>;

    /// Expand `board` using `mode`, doing at most roughly `quota` units of work
    /// before returning. An empty result ends the branch.
    fn expand(
        &self,
        board: &BoardHandle,
        mode: ExpandMode,
        quota: u64,
    ) -> Result<Vec<CandidateRecord>, ExpansionError>;

    /// Human-readable rendering of a board for reports.
    fn render(&self, board: &BoardHandle) -> Result<String, ExpansionError>;
}

/// A discovered full board, ready to be reported.
#[derive(Debug, Clone)]
pub struct Solution {
    pub board: BoardHandle,
    pub fill_count: u32,
    pub rendered: String,
}

/// Receives every discovered solution. Duplicates are possible when several
/// branches finish before pruning takes effect.
pub trait SolutionSink: Send + Sync {
    fn report(&self, solution: &Solution);
}
