use std::sync::atomic::{AtomicU64, Ordering};

use gridsearch_core::{BoardHandle, CandidateRecord, ExpandMode, ExpansionError, ExpansionService};
use tracing::debug;

use crate::codec;
use crate::error::BoardError;
use crate::grid::{self, Board};
use crate::solver::{self, Tiebreak};

/// In-process sudoku expansion service for one board width.
#[derive(Debug)]
pub struct SudokuService {
    width: usize,
    seed: Option<u64>,
    calls: AtomicU64,
}

impl SudokuService {
    pub fn new(board_size: u32) -> Result<Self, BoardError> {
        let width = board_size as usize;
        grid::block_width(width).ok_or(BoardError::UnsupportedWidth(width))?;
        Ok(Self {
            width,
            seed: None,
            calls: AtomicU64::new(0),
        })
    }

    /// Break ties between equally constrained cells at random. Each expand
    /// call derives its own generator from the seed and a call counter.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Decode a handle produced by this service.
    pub fn decode(&self, handle: &BoardHandle) -> Result<Board, ExpansionError> {
        codec::decode(handle, self.width).map_err(|e| ExpansionError::InvalidHandle(e.to_string()))
    }

    fn tiebreak(&self) -> Tiebreak {
        match self.seed {
            Some(seed) => {
                let call = self.calls.fetch_add(1, Ordering::Relaxed);
                Tiebreak::Random(fastrand::Rng::with_seed(seed.wrapping_add(call)))
            }
            None => Tiebreak::First,
        }
    }

    fn record(board: &Board) -> Result<CandidateRecord, ExpansionError> {
        let handle = codec::encode(board).map_err(BoardError::into_expansion)?;
        Ok(CandidateRecord::new(handle, board.filled() as u32))
    }
}

impl ExpansionService for SudokuService {
    fn parse(&self, text: &str) -> Result<BoardHandle, ExpansionError> {
        let board = Board::parse(self.width, text).map_err(BoardError::into_expansion)?;
        codec::encode(&board).map_err(BoardError::into_expansion)
    }

    fn expand(
        &self,
        board: &BoardHandle,
        mode: ExpandMode,
        quota: u64,
    ) -> Result<Vec<CandidateRecord>, ExpansionError> {
        let start = self.decode(board)?;
        let filled = start.filled();
        let mut tiebreak = self.tiebreak();

        let boards = match mode {
            ExpandMode::FanOut => solver::breadth_first(start, quota, &mut tiebreak),
            ExpandMode::Step => solver::depth_first(start, quota, &mut tiebreak),
        };
        debug!(%mode, quota, filled, successors = boards.len(), "expanded board");

        boards.iter().map(Self::record).collect()
    }

    fn render(&self, board: &BoardHandle) -> Result<String, ExpansionError> {
        Ok(self.decode(board)?.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEAR: &str = "1 2 3 .  3 4 . 2  2 . 4 3  . 3 2 1";

    #[test]
    fn rejects_non_square_width() {
        assert!(matches!(SudokuService::new(8), Err(BoardError::UnsupportedWidth(8))));
        assert!(SudokuService::new(16).is_ok());
    }

    #[test]
    fn parse_errors_map_to_parse() {
        let service = SudokuService::new(4).unwrap();
        let err = service.parse("1 2 3").unwrap_err();
        assert!(matches!(err, ExpansionError::Parse(_)));
    }

    #[test]
    fn step_on_forced_board_returns_full_board() {
        let service = SudokuService::new(4).unwrap();
        let handle = service.parse(NEAR).unwrap();
        let out = service.expand(&handle, ExpandMode::Step, 100).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].fill_count, 16);
        assert!(service.decode(&out[0].board).unwrap().is_solved());
    }

    #[test]
    fn fan_out_with_quota_one_returns_input() {
        let service = SudokuService::new(4).unwrap();
        let handle = service.parse(NEAR).unwrap();
        let out = service.expand(&handle, ExpandMode::FanOut, 1).unwrap();
        assert_eq!(out, vec![CandidateRecord::new(handle, 12)]);
    }

    #[test]
    fn foreign_handle_is_invalid() {
        let small = SudokuService::new(4).unwrap();
        let large = SudokuService::new(9).unwrap();
        let handle = small.parse(NEAR).unwrap();
        let err = large.expand(&handle, ExpandMode::Step, 10).unwrap_err();
        assert!(matches!(err, ExpansionError::InvalidHandle(_)));
    }

    #[test]
    fn render_shows_values() {
        let service = SudokuService::new(4).unwrap();
        let handle = service.parse(NEAR).unwrap();
        let text = service.render(&handle).unwrap();
        assert!(text.contains(" . "));
        assert!(text.starts_with("+-"));
    }

    #[test]
    fn seeded_service_is_deterministic_per_call_sequence() {
        let empty = ".".repeat(81);
        let run = || {
            let service = SudokuService::new(9).unwrap().with_seed(42);
            let handle = service.parse(&empty).unwrap();
            service.expand(&handle, ExpandMode::FanOut, 16).unwrap()
        };
        assert_eq!(run(), run());
    }
}
