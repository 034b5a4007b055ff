//! Sudoku expansion service.
//!
//! Implements [`gridsearch_core::ExpansionService`] for square sudoku boards
//! of width `b²` (up to 64). Boards travel between tasks as MessagePack
//! encoded [`gridsearch_core::BoardHandle`]s.

pub mod codec;
pub mod error;
pub mod grid;
pub mod service;
pub mod solver;

pub use error::BoardError;
pub use grid::Board;
pub use service::SudokuService;
pub use solver::Tiebreak;
