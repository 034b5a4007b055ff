//! MessagePack wire form of a [`Board`].
//!
//! Only the width and the raw cells travel; masks and fill counts are rebuilt
//! on decode, so a handle cannot smuggle in inconsistent bookkeeping.

use gridsearch_core::BoardHandle;
use serde::{Deserialize, Serialize};

use crate::error::BoardError;
use crate::grid::Board;

#[derive(Debug, Serialize, Deserialize)]
struct WireBoard {
    width: u8,
    cells: Vec<u8>,
}

pub fn encode(board: &Board) -> Result<BoardHandle, BoardError> {
    let wire = WireBoard {
        width: board.width() as u8,
        cells: board.cells().to_vec(),
    };
    Ok(BoardHandle::new(rmp_serde::to_vec(&wire)?))
}

/// Decode a handle, rejecting boards of any width other than `expected_width`.
pub fn decode(handle: &BoardHandle, expected_width: usize) -> Result<Board, BoardError> {
    let wire: WireBoard = rmp_serde::from_slice(handle.as_bytes())?;
    let width = wire.width as usize;
    if width != expected_width {
        return Err(BoardError::WidthMismatch {
            found: width,
            expected: expected_width,
        });
    }
    Board::from_cells(width, &wire.cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_board_decodes_to_the_same_cells() {
        let board = Board::parse(4, "1 . . .  . 2 . .  . . 3 .  . . . 4").unwrap();
        let handle = encode(&board).unwrap();
        let back = decode(&handle, 4).unwrap();
        assert_eq!(back, board);
        assert_eq!(back.filled(), 4);
    }

    #[test]
    fn width_mismatch_is_rejected() {
        let handle = encode(&Board::empty(4).unwrap()).unwrap();
        let err = decode(&handle, 9).unwrap_err();
        assert!(matches!(err, BoardError::WidthMismatch { found: 4, expected: 9 }));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let handle = BoardHandle::new(&b"\xc1\xc1\xc1"[..]);
        assert!(matches!(decode(&handle, 4), Err(BoardError::Decode(_))));
    }

    #[test]
    fn truncated_cells_are_rejected() {
        let bytes = rmp_serde::to_vec(&WireBoard { width: 4, cells: vec![0; 5] }).unwrap();
        let err = decode(&BoardHandle::new(bytes), 4).unwrap_err();
        assert!(matches!(err, BoardError::NotEnoughCells { found: 5, expected: 16 }));
    }
}
