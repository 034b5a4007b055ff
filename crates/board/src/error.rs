use thiserror::Error;

use gridsearch_core::ExpansionError;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("unsupported board width {0}: must be a square number between 1 and 64")]
    UnsupportedWidth(usize),

    #[error("wrong number of cells: more than {expected}")]
    TooManyCells { expected: usize },

    #[error("not enough cells: {found}/{expected}")]
    NotEnoughCells { found: usize, expected: usize },

    #[error("invalid value {value} at position {position} (max {max})")]
    ValueOutOfRange { value: u32, position: usize, max: usize },

    #[error("invalid character {ch:?} at position {position}")]
    InvalidCharacter { ch: char, position: usize },

    #[error("board width {found} does not match service width {expected}")]
    WidthMismatch { found: usize, expected: usize },

    #[error("encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

impl BoardError {
    /// Map onto the expansion contract: text problems are parse errors,
    /// everything else means the handle itself is unusable.
    pub fn into_expansion(self) -> ExpansionError {
        match self {
            BoardError::TooManyCells { .. }
            | BoardError::NotEnoughCells { .. }
            | BoardError::ValueOutOfRange { .. }
            | BoardError::InvalidCharacter { .. } => ExpansionError::Parse(self.to_string()),
            BoardError::Encode(_) => ExpansionError::Malformed(self.to_string()),
            _ => ExpansionError::InvalidHandle(self.to_string()),
        }
    }
}
