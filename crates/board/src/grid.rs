use std::fmt;

use crate::error::BoardError;

/// Largest supported width: one `u64` mask bit per value.
pub const MAX_WIDTH: usize = 64;

/// A square sudoku board of width `block²`.
///
/// Cells are stored row by row; `0` means empty, `v` means value `v`.
/// Row, column and block masks carry bit `v - 1` for every value in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    block: usize,
    width: usize,
    cells: Vec<u8>,
    rows: Vec<u64>,
    cols: Vec<u64>,
    blocks: Vec<u64>,
    filled: usize,
    /// Set when a placed value was already present in its row, column or block.
    conflicted: bool,
}

/// Block width for a board width, if the width is a supported square.
pub fn block_width(width: usize) -> Option<usize> {
    if width == 0 || width > MAX_WIDTH {
        return None;
    }
    (1..=8).find(|b| b * b == width)
}

impl Board {
    pub fn empty(width: usize) -> Result<Self, BoardError> {
        let block = block_width(width).ok_or(BoardError::UnsupportedWidth(width))?;
        Ok(Self {
            block,
            width,
            cells: vec![0; width * width],
            rows: vec![0; width],
            cols: vec![0; width],
            blocks: vec![0; width],
            filled: 0,
            conflicted: false,
        })
    }

    /// Build a board from raw cell values. Conflicting givens are accepted
    /// and mark the board as a dead branch.
    pub fn from_cells(width: usize, cells: &[u8]) -> Result<Self, BoardError> {
        let mut board = Self::empty(width)?;
        let expected = width * width;
        if cells.len() > expected {
            return Err(BoardError::TooManyCells { expected });
        }
        if cells.len() < expected {
            return Err(BoardError::NotEnoughCells {
                found: cells.len(),
                expected,
            });
        }
        for (idx, &value) in cells.iter().enumerate() {
            if value as usize > width {
                return Err(BoardError::ValueOutOfRange {
                    value: value as u32,
                    position: idx,
                    max: width,
                });
            }
            if value != 0 {
                board.place(idx, value);
            }
        }
        Ok(board)
    }

    /// Parse the text format: whitespace is skipped, `.` is one empty cell
    /// and a run of digits is one value (`0` is empty).
    pub fn parse(width: usize, text: &str) -> Result<Self, BoardError> {
        block_width(width).ok_or(BoardError::UnsupportedWidth(width))?;
        let expected = width * width;
        let mut cells = Vec::with_capacity(expected);
        let mut chars = text.char_indices().peekable();

        while let Some(&(position, ch)) = chars.peek() {
            if ch.is_whitespace() {
                chars.next();
                continue;
            }
            if cells.len() >= expected {
                return Err(BoardError::TooManyCells { expected });
            }
            if ch == '.' {
                cells.push(0);
                chars.next();
            } else if ch.is_ascii_digit() {
                let mut value: u32 = 0;
                while let Some(digit) = chars.peek().and_then(|&(_, d)| d.to_digit(10)) {
                    value = value.saturating_mul(10).saturating_add(digit);
                    chars.next();
                }
                if value as usize > width {
                    return Err(BoardError::ValueOutOfRange {
                        value,
                        position,
                        max: width,
                    });
                }
                cells.push(value as u8);
            } else {
                return Err(BoardError::InvalidCharacter { ch, position });
            }
        }

        Self::from_cells(width, &cells)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn block(&self) -> usize {
        self.block
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn filled(&self) -> usize {
        self.filled
    }

    pub fn is_full(&self) -> bool {
        self.filled == self.cells.len()
    }

    pub fn is_conflicted(&self) -> bool {
        self.conflicted
    }

    /// Full and free of duplicate values.
    pub fn is_solved(&self) -> bool {
        self.is_full() && !self.conflicted
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * self.width + col]
    }

    fn block_index(&self, row: usize, col: usize) -> usize {
        (row / self.block) * self.block + col / self.block
    }

    fn full_mask(&self) -> u64 {
        if self.width == MAX_WIDTH {
            u64::MAX
        } else {
            (1u64 << self.width) - 1
        }
    }

    /// Values still allowed at `idx`, one bit per value. Zero for filled cells
    /// and for empty cells with no remaining choice.
    pub fn candidates(&self, idx: usize) -> u64 {
        if self.cells[idx] != 0 {
            return 0;
        }
        let (row, col) = (idx / self.width, idx % self.width);
        let used = self.rows[row] | self.cols[col] | self.blocks[self.block_index(row, col)];
        !used & self.full_mask()
    }

    /// Write `value` into the empty cell at `idx`.
    pub fn place(&mut self, idx: usize, value: u8) {
        debug_assert_eq!(self.cells[idx], 0, "cell {} already filled", idx);
        debug_assert!(value >= 1 && value as usize <= self.width);
        let (row, col) = (idx / self.width, idx % self.width);
        let block = self.block_index(row, col);
        let bit = 1u64 << (value - 1);

        if (self.rows[row] | self.cols[col] | self.blocks[block]) & bit != 0 {
            self.conflicted = true;
        }
        self.cells[idx] = value;
        self.rows[row] |= bit;
        self.cols[col] |= bit;
        self.blocks[block] |= bit;
        self.filled += 1;
    }

    fn write_rule(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for col in 0..self.width {
            if col % self.block == 0 {
                f.write_str("+-")?;
            }
            f.write_str("---")?;
        }
        f.write_str("+\n")
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.width {
            if row % self.block == 0 {
                self.write_rule(f)?;
            }
            for col in 0..self.width {
                if col % self.block == 0 {
                    f.write_str("| ")?;
                }
                match self.get(row, col) {
                    0 => f.write_str(" . ")?,
                    v => write!(f, "{:2} ", v)?,
                }
            }
            f.write_str("|\n")?;
        }
        self.write_rule(f)
    }
}
