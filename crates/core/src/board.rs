use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Opaque, immutable reference to a board owned by an expansion service.
///
/// The engine only moves handles between tasks; it never looks inside.
/// Cloning is cheap (reference counted).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BoardHandle(Bytes);

impl BoardHandle {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Raw encoded form, for the service that produced it.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for BoardHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoardHandle({} bytes)", self.0.len())
    }
}

/// A successor board plus its progress metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
    pub board: BoardHandle,
    /// Number of filled cells. Never lower than the board it was derived from.
    pub fill_count: u32,
}

impl CandidateRecord {
    pub fn new(board: BoardHandle, fill_count: u32) -> Self {
        Self { board, fill_count }
    }
}

/// Exploration strategy requested from the expansion service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpandMode {
    /// Wide and shallow: used to generate independent work up front.
    FanOut,
    /// Narrow and deep: used by the recursive solve stage.
    Step,
}

impl fmt::Display for ExpandMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpandMode::FanOut => f.write_str("fan-out"),
            ExpandMode::Step => f.write_str("step"),
        }
    }
}
