use std::sync::{Arc, OnceLock};

/// Write-once, read-many dataflow cell.
///
/// The producing task fills it exactly once; consumers are only scheduled
/// after the producer completes, so `get` does not wait.
#[derive(Debug)]
pub struct Slot<T> {
    cell: Arc<OnceLock<T>>,
}

impl<T> Slot<T> {
    pub fn new() -> Self {
        Self {
            cell: Arc::new(OnceLock::new()),
        }
    }

    /// Store the value. Hands it back if the slot was already filled.
    pub fn fill(&self, value: T) -> Result<(), T> {
        self.cell.set(value)
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_filled(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}
