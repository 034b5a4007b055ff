use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Process-wide convergent counter used as a best-effort stop signal.
///
/// Merge is addition, so any number of branches may report a solution
/// concurrently without losing increments. Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct TerminationAccumulator {
    value: Arc<AtomicU64>,
}

impl TerminationAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one to the shared value. Never blocks on other writers.
    pub fn increment(&self) {
        self.value.fetch_add(1, Ordering::Release);
    }

    /// Latest merged value. Non-decreasing for any observer.
    pub fn snapshot(&self) -> u64 {
        self.value.load(Ordering::Acquire)
    }

    /// True once any branch has reported a solution.
    pub fn is_raised(&self) -> bool {
        self.snapshot() > 0
    }
}
