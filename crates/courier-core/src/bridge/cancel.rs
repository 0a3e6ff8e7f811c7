//! Per-turn cooperative cancellation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cancellation flag shared between a turn and its caller.
///
/// Cloning shares the flag. Once cancelled it stays cancelled for the life of
/// the turn; a new turn gets a fresh flag.
#[derive(Debug, Clone, Default)]
pub struct TurnCancellation {
    cancelled: Arc<AtomicBool>,
}

impl TurnCancellation {
    /// Create a fresh, uncancelled flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the turn.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_propagates_across_clones() {
        let flag = TurnCancellation::new();
        let clone = flag.clone();

        assert!(!clone.is_cancelled());
        flag.cancel();
        assert!(clone.is_cancelled());
    }
}
