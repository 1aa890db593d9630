//! Cooperative cancellation shared between a task and its caller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A clonable stop flag.
///
/// Engines poll it between files and between comparisons; work already in
/// flight finishes before the flag is seen.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
