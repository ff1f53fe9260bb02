use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};


/// A flag that asks a running `fit` to stop.
///
/// Clones share the same flag, so one clone can be handed to a signal
/// handler or another thread while the adapter trains.
/// A cancelled fit keeps the best model captured so far.
/// The adapter resets the flag when `fit` returns.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}


impl CancellationToken {
    /// Construct a new, not-yet-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }


    /// Request cancellation.
    #[inline(always)]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }


    /// Returns `true` once `cancel` has been called.
    #[inline(always)]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }


    pub(crate) fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}
