use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable flag a caller uses to stop a video render early.
///
/// Cancelling discards whatever the recorder captured; there is no partial output.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/cancel.rs"]
mod tests;
