//! Cooperative cancellation for backend calls.

use crate::error::{BatchError, BatchResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag checked before each request and between downloaded chunks.
///
/// Clones observe the same flag, so one clone can be handed to whatever
/// reacts to the user leaving while the client holds another.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Fails with [`BatchError::Cancelled`] once the token is cancelled.
    pub fn check(&self, operation: &str) -> BatchResult<()> {
        if self.is_cancelled() {
            return Err(BatchError::Cancelled {
                operation: operation.to_string(),
            });
        }
        Ok(())
    }
}
