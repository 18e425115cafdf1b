//! Cooperative cancellation.
//!
//! A token is checked at coarse stage boundaries (between kNN, filtration,
//! complex build, H0, H1, feature extraction) and once between the
//! edge-sort and the reduction loop inside H0/H1. No timeout is enforced
//! here; a caller that wants a deadline flips the token from another thread
//! or a timer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{PipelineError, Result};

/// A cheap, cloneable cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Returns `Err(Cancelled)` if the token has been flipped, `Ok(())`
    /// otherwise. Call at every boundary named in the module doc.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(PipelineError::Cancelled)
        } else {
            Ok(())
        }
    }
}
