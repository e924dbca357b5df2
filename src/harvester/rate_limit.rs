//! Global concurrency limiting
//!
//! A counting permit set shared by every fetch of a run. One permit covers an
//! item's whole lifetime, retries and pauses included, so the number of
//! outstanding requests never exceeds the permit count.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Counting limiter around a tokio semaphore.
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    max_permits: usize,
}

/// Permit held for the lifetime of one item fetch. Released on drop.
#[derive(Debug)]
pub struct ItemPermit {
    _permit: OwnedSemaphorePermit,
}

impl ConcurrencyLimiter {
    /// Create a limiter with `max_permits` slots (at least 1).
    pub fn new(max_permits: usize) -> Self {
        let max_permits = max_permits.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(max_permits)),
            max_permits,
        }
    }

    /// Wait for a free slot.
    pub async fn acquire(&self) -> Result<ItemPermit, RateLimitError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| RateLimitError::AcquireError(e.to_string()))?;

        Ok(ItemPermit { _permit: permit })
    }

    /// Configured slot count
    pub fn max_permits(&self) -> usize {
        self.max_permits
    }

    /// Slots currently free
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Slots currently held
    pub fn in_flight(&self) -> usize {
        self.max_permits - self.available_permits()
    }
}

/// Rate limiter errors
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    /// Failed to acquire permits
    #[error("failed to acquire concurrency permit: {0}")]
    AcquireError(String),
}
