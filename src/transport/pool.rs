//! Bounded worker pool
//!
//! Caps the number of HTTP calls in flight across every request and façade
//! call sharing one client. Admission waits for a free slot.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::TransportError;

/// Typical per-host connection limit of an HTTP stack
pub const CONNECTIONS_PER_HOST: usize = 6;

/// Pool size multiplier over the per-host limit
pub const POOL_MULTIPLIER: usize = 4;

/// Default number of concurrent in-flight calls
pub const DEFAULT_MAX_CONCURRENT: usize = CONNECTIONS_PER_HOST * POOL_MULTIPLIER;

/// Semaphore-bounded admission for in-flight calls
#[derive(Debug, Clone)]
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl WorkerPool {
    /// Create a pool admitting at most `capacity` concurrent calls (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait for a slot. The slot is released when the permit drops.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, TransportError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| TransportError::PoolClosed)?;
        crate::metrics::record_pool_available(self.available());
        Ok(permit)
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free slots right now
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Refuse new admissions; waiting callers get `PoolClosed`
    pub fn close(&self) {
        self.semaphore.close();
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT)
    }
}
