use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Caps the number of lookups in flight. Unbounded when built without a limit.
#[derive(Clone, Debug, Default)]
pub struct ConcurrencyLimiter {
    sem: Option<Arc<Semaphore>>,
    limit: Option<usize>,
}

impl ConcurrencyLimiter {
    pub fn new(max_in_flight: Option<usize>) -> Self {
        // A cap of zero would never admit a lookup
        let limit = max_in_flight.map(|c| c.max(1));
        Self {
            sem: limit.map(|c| Arc::new(Semaphore::new(c))),
            limit,
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Wait for a slot. The returned permit releases the slot when dropped;
    /// `None` means no cap is configured.
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        match &self.sem {
            // The semaphore is never closed, so acquire only fails if that changes
            Some(sem) => sem.clone().acquire_owned().await.ok(),
            None => None,
        }
    }
}
