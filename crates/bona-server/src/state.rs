//! Shared application state

use bona_core::VisionEngine;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Shared application state with bounded inference concurrency
#[derive(Clone)]
pub struct AppState {
    /// Engine reference - using Arc for cheap clones
    pub engine: Arc<VisionEngine>,
    /// Bounds concurrently executing inference requests
    pub request_semaphore: Arc<Semaphore>,
}

impl AppState {
    pub fn new(engine: VisionEngine) -> Self {
        // Inference blocks for seconds per image; keep the in-flight set
        // bounded so a burst cannot exhaust the blocking pool.
        let max_concurrent = std::env::var("BONA_MAX_CONCURRENT_REQUESTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8);

        Self {
            engine: Arc::new(engine),
            request_semaphore: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    /// Acquire a permit for concurrent request processing
    pub async fn acquire_permit(&self) -> tokio::sync::SemaphorePermit<'_> {
        self.request_semaphore
            .acquire()
            .await
            .expect("Semaphore should never be closed")
    }
}
