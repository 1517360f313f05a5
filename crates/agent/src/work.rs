//! Background work that outlives a response.
//!
//! `PendingWork` is the explicit "work extends beyond the response"
//! completion handle: strategy executors hand it fire-and-forget
//! continuations (cache refreshes) that must be allowed to finish after the
//! response has already been returned. Failures stay confined to the log;
//! nothing is ever rejoined with the original request's result.

use std::future::Future;
use tokio::sync::Mutex;
use tokio::task::JoinSet;

/// Tracker for detached background tasks.
#[derive(Debug, Default)]
pub struct PendingWork {
    tasks: Mutex<JoinSet<()>>,
}

impl PendingWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a detached task and keep a handle to it.
    pub async fn extend<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.lock().await.spawn(work);
    }

    /// Wait for every tracked task to finish.
    ///
    /// Used at shutdown so in-flight refreshes land, and by tests to make
    /// background effects observable.
    pub async fn settle(&self) {
        let mut tasks = self.tasks.lock().await;
        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                tracing::warn!(error = %e, "background task panicked");
            }
        }
    }
}
