//! Lifecycle controller.
//!
//! Drives the install/activate state machine:
//! `Installing -> Installed -> Activating -> Active`. A failed install
//! leaves the controller idle and the prior generation serving; activation
//! retires every stale generation and claims open sessions so they use the
//! current router without a reload.

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use url::Url;

use shltr_client::Fetcher;
use shltr_core::{CacheDb, Error, Generation, Manifest, VersionManager};

use crate::precache;

/// Controller states, in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// No install cycle has run yet.
    #[default]
    Idle,
    Installing,
    Installed,
    Activating,
    /// Terminal until superseded by a new install cycle.
    Active,
}

/// Result of a successful install.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallOutcome {
    pub generation: String,
    /// Number of manifest entries stored.
    pub precached: u64,
    /// Install completed, so the agent need not wait for old sessions to
    /// close before activating.
    pub skip_waiting: bool,
}

/// Result of activation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivateOutcome {
    pub generation: String,
    /// Stale generations that were retired.
    pub removed: Vec<String>,
    /// Open sessions now use this generation without a reload.
    pub claimed: bool,
}

/// The install/activate state machine.
#[derive(Debug, Default)]
pub struct LifecycleController {
    state: LifecycleState,
}

impl LifecycleController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Run the precache loader for the current generation.
    ///
    /// All-or-nothing: on any failure the partially written generation is
    /// unwound, the controller returns to idle, and the prior generation
    /// keeps serving until the next deployment attempt.
    pub async fn install<F>(
        &mut self, db: &CacheDb, versions: &VersionManager, manifest: &Manifest, origin: &Url, fetcher: &F,
    ) -> Result<InstallOutcome, Error>
    where
        F: Fetcher + ?Sized,
    {
        self.state = LifecycleState::Installing;
        let generation = versions.current_generation().clone();
        tracing::info!(generation = %generation, assets = manifest.len(), "installing");

        let cache = db.handle(generation.clone());
        match precache::run(manifest, origin, &cache, fetcher).await {
            Ok(precached) => {
                self.state = LifecycleState::Installed;
                tracing::info!(generation = %generation, precached, "install complete");
                Ok(InstallOutcome { generation: generation.to_string(), precached, skip_waiting: true })
            }
            Err(e) => {
                if let Err(purge_err) = db.delete_generation(&generation).await {
                    tracing::warn!(generation = %generation, error = %purge_err, "failed to unwind partial precache");
                }
                self.state = LifecycleState::Idle;
                tracing::warn!(generation = %generation, error = %e, "install failed; prior generation keeps serving");
                Err(e)
            }
        }
    }

    /// Cut over to the current generation.
    ///
    /// Deletes every stale generation in parallel and waits for all
    /// deletions to settle before claiming sessions; a deletion failure is
    /// logged, never fatal.
    pub async fn activate(&mut self, db: &CacheDb, versions: &VersionManager) -> ActivateOutcome {
        self.state = LifecycleState::Activating;
        let current = versions.current_generation().clone();

        let stale: Vec<Generation> = match db.list_generations().await {
            Ok(generations) => generations.into_iter().filter(|g| g != &current).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to enumerate generations; skipping cleanup");
                Vec::new()
            }
        };

        let mut deletions = JoinSet::new();
        for generation in stale {
            let db = db.clone();
            deletions.spawn(async move {
                match db.delete_generation(&generation).await {
                    Ok(removed) => {
                        tracing::info!(generation = %generation, removed, "retired stale generation");
                        Some(generation)
                    }
                    Err(e) => {
                        tracing::warn!(generation = %generation, error = %e, "failed to retire generation");
                        None
                    }
                }
            });
        }

        let mut removed = Vec::new();
        while let Some(result) = deletions.join_next().await {
            match result {
                Ok(Some(generation)) => removed.push(generation.to_string()),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "generation cleanup task panicked"),
            }
        }
        removed.sort();

        self.state = LifecycleState::Active;
        tracing::info!(generation = %current, "active; claiming open sessions");

        ActivateOutcome { generation: current.to_string(), removed, claimed: true }
    }
}
