//! Test sessions and deferred cleanup.
//!
//! A [`Session`] collects teardown actions while a test provisions resources.
//! Helpers register the cleanup for a resource before creating it, and the
//! test calls [`Session::run_cleanups`] once at the end. Actions run one at a
//! time in reverse registration order, so resources are released in the
//! opposite order they were acquired.
//!
//! Cleanup is best-effort: a failing action is logged and recorded, and the
//! remaining actions still run.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::future::BoxFuture;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::RancherConfig;
use crate::error::Error;

type CleanupAction = Box<dyn FnOnce() -> BoxFuture<'static, Result<(), Error>> + Send>;

/// Aggregate failure returned by [`Session::run_cleanups`].
#[derive(Debug, thiserror::Error)]
#[error("{count} cleanup action(s) failed: {summary}", count = .failures.len(), summary = summarize(.failures))]
pub struct CleanupError {
    /// Failures in the order the actions ran.
    pub failures: Vec<Error>,
}

fn summarize(failures: &[Error]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Per-test session owning the cleanup registry.
pub struct Session {
    id: String,
    cleanup_enabled: bool,
    cleanups: Mutex<Vec<CleanupAction>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session that runs its cleanups.
    pub fn new() -> Self {
        Self::with_cleanup(true)
    }

    /// Create a session, choosing whether registered cleanups actually run.
    ///
    /// With cleanup disabled, resources are left in place for debugging and
    /// [`run_cleanups`](Self::run_cleanups) only discards the actions.
    pub fn with_cleanup(cleanup_enabled: bool) -> Self {
        let id: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
        debug!(session = %id, cleanup_enabled, "Created test session");
        Self {
            id,
            cleanup_enabled,
            cleanups: Mutex::new(Vec::new()),
        }
    }

    /// Create a session honoring the `cleanup` flag of the Rancher config.
    pub fn from_config(config: &RancherConfig) -> Self {
        Self::with_cleanup(config.cleanup)
    }

    /// Short unique identifier of this session.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn cleanup_enabled(&self) -> bool {
        self.cleanup_enabled
    }

    /// Generate a unique resource name scoped to this session.
    pub fn random_name(&self, prefix: &str) -> String {
        let suffix: String = Uuid::new_v4().simple().to_string().chars().take(5).collect();
        format!("{}-{}-{}", prefix, self.id, suffix)
    }

    /// Register a teardown action to run when the session ends.
    pub fn register_cleanup<F, Fut>(&self, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), Error>> + Send + 'static,
    {
        let action: CleanupAction = Box::new(move || Box::pin(action()));
        let mut cleanups = self.lock();
        cleanups.push(action);
        debug!(session = %self.id, pending = cleanups.len(), "Registered cleanup");
    }

    /// Number of registered actions that have not run yet.
    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    /// Run every registered action, most recent first.
    ///
    /// Actions registered while cleanup is in progress are drained in a
    /// further round. Every error an action returns is a failure; actions
    /// that delete should absorb not-found themselves with
    /// [`ignore_not_found`](crate::error::ignore_not_found).
    pub async fn run_cleanups(&self) -> Result<(), CleanupError> {
        let mut failures = Vec::new();

        loop {
            let actions = self.take_all();
            if actions.is_empty() {
                break;
            }

            if !self.cleanup_enabled {
                info!(
                    session = %self.id,
                    skipped = actions.len(),
                    "Cleanup disabled, leaving resources in place"
                );
                continue;
            }

            info!(session = %self.id, actions = actions.len(), "Running session cleanup");
            for action in actions.into_iter().rev() {
                match action().await {
                    Ok(()) => {}
                    Err(e) => {
                        warn!(session = %self.id, error = %e, "Cleanup action failed");
                        failures.push(e);
                    }
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(CleanupError { failures })
        }
    }

    /// Drain the registry under the lock, keeping registration order.
    fn take_all(&self) -> Vec<CleanupAction> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CleanupAction>> {
        self.cleanups.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let pending = self
            .cleanups
            .get_mut()
            .map(|c| c.len())
            .unwrap_or_else(|e| e.into_inner().len());
        if pending > 0 && self.cleanup_enabled {
            warn!(
                session = %self.id,
                pending,
                "Session dropped with cleanups that never ran"
            );
        }
    }
}
