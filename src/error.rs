// Package error defines the errors surfaced to callers of a refresher.

use std::sync::Arc;
use std::time::Duration;

/// Errors returned by [`crate::Refresher::wait_for_initial_value`].
///
/// Steady-state refresh and storage failures never show up here; they are
/// reported through the failure hooks only.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RefresherError {
    /// No initial value was published within the given timeout.
    #[error("timed out after {timeout:?} waiting for initial value")]
    Timeout { timeout: Duration },

    /// The very first acquisition attempt failed.
    #[error("failed to acquire initial value: {0:#}")]
    Initialization(Arc<anyhow::Error>),

    /// The refresher was stopped before an initial value was published.
    #[error("refresher stopped before an initial value was acquired")]
    Stopped,
}

impl RefresherError {
    /// Checks whether the error is a wait timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, RefresherError::Timeout { .. })
    }

    /// Returns the underlying acquisition error, if any.
    pub fn acquisition_error(&self) -> Option<&anyhow::Error> {
        match self {
            RefresherError::Initialization(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
