//! Error types for the test framework.
//!
//! Errors are classified so cleanup code can tell "already gone" apart from
//! genuine failures.

use thiserror::Error;

use crate::wait::WaitError;

/// Error type for framework operations
#[derive(Error, Debug)]
pub enum Error {
    /// Kubernetes API error
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// Transport error talking to the Rancher API
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the Rancher API
    #[error("Rancher API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Condition wait failed
    #[error(transparent)]
    Wait(#[from] WaitError),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML configuration could not be parsed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Chart version is not a valid semantic version
    #[error("Invalid chart version: {0}")]
    InvalidVersion(#[from] semver::Error),

    /// Filesystem error
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Requested external node provider does not exist
    #[error("Node provider {0} not found")]
    UnknownNodeProvider(String),

    /// Static node inventory cannot satisfy the request
    #[error("Node inventory error: {0}")]
    NodeInventory(String),
}

impl Error {
    /// Check if this error indicates a not-found condition
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Kube(kube::Error::Api(e)) => e.code == 404,
            Error::Api { status, .. } => *status == 404,
            _ => false,
        }
    }

    /// Check if this error came from a condition wait whose stream closed
    /// before the condition was met.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Wait(WaitError::StreamClosed))
    }

    pub(crate) fn io(path: impl std::fmt::Display, source: std::io::Error) -> Self {
        Error::Io {
            path: path.to_string(),
            source,
        }
    }
}

/// Result type alias for framework operations
pub type Result<T> = std::result::Result<T, Error>;

/// Treat a not-found error as an already-completed deletion.
///
/// Returns `Ok(None)` when the target was absent, `Ok(Some(value))` on success.
pub fn ignore_not_found<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
