//! Error types for kube-status-util

use thiserror::Error;

/// Result type for the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the crate
///
/// The status and namespace types never fail; these variants only come from
/// talking to the API server or reading configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// Kubernetes API error
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Status serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
