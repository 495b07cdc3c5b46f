//! Store error types.

use crate::version::VersionId;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in the version store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The project root is already under version tracking.
    #[error("Already initialized: control directory exists at {0}")]
    AlreadyInitialized(String),

    /// Version not found.
    #[error("Version not found: {0}")]
    VersionNotFound(String),

    /// A version directory exists but its metadata sidecar is unreadable.
    #[error("Metadata for version {version} is unreadable: {reason}")]
    CorruptMetadata { version: String, reason: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Create a version-not-found error.
    pub fn not_found(version: impl Into<String>) -> Self {
        Self::VersionNotFound(version.into())
    }

    /// Create a corrupt-metadata error.
    pub fn corrupt(version: VersionId, reason: impl Into<String>) -> Self {
        Self::CorruptMetadata {
            version: version.to_string(),
            reason: reason.into(),
        }
    }
}
