//! Error types for the core crate.

use tempus_store::{ParseVersionError, StoreError, VersionId};
use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The directory is not under version tracking.
    #[error("not a tracked project: {0} (run `tempus new <name>` first)")]
    NotAProject(String),

    /// The requested version identifier could not be parsed.
    #[error(transparent)]
    InvalidVersion(#[from] ParseVersionError),

    /// The minor counter of the newest version cannot be advanced.
    #[error("version numbering exhausted at {0}")]
    VersionExhausted(VersionId),

    /// Store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid JSON syntax.
    #[error("invalid config at {path}: {message}")]
    InvalidJson { path: String, message: String },
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
