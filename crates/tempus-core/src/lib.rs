//! Core version-tracking logic for tempus.
//!
//! This crate provides the coordination layer between the CLI and the
//! on-disk store:
//! - Project initialization and detection
//! - Version numbering and capture of the working tree
//! - Restore planning with an explicit confirmation step
//! - History and status views
//! - Configuration loading (global and per-project)

pub mod config;
pub mod error;
pub mod manager;
pub mod worktree;

pub use config::{Config, LogLevel};
pub use error::{ConfigError, CoreError, CoreResult};
pub use manager::{
    ConfirmedRestore, LogEntry, ProjectStatus, RestorePlan, RestoreReport, VersionManager,
};
// Re-export the store types that appear in this crate's public API
pub use tempus_store::{Project, StoreError, VersionId, VersionMetadata, NO_MESSAGE};
