//! On-disk version storage for tempus.
//!
//! This crate stores whole-directory versions as plain file copies:
//! - A hidden control directory at the project root holds everything
//! - Each version is a numbered folder (`version_1.0`, `version_1.1`, ...)
//! - A metadata sidecar is written into each folder last, so its presence
//!   marks the version as complete
//!
//! # Example
//!
//! ```no_run
//! use tempus_store::{SnapshotStore, VersionId, VersionMetadata};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SnapshotStore::new("/project/root");
//! store.initialize("my-project", "ada").await?;
//!
//! let id = VersionId::FIRST;
//! let metadata = VersionMetadata::new(id, Some("first cut"));
//! store
//!     .write_version(id, &[PathBuf::from("/project/root/src")], metadata)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod fs;

mod error;
mod metadata;
mod store;
mod version;

pub use error::{StoreError, StoreResult};
pub use metadata::{Project, VersionMetadata, NO_MESSAGE};
pub use store::{SnapshotStore, CONTROL_DIR, METADATA_FILE};
pub use version::{ParseVersionError, VersionId, VersionRef};
