//! Version metadata and the project record.

use crate::version::VersionId;
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Timestamp format used in every persisted record.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Message recorded when a version is saved without one.
pub const NO_MESSAGE: &str = "no message";

/// Current local time in the persisted timestamp format.
pub(crate) fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Metadata sidecar stored alongside a version's files.
///
/// The on-disk field names keep the spelling used by early releases so that
/// existing archives stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionMetadata {
    /// Version this sidecar belongs to.
    pub version: VersionId,

    /// When the version was saved, as `YYYY-MM-DD HH:MM:SS` local time.
    #[serde(rename = "fecha")]
    pub saved_at: String,

    /// Free-form description of the version.
    #[serde(rename = "mensaje")]
    pub message: String,

    /// Number of top-level entries captured into the version directory.
    #[serde(rename = "archivos_guardados")]
    pub entries_saved: u64,
}

impl VersionMetadata {
    /// Create metadata for a version being saved now.
    ///
    /// An absent or empty message records the [`NO_MESSAGE`] sentinel. The
    /// entry count starts at zero; the store fills it in once the copies
    /// have actually happened.
    pub fn new(version: VersionId, message: Option<&str>) -> Self {
        Self {
            version,
            saved_at: timestamp_now(),
            message: message
                .filter(|m| !m.is_empty())
                .unwrap_or(NO_MESSAGE)
                .to_string(),
            entries_saved: 0,
        }
    }
}

/// The project record stored in the control directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Human-readable project name.
    pub name: String,

    /// When tracking was initialized, as `YYYY-MM-DD HH:MM:SS` local time.
    #[serde(rename = "createdAt")]
    pub created_at: String,

    /// Author label recorded at initialization.
    pub author: String,
}

impl Project {
    /// Create a record for a project being initialized now.
    pub fn new(name: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: timestamp_now(),
            author: author.into(),
        }
    }
}
