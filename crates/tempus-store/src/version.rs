//! Version identifiers and their on-disk directory names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a version identifier cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid version identifier: {0}")]
pub struct ParseVersionError(pub String);

/// Identifier of a stored version.
///
/// Versions are numbered `major.minor` and ordered numerically, so `1.10`
/// sorts after `1.9`. Identifiers serialize as the string form (`"1.0"`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct VersionId {
    /// Major component.
    pub major: u32,
    /// Minor component, bumped on every save.
    pub minor: u32,
}

impl VersionId {
    /// The identifier given to a project's first version.
    pub const FIRST: VersionId = VersionId { major: 1, minor: 0 };

    /// Create an identifier from its components.
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// The identifier allocated after this one.
    ///
    /// Only the minor component advances; major bumps are a deliberate,
    /// manual act. `None` when the minor counter has no room left; a full
    /// counter must not wrap back onto an identifier that already exists.
    pub fn next_minor(&self) -> Option<Self> {
        Some(Self {
            major: self.major,
            minor: self.minor.checked_add(1)?,
        })
    }

    /// Canonical directory name for this version (`version_1.0`).
    pub fn dir_name(&self) -> String {
        format!("version_{}", self)
    }

    /// Parse a directory entry name from the versions directory.
    ///
    /// Returns `None` for names that are not version directories, including
    /// names with an unparseable number part.
    pub fn from_dir_name(name: &str) -> Option<Self> {
        name.strip_prefix("version_")?.parse().ok()
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for VersionId {
    type Err = ParseVersionError;

    /// Parse `"major.minor"`. A bare `"major"` is accepted as `major.0`,
    /// the spelling used by early releases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = match s.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (s, "0"),
        };

        let major = major
            .parse()
            .map_err(|_| ParseVersionError(s.to_string()))?;
        let minor = minor
            .parse()
            .map_err(|_| ParseVersionError(s.to_string()))?;

        Ok(Self { major, minor })
    }
}

impl TryFrom<String> for VersionId {
    type Error = ParseVersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VersionId> for String {
    fn from(id: VersionId) -> Self {
        id.to_string()
    }
}

/// A version directory found on disk.
///
/// Keeps the directory name actually present alongside the parsed
/// identifier, so legacy spellings (`version_3` for `3.0`) resolve without
/// guessing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct VersionRef {
    /// Parsed identifier.
    pub id: VersionId,
    /// Directory name as it exists under the versions directory.
    pub dir_name: String,
}

impl VersionRef {
    /// Reference a version by its canonical directory name.
    pub fn new(id: VersionId) -> Self {
        Self {
            dir_name: id.dir_name(),
            id,
        }
    }
}
