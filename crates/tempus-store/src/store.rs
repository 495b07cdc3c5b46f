//! Version storage implementation.

use crate::fs::copy_entry;
use crate::{Project, StoreError, StoreResult, VersionId, VersionMetadata, VersionRef};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Name of the hidden control directory created at the project root.
pub const CONTROL_DIR: &str = ".tempus";

/// Name of the metadata sidecar inside every version directory.
pub const METADATA_FILE: &str = "metadata.json";

const PROJECT_FILE: &str = "project.json";
const VERSIONS_DIR: &str = "versions";
const STAGING_DIR: &str = "staging";

/// Storage for whole-directory versions.
///
/// Versions are stored as plain file copies under a control directory at the
/// project root:
/// ```text
/// <root>/
///   .tempus/
///     project.json           # Project record
///     staging/               # Transient restore staging area
///     versions/
///       version_<M>.<m>/
///         metadata.json      # Sidecar, written last
///         <entry>            # Copied top-level entries
/// ```
pub struct SnapshotStore {
    /// Project root directory.
    root: PathBuf,
}

impl SnapshotStore {
    /// Create a store rooted at `root`.
    ///
    /// Nothing is touched on disk; [`initialize`](Self::initialize) creates
    /// the control directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The project root this store operates on.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the control directory.
    pub fn control_dir(&self) -> PathBuf {
        self.root.join(CONTROL_DIR)
    }

    /// Path of the directory holding a version's files.
    pub fn version_dir(&self, version: &VersionRef) -> PathBuf {
        self.versions_dir().join(&version.dir_name)
    }

    fn project_file(&self) -> PathBuf {
        self.control_dir().join(PROJECT_FILE)
    }

    fn versions_dir(&self) -> PathBuf {
        self.control_dir().join(VERSIONS_DIR)
    }

    fn staging_dir(&self) -> PathBuf {
        self.control_dir().join(STAGING_DIR)
    }

    /// Whether the root has a control directory.
    pub fn is_initialized(&self) -> bool {
        self.control_dir().is_dir()
    }

    /// Create the control directory and write the project record.
    ///
    /// Fails with [`StoreError::AlreadyInitialized`] if a control directory
    /// is already present.
    pub async fn initialize(&self, name: &str, author: &str) -> StoreResult<Project> {
        let control = self.control_dir();
        if control.exists() {
            return Err(StoreError::AlreadyInitialized(
                control.display().to_string(),
            ));
        }

        fs::create_dir_all(self.versions_dir()).await?;

        let project = Project::new(name, author);
        let json = serde_json::to_string_pretty(&project)?;
        fs::write(self.project_file(), json).await?;

        info!(
            "Initialized project '{}' at {}",
            project.name,
            self.root.display()
        );
        Ok(project)
    }

    /// Read the project record.
    pub async fn project(&self) -> StoreResult<Project> {
        let json = fs::read_to_string(self.project_file()).await?;
        Ok(serde_json::from_str(&json)?)
    }

    /// List stored versions, oldest first.
    ///
    /// Entries under the versions directory that do not parse as version
    /// directories are skipped; the directory may hold folders written by
    /// hand or by other tools.
    pub async fn list_versions(&self) -> StoreResult<Vec<VersionRef>> {
        let versions_dir = self.versions_dir();
        let mut versions = Vec::new();

        if !versions_dir.exists() {
            return Ok(versions);
        }

        let mut entries = fs::read_dir(&versions_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            match VersionId::from_dir_name(&name) {
                Some(id) => versions.push(VersionRef { id, dir_name: name }),
                None => debug!("Skipping unrecognized versions entry: {}", name),
            }
        }

        versions.sort();
        Ok(versions)
    }

    /// Find a version by identifier.
    ///
    /// Resolution goes through the parsed listing, so a legacy directory
    /// like `version_3` is found when asked for `3.0`.
    pub async fn find_version(&self, id: VersionId) -> StoreResult<Option<VersionRef>> {
        let versions = self.list_versions().await?;
        Ok(versions.into_iter().find(|v| v.id == id))
    }

    /// The newest stored version, if any.
    pub async fn latest_version(&self) -> StoreResult<Option<VersionRef>> {
        let mut versions = self.list_versions().await?;
        Ok(versions.pop())
    }

    /// Read the metadata sidecar for a version.
    ///
    /// A version directory without a readable sidecar never finished being
    /// written, or was written by an incompatible tool; both cases surface
    /// as [`StoreError::CorruptMetadata`].
    pub async fn read_metadata(&self, version: &VersionRef) -> StoreResult<VersionMetadata> {
        let dir = self.version_dir(version);
        if !dir.exists() {
            return Err(StoreError::not_found(version.id.to_string()));
        }

        let path = dir.join(METADATA_FILE);
        let json = match fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::corrupt(version.id, "metadata sidecar is missing"));
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&json).map_err(|e| StoreError::corrupt(version.id, e.to_string()))
    }

    /// Write a new version directory from the given source entries.
    ///
    /// Entries are copied one at a time; an entry that cannot be copied is
    /// logged and left out rather than failing the whole version. The
    /// sidecar records how many entries actually made it and is written
    /// last, so its presence marks a complete version.
    ///
    /// On error the version directory may be left partially written; the
    /// caller decides whether to prune it with
    /// [`remove_version`](Self::remove_version).
    ///
    /// # Arguments
    /// * `id` - Identifier for the new version
    /// * `sources` - Absolute paths of the top-level entries to capture
    /// * `metadata` - Sidecar content; the entry count is filled in here
    #[allow(clippy::cognitive_complexity)]
    pub async fn write_version(
        &self,
        id: VersionId,
        sources: &[PathBuf],
        mut metadata: VersionMetadata,
    ) -> StoreResult<VersionMetadata> {
        let dir = self.versions_dir().join(id.dir_name());
        fs::create_dir_all(&dir).await?;

        // Copy entries
        let mut copied = 0u64;
        for src in sources {
            let name = match src.file_name() {
                Some(name) => name,
                None => {
                    warn!("Skipping entry without a file name: {}", src.display());
                    continue;
                }
            };

            match copy_entry(src, &dir.join(name)).await {
                Ok(()) => {
                    copied += 1;
                    debug!("Captured: {}", name.to_string_lossy());
                }
                Err(e) => warn!("Failed to capture {}: {}", src.display(), e),
            }
        }

        // Write the sidecar last; it marks the version as complete
        metadata.version = id;
        metadata.entries_saved = copied;
        let json = serde_json::to_string_pretty(&metadata)?;
        fs::write(dir.join(METADATA_FILE), json).await?;

        info!("Wrote version {} with {} entries", id, copied);
        Ok(metadata)
    }

    /// Delete a version directory.
    pub async fn remove_version(&self, version: &VersionRef) -> StoreResult<()> {
        let dir = self.version_dir(version);
        if !dir.exists() {
            return Err(StoreError::not_found(version.id.to_string()));
        }

        fs::remove_dir_all(&dir).await?;
        info!("Removed version {}", version.id);

        Ok(())
    }

    /// List the entries stored in a version directory, excluding the sidecar.
    pub async fn version_files(&self, version: &VersionRef) -> StoreResult<Vec<PathBuf>> {
        let dir = self.version_dir(version);
        if !dir.exists() {
            return Err(StoreError::not_found(version.id.to_string()));
        }

        let mut files = Vec::new();
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_name() == METADATA_FILE {
                continue;
            }
            files.push(entry.path());
        }

        files.sort();
        Ok(files)
    }

    /// Copy a version's entries into the staging area and return its path.
    ///
    /// The staging area lives inside the control directory so that later
    /// renames into the root stay on one filesystem. Any previous staging
    /// content is cleared first. A copy failure here aborts the whole
    /// operation; nothing outside the control directory has been touched
    /// at that point.
    pub async fn stage_version(&self, version: &VersionRef) -> StoreResult<PathBuf> {
        let staging = self.staging_dir();
        self.clear_staging().await?;
        fs::create_dir_all(&staging).await?;

        for src in self.version_files(version).await? {
            if let Some(name) = src.file_name() {
                copy_entry(&src, &staging.join(name)).await?;
                debug!("Staged: {}", name.to_string_lossy());
            }
        }

        Ok(staging)
    }

    /// Remove the staging area if present.
    pub async fn clear_staging(&self) -> StoreResult<()> {
        match fs::remove_dir_all(self.staging_dir()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
