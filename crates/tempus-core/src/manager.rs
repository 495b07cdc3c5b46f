//! Version management: save, restore, history and status.

use crate::error::{CoreError, CoreResult};
use crate::worktree;
use std::path::{Path, PathBuf};
use tempus_store::fs::{copy_entry, remove_entry};
use tempus_store::{
    Project, SnapshotStore, StoreError, VersionId, VersionMetadata, VersionRef,
};
use tokio::fs;
use tracing::{debug, info, warn};

/// A resolved restore that has not been confirmed yet.
///
/// Produced by [`VersionManager::plan_restore`]; carries what the caller
/// needs to show before asking for confirmation.
#[derive(Debug, Clone)]
pub struct RestorePlan {
    version: VersionRef,
    metadata: Option<VersionMetadata>,
}

impl RestorePlan {
    /// Version this plan restores.
    pub fn version(&self) -> VersionId {
        self.version.id
    }

    /// Metadata of the version, when its sidecar was readable.
    pub fn metadata(&self) -> Option<&VersionMetadata> {
        self.metadata.as_ref()
    }

    /// Mark the plan as confirmed.
    ///
    /// Restoring replaces the working tree, so [`VersionManager::restore`]
    /// only accepts a confirmed plan; the question cannot be skipped by
    /// accident.
    pub fn confirm(self) -> ConfirmedRestore {
        ConfirmedRestore { plan: self }
    }
}

/// A restore plan the caller has confirmed.
#[derive(Debug)]
pub struct ConfirmedRestore {
    plan: RestorePlan,
}

/// Outcome of a completed restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    /// Version that was restored.
    pub version: VersionId,
    /// Top-level entries removed from the working tree.
    pub removed: usize,
    /// Top-level entries brought back from the version.
    pub restored: usize,
}

/// One entry of the version history, newest first.
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Version the entry describes.
    pub version: VersionId,
    /// Sidecar content, when readable.
    pub metadata: Option<VersionMetadata>,
}

/// Summary of a tracked project.
#[derive(Debug, Clone)]
pub struct ProjectStatus {
    /// The project record.
    pub project: Project,
    /// Project root directory.
    pub root: PathBuf,
    /// Number of stored versions.
    pub version_count: usize,
    /// Newest stored version, if any.
    pub latest: Option<VersionId>,
}

/// Coordinates versioning of a single project directory.
///
/// All operations check that the directory is actually tracked and fail
/// with [`CoreError::NotAProject`] otherwise; nothing here creates a
/// control directory implicitly.
pub struct VersionManager {
    store: SnapshotStore,
    root: PathBuf,
}

impl VersionManager {
    /// Create a manager for the project rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            store: SnapshotStore::new(&root),
            root,
        }
    }

    /// The project root this manager operates on.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The underlying store.
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    fn ensure_project(&self) -> CoreResult<()> {
        if self.store.is_initialized() {
            Ok(())
        } else {
            Err(CoreError::NotAProject(self.root.display().to_string()))
        }
    }

    /// Put the directory under version tracking.
    pub async fn init(&self, name: &str, author: &str) -> CoreResult<Project> {
        let project = self.store.initialize(name, author).await?;
        Ok(project)
    }

    /// Identifier the next save will use.
    ///
    /// The highest stored version decides: its minor component is bumped.
    /// A project with no versions starts at `1.0`. Directories that do not
    /// parse as versions never participate, so a stray folder cannot derail
    /// the numbering. A minor counter already at its maximum fails with
    /// [`CoreError::VersionExhausted`] instead of reusing an identifier.
    pub async fn next_version(&self) -> CoreResult<VersionId> {
        self.ensure_project()?;
        match self.store.latest_version().await? {
            Some(latest) => latest
                .id
                .next_minor()
                .ok_or(CoreError::VersionExhausted(latest.id)),
            None => Ok(VersionId::FIRST),
        }
    }

    /// Capture the working tree as a new version.
    ///
    /// Top-level entries are copied into a fresh version directory; the
    /// control directory and dot-prefixed entries stay out. An entry that
    /// cannot be copied is skipped with a warning and left out of the
    /// recorded count. If the version directory itself cannot be completed,
    /// the partial directory is pruned before the error is returned.
    pub async fn save(&self, message: Option<&str>) -> CoreResult<VersionMetadata> {
        self.ensure_project()?;

        let id = self.next_version().await?;
        let sources = worktree::snapshot_entries(&self.root).await?;
        debug!(version = %id, entries = sources.len(), "Saving working tree");

        let metadata = VersionMetadata::new(id, message);
        match self.store.write_version(id, &sources, metadata).await {
            Ok(written) => Ok(written),
            Err(e) => {
                // Without its sidecar the directory is an unusable husk;
                // prune it so it cannot linger half-written.
                let partial = VersionRef::new(id);
                if let Err(prune_err) = self.store.remove_version(&partial).await {
                    warn!(version = %id, error = %prune_err, "Failed to prune partial version");
                }
                Err(e.into())
            }
        }
    }

    /// Resolve a version identifier into a restore plan.
    ///
    /// Accepts `1.2`, a bare `3` for `3.0`, and a leading `v` marker
    /// (`v1.2`). The plan carries the version's metadata when the sidecar
    /// is readable; an unreadable sidecar does not block restoring.
    pub async fn plan_restore(&self, input: &str) -> CoreResult<RestorePlan> {
        self.ensure_project()?;

        let id: VersionId = strip_marker(input).parse()?;
        let version = self
            .store
            .find_version(id)
            .await?
            .ok_or_else(|| StoreError::not_found(id.to_string()))?;

        let metadata = match self.store.read_metadata(&version).await {
            Ok(metadata) => Some(metadata),
            Err(StoreError::CorruptMetadata { .. }) => {
                warn!(version = %id, "Version metadata is unreadable; restoring anyway");
                None
            }
            Err(e) => return Err(e.into()),
        };

        Ok(RestorePlan { version, metadata })
    }

    /// Replace the working tree with the planned version.
    ///
    /// The version is first staged in full inside the control directory;
    /// only then is the working tree emptied and the staged entries moved
    /// into place. A failure during staging leaves the working tree
    /// untouched. During the swap itself, entries that cannot be removed or
    /// moved are logged and skipped so one stubborn file does not abort the
    /// rest.
    #[allow(clippy::cognitive_complexity)]
    pub async fn restore(&self, confirmed: ConfirmedRestore) -> CoreResult<RestoreReport> {
        self.ensure_project()?;
        let plan = confirmed.plan;

        // Stage the full version before touching the working tree
        let staging = self.store.stage_version(&plan.version).await?;

        // Empty the working tree
        let mut removed = 0;
        for entry in worktree::snapshot_entries(&self.root).await? {
            match remove_entry(&entry).await {
                Ok(()) => {
                    removed += 1;
                    debug!(entry = %entry.display(), "Removed");
                }
                Err(e) => {
                    warn!(entry = %entry.display(), error = %e, "Failed to remove entry")
                }
            }
        }

        // Move the staged entries into place; renames stay on the same
        // filesystem, so each entry appears whole or not at all
        let mut restored = 0;
        let version_dir = self.store.version_dir(&plan.version);
        let mut staged = fs::read_dir(&staging).await?;
        while let Some(entry) = staged.next_entry().await? {
            let name = entry.file_name();
            let target = self.root.join(&name);
            match fs::rename(entry.path(), &target).await {
                Ok(()) => {
                    restored += 1;
                    debug!(entry = %name.to_string_lossy(), "Restored");
                }
                Err(rename_err) => {
                    debug!(
                        entry = %name.to_string_lossy(),
                        error = %rename_err,
                        "Rename out of staging failed; copying instead"
                    );
                    match copy_entry(&version_dir.join(&name), &target).await {
                        Ok(()) => restored += 1,
                        Err(e) => {
                            warn!(entry = %name.to_string_lossy(), error = %e, "Failed to restore entry")
                        }
                    }
                }
            }
        }

        if let Err(e) = self.store.clear_staging().await {
            warn!(error = %e, "Failed to clear staging area");
        }

        info!(version = %plan.version.id, removed, restored, "Restore complete");
        Ok(RestoreReport {
            version: plan.version.id,
            removed,
            restored,
        })
    }

    /// The version history, newest first.
    ///
    /// Versions whose sidecar is unreadable still appear, with no metadata
    /// attached, so history never hides what exists on disk.
    pub async fn log(&self) -> CoreResult<Vec<LogEntry>> {
        self.ensure_project()?;

        let mut entries = Vec::new();
        for version in self.store.list_versions().await?.into_iter().rev() {
            let metadata = match self.store.read_metadata(&version).await {
                Ok(metadata) => Some(metadata),
                Err(StoreError::CorruptMetadata { .. }) => {
                    debug!(version = %version.id, "Metadata unavailable");
                    None
                }
                Err(e) => return Err(e.into()),
            };
            entries.push(LogEntry {
                version: version.id,
                metadata,
            });
        }

        Ok(entries)
    }

    /// Summary of the project: record, location and version counts.
    pub async fn status(&self) -> CoreResult<ProjectStatus> {
        self.ensure_project()?;

        let project = self.store.project().await?;
        let versions = self.store.list_versions().await?;

        Ok(ProjectStatus {
            project,
            root: self.root.clone(),
            version_count: versions.len(),
            latest: versions.last().map(|v| v.id),
        })
    }
}

/// Strip the optional leading `v` marker from user input (`v1.2` -> `1.2`).
fn strip_marker(input: &str) -> &str {
    input.strip_prefix(['v', 'V']).unwrap_or(input)
}
