//! Working-tree enumeration.

use std::io;
use std::path::{Path, PathBuf};
use tempus_store::CONTROL_DIR;
use tokio::fs;

/// List the top-level entries of `root` that participate in versioning.
///
/// The control directory and any dot-prefixed entry are excluded, which
/// keeps editor and tool state out of versions. The same rule decides what
/// a restore is allowed to delete. Entries come back sorted for stable
/// ordering.
pub async fn snapshot_entries(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut entries = Vec::new();

    let mut dir = fs::read_dir(root).await?;
    while let Some(entry) = dir.next_entry().await? {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name == CONTROL_DIR || name.starts_with('.') {
            continue;
        }
        entries.push(entry.path());
    }

    entries.sort();
    Ok(entries)
}
