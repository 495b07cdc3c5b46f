//! Filesystem primitives for copying and removing whole entries.
//!
//! These operate on one top-level entry at a time (a file or a directory
//! tree), which is the unit the store captures and restores.

use std::io;
use std::path::Path;
use tokio::fs;

/// Copy a file or directory tree from `src` to `dst`.
///
/// Directories are recreated at the destination and their contents copied.
/// Symlinks are followed, so the copy holds the target's bytes.
pub async fn copy_entry(src: &Path, dst: &Path) -> io::Result<()> {
    let metadata = fs::metadata(src).await?;

    if metadata.is_dir() {
        copy_tree(src, dst).await
    } else {
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::copy(src, dst).await?;
        Ok(())
    }
}

/// Remove a file or directory tree.
///
/// A symlink is removed itself, without following it.
pub async fn remove_entry(path: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(path).await?;

    if metadata.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    }
}

/// Copy a directory tree, iteratively to keep recursion off the stack.
async fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    let mut pending = vec![(src.to_path_buf(), dst.to_path_buf())];

    while let Some((from, to)) = pending.pop() {
        fs::create_dir_all(&to).await?;

        let mut entries = fs::read_dir(&from).await?;
        while let Some(entry) = entries.next_entry().await? {
            let target = to.join(entry.file_name());
            if fs::metadata(entry.path()).await?.is_dir() {
                pending.push((entry.path(), target));
            } else {
                fs::copy(entry.path(), &target).await?;
            }
        }
    }

    Ok(())
}
