//! Version manager integration tests.
//!
//! Exercises the full save/restore lifecycle against a real temporary
//! directory.

use std::fs;
use tempfile::TempDir;
use tempus_core::{CoreError, StoreError, VersionId, VersionManager, NO_MESSAGE};

async fn setup_project() -> (TempDir, VersionManager) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let manager = VersionManager::new(temp.path());
    manager
        .init("demo", "tester")
        .await
        .expect("Failed to init project");
    (temp, manager)
}

/// Test that init writes the project record and layout.
#[tokio::test]
async fn test_init_creates_project() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let manager = VersionManager::new(temp.path());

    let project = manager
        .init("my-project", "ada")
        .await
        .expect("Failed to init project");

    assert_eq!(project.name, "my-project");
    assert_eq!(project.author, "ada");
    assert!(temp.path().join(".tempus/project.json").is_file());
    assert!(temp.path().join(".tempus/versions").is_dir());
}

/// Test that initializing twice is rejected.
#[tokio::test]
async fn test_init_twice_fails() {
    let (_temp, manager) = setup_project().await;

    let result = manager.init("again", "ada").await;
    assert!(matches!(
        result,
        Err(CoreError::Store(StoreError::AlreadyInitialized(_)))
    ));
}

/// Test that operations on an untracked directory fail cleanly.
#[tokio::test]
async fn test_untracked_directory_is_rejected() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let manager = VersionManager::new(temp.path());

    assert!(matches!(
        manager.save(None).await,
        Err(CoreError::NotAProject(_))
    ));
    assert!(matches!(
        manager.log().await,
        Err(CoreError::NotAProject(_))
    ));
    assert!(matches!(
        manager.status().await,
        Err(CoreError::NotAProject(_))
    ));
    assert!(matches!(
        manager.plan_restore("1.0").await,
        Err(CoreError::NotAProject(_))
    ));

    // Nothing was created as a side effect
    assert!(!temp.path().join(".tempus").exists());
}

/// Test that version numbers advance minor-by-minor from 1.0.
#[tokio::test]
async fn test_version_numbering_sequence() {
    let (temp, manager) = setup_project().await;
    fs::write(temp.path().join("a.txt"), "x").expect("Failed to write file");

    assert_eq!(
        manager.next_version().await.expect("next_version failed"),
        VersionId::FIRST
    );

    let first = manager.save(None).await.expect("Failed to save");
    let second = manager.save(None).await.expect("Failed to save");
    let third = manager.save(None).await.expect("Failed to save");

    assert_eq!(first.version, VersionId::new(1, 0));
    assert_eq!(second.version, VersionId::new(1, 1));
    assert_eq!(third.version, VersionId::new(1, 2));
}

/// Test that stray folders in the versions directory do not derail numbering.
#[tokio::test]
async fn test_numbering_ignores_malformed_directories() {
    let (temp, manager) = setup_project().await;
    fs::write(temp.path().join("a.txt"), "x").expect("Failed to write file");

    let versions_dir = temp.path().join(".tempus/versions");
    fs::create_dir(versions_dir.join("backup")).expect("Failed to create dir");
    fs::create_dir(versions_dir.join("version_broken")).expect("Failed to create dir");

    let saved = manager.save(None).await.expect("Failed to save");
    assert_eq!(saved.version, VersionId::new(1, 0));
}

/// Test that numbering continues from a legacy dotless version directory.
#[tokio::test]
async fn test_numbering_continues_from_legacy_directory() {
    let (temp, manager) = setup_project().await;
    fs::write(temp.path().join("a.txt"), "x").expect("Failed to write file");

    let legacy = temp.path().join(".tempus/versions/version_3");
    fs::create_dir(&legacy).expect("Failed to create legacy dir");

    let saved = manager.save(None).await.expect("Failed to save");
    assert_eq!(saved.version, VersionId::new(3, 1));
}

/// Test that a maxed-out minor counter fails allocation instead of wrapping.
#[tokio::test]
async fn test_numbering_stops_at_minor_limit() {
    let (temp, manager) = setup_project().await;
    fs::write(temp.path().join("a.txt"), "x").expect("Failed to write file");

    let maxed = format!("version_1.{}", u32::MAX);
    fs::create_dir(temp.path().join(".tempus/versions").join(&maxed))
        .expect("Failed to create dir");

    let result = manager.save(None).await;
    assert!(matches!(
        result,
        Err(CoreError::VersionExhausted(id)) if id == VersionId::new(1, u32::MAX)
    ));

    // Nothing was written, and allocation did not wrap onto 1.0
    assert!(!temp.path().join(".tempus/versions/version_1.0").exists());
    assert!(temp.path().join(".tempus/versions").join(&maxed).is_dir());
}

/// Test that a save copies regular entries and skips hidden ones.
#[tokio::test]
async fn test_save_excludes_control_dir_and_dotfiles() {
    let (temp, manager) = setup_project().await;

    fs::write(temp.path().join("main.py"), "print('hi')").expect("Failed to write file");
    fs::create_dir(temp.path().join("src")).expect("Failed to create dir");
    fs::write(temp.path().join("src/lib.py"), "pass").expect("Failed to write file");
    fs::create_dir(temp.path().join(".git")).expect("Failed to create dir");
    fs::write(temp.path().join(".env"), "SECRET=1").expect("Failed to write file");

    let saved = manager.save(Some("first")).await.expect("Failed to save");
    assert_eq!(saved.entries_saved, 2);

    let version_dir = temp.path().join(".tempus/versions/version_1.0");
    assert!(version_dir.join("main.py").is_file());
    assert!(version_dir.join("src/lib.py").is_file());
    assert!(!version_dir.join(".git").exists());
    assert!(!version_dir.join(".env").exists());
    assert!(version_dir.join("metadata.json").is_file());
}

/// Test the default message sentinel, including an explicitly empty message.
#[tokio::test]
async fn test_save_default_message() {
    let (temp, manager) = setup_project().await;
    fs::write(temp.path().join("a.txt"), "x").expect("Failed to write file");

    let saved = manager.save(None).await.expect("Failed to save");
    assert_eq!(saved.message, NO_MESSAGE);

    let saved = manager.save(Some("")).await.expect("Failed to save");
    assert_eq!(saved.message, NO_MESSAGE);

    let saved = manager.save(Some("tuned")).await.expect("Failed to save");
    assert_eq!(saved.message, "tuned");
}

/// Test that restoring an old version brings the tree back exactly.
#[tokio::test]
async fn test_restore_round_trip() {
    let (temp, manager) = setup_project().await;

    fs::write(temp.path().join("main.py"), "version one").expect("Failed to write file");
    fs::create_dir(temp.path().join("src")).expect("Failed to create dir");
    fs::write(temp.path().join("src/lib.py"), "lib one").expect("Failed to write file");
    manager.save(Some("one")).await.expect("Failed to save");

    // Drift: edit, add, delete, plus a dotfile that must ride through
    fs::write(temp.path().join("main.py"), "version two").expect("Failed to write file");
    fs::write(temp.path().join("extra.txt"), "new file").expect("Failed to write file");
    fs::write(temp.path().join(".env"), "SECRET=1").expect("Failed to write file");
    fs::remove_dir_all(temp.path().join("src")).expect("Failed to remove dir");
    manager.save(Some("two")).await.expect("Failed to save");

    let plan = manager
        .plan_restore("1.0")
        .await
        .expect("Failed to plan restore");
    assert_eq!(plan.version(), VersionId::new(1, 0));
    assert_eq!(
        plan.metadata().map(|m| m.message.as_str()),
        Some("one")
    );

    let report = manager
        .restore(plan.confirm())
        .await
        .expect("Failed to restore");
    assert_eq!(report.version, VersionId::new(1, 0));
    assert_eq!(report.restored, 2);

    // The tree matches version 1.0 again
    let main = fs::read_to_string(temp.path().join("main.py")).expect("Failed to read");
    assert_eq!(main, "version one");
    let lib = fs::read_to_string(temp.path().join("src/lib.py")).expect("Failed to read");
    assert_eq!(lib, "lib one");
    assert!(!temp.path().join("extra.txt").exists());

    // The dotfile was neither captured nor deleted
    let env = fs::read_to_string(temp.path().join(".env")).expect("Failed to read");
    assert_eq!(env, "SECRET=1");

    // The store survived the swap
    assert!(temp.path().join(".tempus/project.json").is_file());
    assert!(temp.path().join(".tempus/versions/version_1.1").is_dir());
    assert!(!temp.path().join(".tempus/staging").exists());
}

/// Test that a version can be restored repeatedly with the same result.
#[tokio::test]
async fn test_restore_is_repeatable() {
    let (temp, manager) = setup_project().await;

    fs::write(temp.path().join("a.txt"), "stable").expect("Failed to write file");
    manager.save(None).await.expect("Failed to save");

    for _ in 0..2 {
        fs::write(temp.path().join("a.txt"), "drifted").expect("Failed to write file");
        let plan = manager
            .plan_restore("1.0")
            .await
            .expect("Failed to plan restore");
        manager
            .restore(plan.confirm())
            .await
            .expect("Failed to restore");
        let content = fs::read_to_string(temp.path().join("a.txt")).expect("Failed to read");
        assert_eq!(content, "stable");
    }
}

/// Test that restoring an unknown version fails without touching the tree.
#[tokio::test]
async fn test_restore_unknown_version_leaves_tree_alone() {
    let (temp, manager) = setup_project().await;
    fs::write(temp.path().join("a.txt"), "untouched").expect("Failed to write file");
    manager.save(None).await.expect("Failed to save");

    let result = manager.plan_restore("9.9").await;
    assert!(matches!(
        result,
        Err(CoreError::Store(StoreError::VersionNotFound(_)))
    ));

    let content = fs::read_to_string(temp.path().join("a.txt")).expect("Failed to read");
    assert_eq!(content, "untouched");
}

/// Test that an unparseable identifier is rejected before any lookup.
#[tokio::test]
async fn test_restore_invalid_identifier() {
    let (_temp, manager) = setup_project().await;

    let result = manager.plan_restore("latest").await;
    assert!(matches!(result, Err(CoreError::InvalidVersion(_))));
}

/// Test that a corrupt sidecar does not block restoring the files.
#[tokio::test]
async fn test_restore_with_corrupt_metadata() {
    let (temp, manager) = setup_project().await;

    fs::write(temp.path().join("a.txt"), "good bytes").expect("Failed to write file");
    manager.save(Some("ok")).await.expect("Failed to save");

    let sidecar = temp.path().join(".tempus/versions/version_1.0/metadata.json");
    fs::write(&sidecar, "{ mangled").expect("Failed to corrupt sidecar");

    fs::write(temp.path().join("a.txt"), "drifted").expect("Failed to write file");

    let plan = manager
        .plan_restore("1.0")
        .await
        .expect("Failed to plan restore");
    assert!(plan.metadata().is_none());

    manager
        .restore(plan.confirm())
        .await
        .expect("Failed to restore");
    let content = fs::read_to_string(temp.path().join("a.txt")).expect("Failed to read");
    assert_eq!(content, "good bytes");
}

/// Test that legacy identifiers and the `v` marker resolve.
#[tokio::test]
async fn test_restore_accepts_marker_and_legacy_forms() {
    let (temp, manager) = setup_project().await;

    let legacy = temp.path().join(".tempus/versions/version_3");
    fs::create_dir(&legacy).expect("Failed to create legacy dir");
    fs::write(legacy.join("old.txt"), "from v3").expect("Failed to write file");

    for input in ["3", "3.0", "v3", "v3.0"] {
        let plan = manager
            .plan_restore(input)
            .await
            .expect("Failed to plan restore");
        assert_eq!(plan.version(), VersionId::new(3, 0));
    }

    let plan = manager
        .plan_restore("v3")
        .await
        .expect("Failed to plan restore");
    manager
        .restore(plan.confirm())
        .await
        .expect("Failed to restore");
    let content = fs::read_to_string(temp.path().join("old.txt")).expect("Failed to read");
    assert_eq!(content, "from v3");
}

/// Test the history view ordering and corrupt-sidecar handling.
#[tokio::test]
async fn test_log_newest_first() {
    let (temp, manager) = setup_project().await;
    fs::write(temp.path().join("a.txt"), "x").expect("Failed to write file");

    manager.save(Some("first")).await.expect("Failed to save");
    manager.save(Some("second")).await.expect("Failed to save");
    manager.save(Some("third")).await.expect("Failed to save");

    // Mangle the middle sidecar
    let sidecar = temp.path().join(".tempus/versions/version_1.1/metadata.json");
    fs::write(&sidecar, "not json").expect("Failed to corrupt sidecar");

    let entries = manager.log().await.expect("Failed to read log");
    assert_eq!(entries.len(), 3);

    assert_eq!(entries[0].version, VersionId::new(1, 2));
    assert_eq!(
        entries[0].metadata.as_ref().map(|m| m.message.as_str()),
        Some("third")
    );
    assert_eq!(entries[1].version, VersionId::new(1, 1));
    assert!(entries[1].metadata.is_none());
    assert_eq!(entries[2].version, VersionId::new(1, 0));
}

/// Test the project status summary.
#[tokio::test]
async fn test_status_summary() {
    let (temp, manager) = setup_project().await;
    fs::write(temp.path().join("a.txt"), "x").expect("Failed to write file");

    let status = manager.status().await.expect("Failed to read status");
    assert_eq!(status.project.name, "demo");
    assert_eq!(status.version_count, 0);
    assert_eq!(status.latest, None);

    manager.save(None).await.expect("Failed to save");
    manager.save(None).await.expect("Failed to save");

    let status = manager.status().await.expect("Failed to read status");
    assert_eq!(status.version_count, 2);
    assert_eq!(status.latest, Some(VersionId::new(1, 1)));
    assert_eq!(status.root, temp.path());
}

/// Test that an empty working tree still saves a (file-less) version.
#[tokio::test]
async fn test_save_empty_tree() {
    let (temp, manager) = setup_project().await;

    let saved = manager.save(None).await.expect("Failed to save");
    assert_eq!(saved.entries_saved, 0);
    assert!(temp
        .path()
        .join(".tempus/versions/version_1.0/metadata.json")
        .is_file());
}
