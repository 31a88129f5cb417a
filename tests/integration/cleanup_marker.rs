//! Lifecycle of the deferred cleanup marker through the engine API.

use addonsync::catalog::Platform;
use addonsync::constants::CLEANUP_MARKER;
use addonsync::test_utils::FakeHttp;
use anyhow::Result;
use addonsync::engine::UpdateEngine;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use super::common::{engine_with, names_in};

fn pack_folder(temp: &TempDir) -> Result<PathBuf> {
    let extensions = temp.path().join("geyser").join("extensions");
    let folder = extensions.join("GeyserModelEnginePackGenerator");
    std::fs::create_dir_all(folder.join("input"))?;
    std::fs::write(folder.join("input").join("dragon.bbmodel"), "{}")?;
    std::fs::create_dir_all(folder.join("output").join("textures"))?;
    std::fs::write(folder.join("output").join("textures").join("dragon.png"), "png")?;
    std::fs::write(folder.join("generated_pack.zip"), "zip")?;
    std::fs::write(folder.join("GeyserModelEnginePackGenerator.jar"), "jar")?;
    Ok(folder)
}

#[test]
fn test_sweep_without_marker_deletes_nothing() -> Result<()> {
    let temp = TempDir::new()?;
    let folder = pack_folder(&temp)?;
    let before = names_in(&folder);
    let engine = engine_with(&[], FakeHttp::new());

    assert!(engine.execute_cleanup_if_pending(Platform::Velocity, temp.path()).is_none());
    assert_eq!(names_in(&folder), before);
    Ok(())
}

#[test]
fn test_marker_is_not_overwritten() -> Result<()> {
    let temp = TempDir::new()?;
    let folder = pack_folder(&temp)?;
    std::fs::write(folder.join(CLEANUP_MARKER), "first")?;
    let engine = engine_with(&[], FakeHttp::new());

    assert!(!engine.simulate_update_marker(Platform::Velocity, temp.path()));
    assert_eq!(std::fs::read_to_string(folder.join(CLEANUP_MARKER))?, "first");
    Ok(())
}

#[test]
fn test_full_lifecycle() -> Result<()> {
    let temp = TempDir::new()?;
    let folder = pack_folder(&temp)?;
    let engine = engine_with(&[], FakeHttp::new());

    assert!(engine.simulate_update_marker(Platform::Velocity, temp.path()));
    assert!(folder.join(CLEANUP_MARKER).is_file());
    assert_eq!(std::fs::metadata(folder.join(CLEANUP_MARKER))?.len(), 0);

    let report = engine
        .execute_cleanup_if_pending(Platform::Velocity, temp.path())
        .expect("marker present");
    assert!(report.failed.is_empty());
    assert_eq!(report.removed.len(), 2);
    assert_eq!(names_in(&folder), ["GeyserModelEnginePackGenerator.jar", "input"]);
    assert!(folder.join("input").join("dragon.bbmodel").exists());

    // Idempotent once the marker is gone.
    assert!(engine.execute_cleanup_if_pending(Platform::Velocity, temp.path()).is_none());
    assert_eq!(names_in(&folder), ["GeyserModelEnginePackGenerator.jar", "input"]);
    Ok(())
}

#[test]
fn test_marker_respects_configuration() -> Result<()> {
    let temp = TempDir::new()?;
    pack_folder(&temp)?;

    let mut config = super::common::config_with(&[]);
    config.updates.cleanup_on_update = false;
    let engine = UpdateEngine::with_client(Arc::new(config), FakeHttp::new());

    assert!(!engine.simulate_update_marker(Platform::Velocity, temp.path()));
    Ok(())
}
