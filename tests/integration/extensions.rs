//! Geyser extensions install under the Geyser data folder.

use addonsync::catalog::{Platform, Project};
use addonsync::constants::CLEANUP_MARKER;
use addonsync::test_utils::{FakeHttp, jar_bytes};
use anyhow::Result;
use serde_json::json;
use tempfile::TempDir;

use super::common::{engine_with, names_in};

const COSMETICS_LATEST: &str =
    "https://api.github.com/repos/GeyserMC/ThirdPartyCosmetics/releases/latest";
const COSMETICS_JAR: &str =
    "https://github.com/GeyserMC/ThirdPartyCosmetics/releases/download/1.3/ThirdPartyCosmetics-1.3.jar";

fn cosmetics() -> FakeHttp {
    FakeHttp::new()
        .with_json(
            COSMETICS_LATEST,
            json!({ "tag_name": "1.3", "assets": [ { "browser_download_url": COSMETICS_JAR } ] }),
        )
        .with_bytes(COSMETICS_JAR, jar_bytes("ThirdPartyCosmetics"))
}

#[tokio::test]
async fn test_missing_parent_fails_and_writes_nothing() -> Result<()> {
    let temp = TempDir::new()?;
    let http = cosmetics();
    let engine = engine_with(&[Project::ThirdPartyCosmetics], http.clone());

    let outcome = engine
        .install_latest(Project::ThirdPartyCosmetics, Platform::BungeeCord, temp.path())
        .await;

    let error = outcome.error().expect("should fail");
    assert!(!error.is_empty());
    assert!(error.contains("Geyser"), "{error}");
    assert!(names_in(temp.path()).is_empty());
    assert!(http.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_installs_into_extensions_folder() -> Result<()> {
    let temp = TempDir::new()?;
    std::fs::create_dir(temp.path().join("Geyser-BungeeCord"))?;
    let engine = engine_with(&[Project::ThirdPartyCosmetics], cosmetics());

    let outcomes = engine.check_and_update(Platform::BungeeCord, temp.path()).await;
    assert!(outcomes[0].updated(), "{outcomes:?}");

    let extensions = temp.path().join("Geyser-BungeeCord").join("extensions");
    assert_eq!(names_in(&extensions), ["ThirdPartyCosmetics-1.3.jar"]);
    assert_eq!(names_in(temp.path()), ["Geyser-BungeeCord"]);
    Ok(())
}

#[tokio::test]
async fn test_pack_generator_update_schedules_cleanup_once() -> Result<()> {
    let temp = TempDir::new()?;
    let extensions = temp.path().join("Geyser-Spigot").join("extensions");
    let data = extensions.join("GeyserModelEnginePackGenerator");
    std::fs::create_dir_all(data.join("input"))?;
    std::fs::write(data.join("old_pack.zip"), "stale")?;

    let list =
        "https://api.github.com/repos/xSquishyLiam/mc-GeyserModelEngine-PackGenerator/releases";
    let jar = "https://github.com/xSquishyLiam/mc-GeyserModelEngine-PackGenerator/releases/download/1.2/GeyserModelEnginePackGenerator-1.2.jar";
    let http = FakeHttp::new()
        .with_json(
            list,
            json!([
                { "tag_name": "1.3-pre", "assets": [] },
                { "tag_name": "1.2", "assets": [ { "browser_download_url": jar } ] }
            ]),
        )
        .with_bytes(jar, jar_bytes("PackGenerator"));
    let engine = engine_with(&[Project::GeyserModelEnginePackGenerator], http);

    let outcomes = engine.check_and_update(Platform::Spigot, temp.path()).await;
    assert!(outcomes[0].updated(), "{outcomes:?}");
    assert!(data.join(CLEANUP_MARKER).exists());
    // Nothing is deleted until the next startup.
    assert!(data.join("old_pack.zip").exists());

    let report = engine.execute_cleanup_if_pending(Platform::Spigot, temp.path()).expect("pending");
    assert_eq!(report.removed, [data.join("old_pack.zip")]);
    assert_eq!(names_in(&data), ["input"]);
    assert_eq!(
        names_in(&extensions),
        ["GeyserModelEnginePackGenerator", "GeyserModelEnginePackGenerator-1.2.jar"]
    );
    Ok(())
}
