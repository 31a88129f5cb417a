//! Full update runs against canned upstreams.

use addonsync::catalog::{Channel, Platform, Project};
use addonsync::constants::{LUCKPERMS_METADATA_FEED, TEMP_FILE_SUFFIX};
use addonsync::engine::UpdateEngine;
use addonsync::source::direct;
use addonsync::test_utils::{FakeHttp, jar_bytes};
use anyhow::Result;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

use super::common::{config_with, engine_with, names_in};

const LP_BUKKIT: &str =
    "https://download.luckperms.net/1556/bukkit/loader/LuckPerms-Bukkit-5.4.141.jar";
const VIA_LATEST: &str = "https://api.github.com/repos/ViaVersion/ViaVersion/releases/latest";
const VIA_JAR: &str =
    "https://github.com/ViaVersion/ViaVersion/releases/download/5.2.0/ViaVersion-5.2.0.jar";
const VIA_SOURCES: &str =
    "https://github.com/ViaVersion/ViaVersion/releases/download/5.2.0/ViaVersion-5.2.0-sources.jar";

fn upstream() -> FakeHttp {
    FakeHttp::new()
        .with_json(
            LUCKPERMS_METADATA_FEED,
            json!({
                "version": "5.4.141",
                "downloads": {
                    "bukkit": LP_BUKKIT,
                    "velocity": "https://download.luckperms.net/1556/velocity/LuckPerms-Velocity-5.4.141.jar"
                }
            }),
        )
        .with_bytes(LP_BUKKIT, jar_bytes("LuckPerms"))
        .with_json(
            VIA_LATEST,
            json!({
                "tag_name": "5.2.0",
                "assets": [
                    { "browser_download_url": VIA_SOURCES },
                    { "browser_download_url": VIA_JAR }
                ]
            }),
        )
        .with_bytes(VIA_JAR, jar_bytes("ViaVersion"))
        .with_bytes(VIA_SOURCES, b"sources".to_vec())
        .with_bytes(&direct::download_url("geyser", Platform::Spigot), jar_bytes("Geyser"))
}

#[tokio::test]
async fn test_disabled_projects_are_absent() -> Result<()> {
    let temp = TempDir::new()?;
    let http = upstream();
    let engine = engine_with(&[Project::LuckPerms], http.clone());

    let outcomes = engine.check_and_update(Platform::Spigot, temp.path()).await;
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].project, Project::LuckPerms);

    let infos = engine.check_versions(Platform::Spigot, temp.path()).await;
    for info in infos.iter().filter(|i| i.project != Project::LuckPerms) {
        assert!(!info.enabled(), "{:?}", info.project);
        assert!(info.installed().is_none());
        assert!(info.latest().is_none());
    }

    // Nothing was requested for disabled projects.
    assert!(http.requests().iter().all(|url| url.contains("luckperms")));
    Ok(())
}

#[tokio::test]
async fn test_second_run_is_a_no_op() -> Result<()> {
    let temp = TempDir::new()?;
    let projects = [Project::Geyser, Project::LuckPerms, Project::ViaVersion];
    let engine = engine_with(&projects, upstream());

    let first = engine.check_and_update(Platform::Spigot, temp.path()).await;
    assert!(first.iter().all(|o| o.updated()), "{first:?}");

    let second = engine.check_and_update(Platform::Spigot, temp.path()).await;
    for outcome in &second {
        match outcome.project {
            // Upstream serves one file name for every build.
            Project::Geyser => assert!(outcome.updated()),
            _ => assert!(outcome.skipped_no_change(), "{outcome:?}"),
        }
    }

    assert_eq!(
        names_in(temp.path()),
        ["Geyser-Spigot.jar", "LuckPerms-Bukkit-5.4.141.jar", "ViaVersion-5.2.0.jar"]
    );
    Ok(())
}

#[tokio::test]
async fn test_sources_decoy_is_never_downloaded() -> Result<()> {
    let temp = TempDir::new()?;
    let http = upstream();
    let engine = engine_with(&[Project::ViaVersion], http.clone());

    let outcomes = engine.check_and_update(Platform::Velocity, temp.path()).await;
    assert!(outcomes[0].updated());
    assert_eq!(outcomes[0].file_name(), Some("ViaVersion-5.2.0.jar"));
    assert_eq!(http.downloads(), [VIA_JAR]);
    Ok(())
}

#[tokio::test]
async fn test_upstream_rename_replaces_old_file() -> Result<()> {
    let temp = TempDir::new()?;
    std::fs::write(temp.path().join("ViaVersion-5.1.1.jar"), "old")?;
    std::fs::write(temp.path().join("server.properties"), "motd=hi")?;

    let engine = engine_with(&[Project::ViaVersion], upstream());
    let outcomes = engine.check_and_update(Platform::Spigot, temp.path()).await;

    assert!(outcomes[0].updated());
    assert_eq!(names_in(temp.path()), ["ViaVersion-5.2.0.jar", "server.properties"]);
    Ok(())
}

#[tokio::test]
async fn test_every_stale_copy_is_removed() -> Result<()> {
    let temp = TempDir::new()?;
    std::fs::write(temp.path().join("ViaVersion-5.0.0.jar"), "older")?;
    std::fs::write(temp.path().join("ViaVersion-5.1.0.jar"), "old")?;

    let engine = engine_with(&[Project::ViaVersion], upstream());
    let first = engine.check_and_update(Platform::Spigot, temp.path()).await;
    assert!(first[0].updated(), "{first:?}");
    assert_eq!(names_in(temp.path()), ["ViaVersion-5.2.0.jar"]);

    let second = engine.check_and_update(Platform::Spigot, temp.path()).await;
    assert!(second[0].skipped_no_change(), "{second:?}");
    assert_eq!(names_in(temp.path()), ["ViaVersion-5.2.0.jar"]);
    Ok(())
}

#[tokio::test]
async fn test_current_copy_kept_and_stale_copy_removed() -> Result<()> {
    let temp = TempDir::new()?;
    std::fs::write(temp.path().join("ViaVersion-5.1.0.jar"), "old")?;
    std::fs::write(temp.path().join("ViaVersion-5.2.0.jar"), "current")?;

    let engine = engine_with(&[Project::ViaVersion], upstream());
    let outcomes = engine.check_and_update(Platform::Spigot, temp.path()).await;

    assert!(outcomes[0].skipped_no_change(), "{outcomes:?}");
    assert_eq!(names_in(temp.path()), ["ViaVersion-5.2.0.jar"]);
    assert_eq!(std::fs::read_to_string(temp.path().join("ViaVersion-5.2.0.jar"))?, "current");
    Ok(())
}

#[tokio::test]
async fn test_development_channel_uses_ci_builds() -> Result<()> {
    let temp = TempDir::new()?;
    let build = "https://ci.viaversion.com/job/ViaVersion/lastSuccessfulBuild/api/json";
    let jar = "https://ci.viaversion.com/job/ViaVersion/lastSuccessfulBuild/artifact/build/libs/\
               ViaVersion-5.3.0-SNAPSHOT.jar";
    let http = FakeHttp::new()
        .with_json(
            build,
            json!({
                "number": 1200,
                "artifacts": [
                    { "fileName": "ViaVersion-5.3.0-SNAPSHOT.jar", "relativePath": "build/libs/ViaVersion-5.3.0-SNAPSHOT.jar" }
                ]
            }),
        )
        .with_bytes(jar, jar_bytes("ViaVersion"));

    let mut config = config_with(&[Project::ViaVersion]);
    config.channels.viaversion = Channel::Development;
    let engine = UpdateEngine::with_client(Arc::new(config), http.clone());

    let outcomes = engine.check_and_update(Platform::Spigot, temp.path()).await;
    assert!(outcomes[0].updated(), "{outcomes:?}");
    assert_eq!(http.requests(), [build, jar]);
    assert_eq!(names_in(temp.path()), ["ViaVersion-5.3.0-SNAPSHOT.jar"]);
    Ok(())
}

#[tokio::test]
async fn test_failures_leave_no_partial_files() -> Result<()> {
    let temp = TempDir::new()?;
    std::fs::write(temp.path().join("LuckPerms-Bukkit-5.4.100.jar"), "installed")?;

    let http = FakeHttp::new()
        .with_json(
            LUCKPERMS_METADATA_FEED,
            json!({ "downloads": { "bukkit": LP_BUKKIT } }),
        )
        .with_status(LP_BUKKIT, 500)
        .with_json(
            VIA_LATEST,
            json!({ "assets": [ { "browser_download_url": VIA_JAR } ] }),
        )
        .with_bytes(VIA_JAR, b"truncated".to_vec());

    let engine = engine_with(&[Project::LuckPerms, Project::ViaVersion], http);
    let outcomes = engine.check_and_update(Platform::Spigot, temp.path()).await;

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| !o.error().unwrap_or_default().is_empty()));

    // The old artifact survives and no temporary file is left behind.
    let names = names_in(temp.path());
    assert_eq!(names, ["LuckPerms-Bukkit-5.4.100.jar"]);
    assert!(names.iter().all(|n| !n.ends_with(TEMP_FILE_SUFFIX)));
    let kept = std::fs::read_to_string(temp.path().join("LuckPerms-Bukkit-5.4.100.jar"))?;
    assert_eq!(kept, "installed");
    Ok(())
}

#[tokio::test]
async fn test_installed_file_is_complete() -> Result<()> {
    let temp = TempDir::new()?;
    let engine = engine_with(&[Project::LuckPerms], upstream());

    engine.check_and_update(Platform::Spigot, temp.path()).await;

    let installed = std::fs::read(temp.path().join("LuckPerms-Bukkit-5.4.141.jar"))?;
    assert_eq!(installed, jar_bytes("LuckPerms"));
    Ok(())
}

#[tokio::test]
async fn test_status_reports_update_without_installing() -> Result<()> {
    let temp = TempDir::new()?;
    std::fs::write(temp.path().join("ViaVersion-5.1.1.jar"), "old")?;
    let http = upstream();
    let engine = engine_with(&[Project::ViaVersion], http.clone());

    let infos = engine.check_versions(Platform::Spigot, temp.path()).await;
    let via = infos.iter().find(|i| i.project == Project::ViaVersion).unwrap();
    assert_eq!(via.installed(), Some("ViaVersion-5.1.1.jar"));
    assert_eq!(via.latest(), Some("ViaVersion-5.2.0.jar"));
    assert_eq!(via.version(), Some("5.2.0"));
    assert!(via.update_available());

    assert!(http.downloads().is_empty());
    assert_eq!(names_in(temp.path()), ["ViaVersion-5.1.1.jar"]);
    Ok(())
}
