//! The `addonsync` binary, run against temporary server directories.
//!
//! Every configuration used here disables all projects so no command reaches
//! the network.

use addonsync::constants::{CLEANUP_MARKER, INSTALL_LOCK_FILE};
use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const NOTHING_ENABLED: &str = "[projects]\ngeyser = false\nfloodgate = false\n";

fn write_config(temp: &TempDir, content: &str) -> Result<PathBuf> {
    let path = temp.path().join("addonsync.toml");
    std::fs::write(&path, content)?;
    Ok(path)
}

fn addonsync(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("addonsync").unwrap();
    cmd.env_remove("ADDONSYNC_CONFIG").env_remove("RUST_LOG").arg("--config").arg(config);
    cmd
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("addonsync")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("update"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("mark-cleanup"));
}

#[test]
fn test_update_with_nothing_enabled() -> Result<()> {
    let temp = TempDir::new()?;
    let config = write_config(&temp, NOTHING_ENABLED)?;
    let plugins = temp.path().join("plugins");

    addonsync(&config)
        .args(["update", "--platform", "paper", "--dir"])
        .arg(&plugins)
        .assert()
        .success()
        .stdout(predicate::str::contains("No add-ons are enabled"));

    // The install lock file is created alongside the plugins.
    assert!(plugins.join(INSTALL_LOCK_FILE).exists());
    Ok(())
}

#[test]
fn test_status_json() -> Result<()> {
    let temp = TempDir::new()?;
    let config = write_config(&temp, NOTHING_ENABLED)?;

    let output = addonsync(&config)
        .args(["status", "--platform", "velocity", "--json", "--dir"])
        .arg(temp.path())
        .output()?;
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["platform"], "velocity");
    let projects = report["projects"].as_array().unwrap();
    assert_eq!(projects.len(), addonsync::catalog::Project::ALL.len());
    assert!(projects.iter().all(|p| p["state"] == "disabled"));
    Ok(())
}

#[test]
fn test_mark_and_run_cleanup() -> Result<()> {
    let temp = TempDir::new()?;
    let config = write_config(&temp, NOTHING_ENABLED)?;
    let plugins = temp.path().join("plugins");
    let folder = plugins.join("Geyser-Spigot").join("extensions").join("PackGenerator");
    std::fs::create_dir_all(folder.join("input"))?;
    std::fs::write(folder.join("pack.zip"), "zip")?;

    addonsync(&config)
        .args(["mark-cleanup", "-p", "spigot", "-d"])
        .arg(&plugins)
        .assert()
        .success()
        .stdout(predicate::str::contains("Scheduled"));
    assert!(folder.join(CLEANUP_MARKER).exists());

    addonsync(&config)
        .args(["mark-cleanup", "-p", "spigot", "-d"])
        .arg(&plugins)
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped"));

    addonsync(&config)
        .args(["cleanup", "-p", "spigot", "-d"])
        .arg(&plugins)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 removed"));

    assert!(!folder.join("pack.zip").exists());
    assert!(!folder.join(CLEANUP_MARKER).exists());
    assert!(folder.join("input").is_dir());
    Ok(())
}

#[test]
fn test_cleanup_with_nothing_pending() -> Result<()> {
    let temp = TempDir::new()?;
    let config = write_config(&temp, NOTHING_ENABLED)?;

    addonsync(&config)
        .args(["cleanup", "-p", "bungeecord", "-d"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No cleanup pending"));
    Ok(())
}

#[test]
fn test_broken_config_is_reported() -> Result<()> {
    let temp = TempDir::new()?;
    let config = write_config(&temp, "[projects\ngeyser = ")?;

    addonsync(&config)
        .args(["status", "-p", "spigot", "-d"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("configuration"));
    Ok(())
}

#[test]
fn test_unknown_platform_is_rejected() {
    Command::cargo_bin("addonsync")
        .unwrap()
        .args(["status", "--platform", "fabric", "--dir", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown platform"));
}
