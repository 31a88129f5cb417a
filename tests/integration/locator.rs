//! Choosing the installed artifact when several files match a project.

use addonsync::catalog::{Platform, Project};
use addonsync::installer::find_existing;
use anyhow::Result;
use tempfile::TempDir;

fn found(project: Project, platform: Platform, temp: &TempDir) -> Option<String> {
    find_existing(project, platform, temp.path())
        .unwrap()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
}

#[test]
fn test_platform_suffix_wins_tie_break() -> Result<()> {
    let temp = TempDir::new()?;
    std::fs::write(temp.path().join("Floodgate.jar"), "")?;
    std::fs::write(temp.path().join("Floodgate-spigot.jar"), "")?;
    // Sorts ahead of the platform-specific file.
    std::fs::write(temp.path().join("Floodgate-1.0.jar"), "")?;

    assert_eq!(
        found(Project::Floodgate, Platform::Spigot, &temp).as_deref(),
        Some("Floodgate-spigot.jar")
    );
    Ok(())
}

#[test]
fn test_own_platform_beats_other_platform() -> Result<()> {
    let temp = TempDir::new()?;
    std::fs::write(temp.path().join("floodgate-bungee.jar"), "")?;
    std::fs::write(temp.path().join("floodgate-velocity.jar"), "")?;

    assert_eq!(
        found(Project::Floodgate, Platform::Velocity, &temp).as_deref(),
        Some("floodgate-velocity.jar")
    );
    assert_eq!(
        found(Project::Floodgate, Platform::BungeeCord, &temp).as_deref(),
        Some("floodgate-bungee.jar")
    );
    Ok(())
}

#[test]
fn test_nothing_installed() -> Result<()> {
    let temp = TempDir::new()?;
    std::fs::write(temp.path().join("Geyser-Spigot.jar"), "")?;

    assert_eq!(found(Project::LuckPerms, Platform::Spigot, &temp), None);
    Ok(())
}
