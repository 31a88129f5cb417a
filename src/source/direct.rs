//! Direct-path resolver for the GeyserMC download API.
//!
//! The URL of the latest build is fully determined by project and platform,
//! so resolution needs no network round-trip. The API serves the same file
//! name for every build; the local name comes from [`synthesized_file_name`].

use crate::catalog::{Platform, Project};
use crate::constants::GEYSER_DOWNLOAD_API;
use crate::core::{UpdateError, UpdateResult};

use super::ResolvedArtifact;

/// URL of the latest build of `api_project` for `platform`.
#[must_use]
pub fn download_url(api_project: &str, platform: Platform) -> String {
    format!(
        "{GEYSER_DOWNLOAD_API}/{api_project}/versions/latest/builds/latest/downloads/{}",
        platform.api_name()
    )
}

/// Conventional installed file name for the direct-path family.
#[must_use]
pub const fn synthesized_file_name(project: Project, platform: Platform) -> Option<&'static str> {
    match (project, platform) {
        (Project::Geyser, Platform::Spigot) => Some("Geyser-Spigot.jar"),
        (Project::Geyser, Platform::Velocity) => Some("Geyser-Velocity.jar"),
        (Project::Geyser, Platform::BungeeCord) => Some("Geyser-BungeeCord.jar"),
        (Project::Floodgate, Platform::Spigot) => Some("floodgate-spigot.jar"),
        (Project::Floodgate, Platform::Velocity) => Some("floodgate-velocity.jar"),
        (Project::Floodgate, Platform::BungeeCord) => Some("floodgate-bungee.jar"),
        _ => None,
    }
}

pub fn resolve(
    api_project: &str,
    project: Project,
    platform: Platform,
) -> UpdateResult<ResolvedArtifact> {
    let file_name = synthesized_file_name(project, platform).ok_or(
        UpdateError::UnsupportedPlatform {
            project,
            platform,
        },
    )?;

    Ok(ResolvedArtifact {
        download_url: download_url(api_project, platform),
        file_name: file_name.to_string(),
        version: None,
        build: None,
    })
}
