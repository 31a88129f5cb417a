//! Download and atomic installation of a single project.
//!
//! # Sequence
//!
//! 1. Work out the target directory. Standalone add-ons share the install
//!    directory; Geyser extensions live in `<Geyser data folder>/extensions`,
//!    which is created on demand but only when the Geyser data folder exists.
//! 2. Find the installed artifacts ([`locator::find_all_existing`]).
//! 3. Resolve the latest artifact through the source registry.
//! 4. Stream it into a uniquely named temporary file *inside the target
//!    directory*, so the final rename never crosses a file system.
//! 5. Optionally check that the download opens as a jar (zip) archive.
//! 6. An installed file already carries the upstream name: discard the
//!    download, report [`UpdateStatus::Unchanged`]. Static-filename projects
//!    skip this check because their upstream reuses one name for every build.
//! 7. Otherwise rename the temporary file into place:
//!    [`UpdateStatus::Updated`].
//! 8. Either way, remove every other installed file of the project so at most
//!    one artifact remains.
//! 9. For the pack generator, schedule the deferred cleanup. Failing to do so
//!    is logged and does not change the outcome.
//!
//! Partial downloads only ever exist under the temporary name. The temporary
//! file is removed on every failure path because [`tempfile::NamedTempFile`]
//! deletes itself when dropped.

pub mod locator;

pub use locator::{find_all_existing, find_existing};

use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::catalog::{Platform, Project};
use crate::cleanup;
use crate::config::UpdaterConfig;
use crate::constants::{TEMP_FILE_PREFIX, TEMP_FILE_SUFFIX};
use crate::core::{UpdateError, UpdateResult};
use crate::http::HttpClient;
use crate::models::{UpdateOutcome, UpdateStatus};
use crate::source::{ResolvedArtifact, resolve_latest};
use crate::utils::ensure_dir;
use crate::version::same_file_name;

/// Where the artifact of `project` lives for `platform`.
///
/// Does not touch the file system beyond checking that the parent add-on of an
/// extension is installed.
///
/// # Errors
///
/// [`UpdateError::ParentNotInstalled`] for an extension whose parent data
/// folder is missing.
pub fn target_dir(
    project: Project,
    platform: Platform,
    install_dir: &Path,
) -> UpdateResult<PathBuf> {
    let Some(parent) = project.parent() else {
        return Ok(install_dir.to_path_buf());
    };

    let parent_folder = install_dir.join(platform.geyser_data_folder());
    if !parent_folder.is_dir() {
        return Err(UpdateError::ParentNotInstalled {
            project,
            parent,
            path: parent_folder,
        });
    }

    Ok(cleanup::extensions_dir(install_dir, platform))
}

/// Installs the latest build of one project, never failing the caller.
///
/// Every error is folded into an [`UpdateStatus::Failed`] outcome so callers
/// can carry on with the next project.
pub async fn install_latest<C: HttpClient>(
    client: &C,
    config: &UpdaterConfig,
    project: Project,
    platform: Platform,
    install_dir: &Path,
) -> UpdateOutcome {
    match try_install(client, config, project, platform, install_dir).await {
        Ok(status) => UpdateOutcome::new(project, status),
        Err(e) => {
            warn!("{} update failed: {:#}", project, e);
            UpdateOutcome::failed(project, format!("{e:#}"))
        }
    }
}

async fn try_install<C: HttpClient>(
    client: &C,
    config: &UpdaterConfig,
    project: Project,
    platform: Platform,
    install_dir: &Path,
) -> Result<UpdateStatus> {
    if !project.supports(platform) {
        return Err(UpdateError::UnsupportedPlatform {
            project,
            platform,
        }
        .into());
    }

    let dir = target_dir(project, platform, install_dir)?;
    ensure_dir(&dir)?;

    let installed = find_all_existing(project, &dir)?;
    let existing_name = locator::preferred(platform, &installed).and_then(file_name_of);

    let artifact = resolve_latest(client, project, platform, config.channel(project)).await?;
    check_file_name(&artifact)?;

    let temp = tempfile::Builder::new()
        .prefix(TEMP_FILE_PREFIX)
        .suffix(TEMP_FILE_SUFFIX)
        .tempfile_in(&dir)
        .map_err(|e| UpdateError::fs("create temporary file", &dir, e))?;

    let bytes = client.download(&artifact.download_url, temp.path()).await?;
    debug!("{}: downloaded {} bytes to {}", project, bytes, temp.path().display());

    if config.updates.verify_archives {
        verify_archive(temp.path(), &artifact.download_url)?;
    }

    if !project.capabilities().static_file_name {
        let current = installed
            .iter()
            .filter_map(|path| file_name_of(path))
            .find(|name| same_file_name(name, &artifact.file_name));
        if let Some(current) = current {
            info!("{} is up to date ({})", project, current);
            close_temp(temp);
            remove_stale(project, &installed, &current)?;
            return Ok(UpdateStatus::Unchanged {
                file_name: current,
            });
        }
    }

    let dest = dir.join(&artifact.file_name);
    temp.persist(&dest)
        .map_err(|e| UpdateError::fs("move artifact into place", &dest, e.error))?;
    remove_stale(project, &installed, &artifact.file_name)?;

    info!("{} updated to {}", project, artifact.file_name);

    if project.capabilities().cleanup_on_update && config.updates.cleanup_on_update {
        match cleanup::create_marker(config, install_dir, platform) {
            Ok(marker) => debug!("Cleanup marker written: {}", marker.display()),
            Err(UpdateError::MarkerExists {
                path,
            }) => debug!("Cleanup already pending: {}", path.display()),
            Err(e) => warn!("{} updated but cleanup could not be scheduled: {}", project, e),
        }
    }

    Ok(UpdateStatus::Updated {
        file_name: artifact.file_name,
        previous: existing_name,
    })
}

/// Removes every installed file of `project` except the one named `keep`.
///
/// Names equal to `keep` ignoring case are kept too: on case-insensitive file
/// systems they are the same file.
fn remove_stale(project: Project, installed: &[PathBuf], keep: &str) -> Result<()> {
    for path in installed {
        let Some(name) = file_name_of(path) else {
            continue;
        };
        if same_file_name(&name, keep) {
            continue;
        }
        std::fs::remove_file(path).map_err(|e| UpdateError::fs("remove stale artifact", path, e))?;
        debug!("{}: removed stale {}", project, name);
    }
    Ok(())
}

/// Rejects names that would escape the target directory.
fn check_file_name(artifact: &ResolvedArtifact) -> Result<()> {
    let name = artifact.file_name.as_str();
    let plain = Path::new(name).file_name().is_some_and(|n| n == name);
    if !plain || name.contains('\\') {
        anyhow::bail!(
            "Refusing to install '{}' from {}: not a plain file name",
            name,
            artifact.download_url
        );
    }
    Ok(())
}

fn verify_archive(path: &Path, url: &str) -> Result<()> {
    let file = File::open(path)
        .with_context(|| format!("Failed to reopen download: {}", path.display()))?;

    zip::ZipArchive::new(file).map_err(|e| UpdateError::CorruptArtifact {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

fn close_temp(temp: NamedTempFile) {
    let path = temp.path().to_path_buf();
    if let Err(e) = temp.close() {
        warn!("Failed to remove temporary file {}: {}", path.display(), e);
    }
}

fn file_name_of(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}
