//! Deferred cleanup of the pack generator's data folder.
//!
//! The pack generator rebuilds most of its folder from the user-supplied
//! `input/` subfolder on every version. Stale generated files must go after
//! an update, but not while a running server may still have the old version
//! loaded. The installer therefore only drops a zero-byte marker
//! (`.cleanup-pending`) into the folder; the sweep runs at the next cold start
//! before the host loads any add-on.
//!
//! Marker states: `absent -> present` (update or manual trigger)
//! `-> absent` (startup sweep). The sweep is idempotent.
//!
//! Folder layout:
//!
//! ```text
//! <install_dir>/<Geyser data folder>/extensions/
//! ├── GeyserModelEnginePackGenerator.jar
//! └── GeyserModelEnginePackGenerator/
//!     ├── .cleanup-pending      <- marker
//!     ├── input/                <- preserved
//!     ├── generated_pack.zip    <- removed by the sweep
//!     └── cache/                <- removed by the sweep
//! ```

use serde::Serialize;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::catalog::{Platform, Project};
use crate::config::UpdaterConfig;
use crate::constants::{ARTIFACT_EXTENSION, CLEANUP_MARKER, EXTENSIONS_DIR, PRESERVED_INPUT_DIR};
use crate::core::{UpdateError, UpdateResult};
use crate::utils::{list_dir_sorted, remove_path};

/// Folder names the pack generator is known to use, tried in order.
const KNOWN_FOLDER_NAMES: &[&str] = &[
    "GeyserModelEnginePackGenerator",
    "geysermodelenginepackgenerator",
    "GeyserModelEngine-PackGenerator",
    "PackGenerator",
];

/// What a sweep did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub folder: PathBuf,
    pub removed: Vec<PathBuf>,
    /// Children that could not be removed; the sweep carried on without them.
    pub failed: Vec<PathBuf>,
}

/// Directory holding Geyser extensions for `platform`.
#[must_use]
pub fn extensions_dir(install_dir: &Path, platform: Platform) -> PathBuf {
    install_dir.join(platform.geyser_data_folder()).join(EXTENSIONS_DIR)
}

/// The pack generator's data folder, if it exists.
///
/// Known names are tried first; otherwise the first directory (by name) whose
/// lowercase name contains both `modelengine` and `pack`.
#[must_use]
pub fn locate_addon_folder(install_dir: &Path, platform: Platform) -> Option<PathBuf> {
    let root = extensions_dir(install_dir, platform);

    let mut known = KNOWN_FOLDER_NAMES.iter().map(|name| root.join(name));
    if let Some(found) = known.find(|p| p.is_dir()) {
        return Some(found);
    }

    let children = match list_dir_sorted(&root) {
        Ok(children) => children?,
        Err(e) => {
            warn!("Cannot scan {}: {}", root.display(), e);
            return None;
        }
    };

    children.into_iter().find(|path| {
        path.is_dir()
            && path.file_name().is_some_and(|name| {
                let lower = name.to_string_lossy().to_ascii_lowercase();
                lower.contains("modelengine") && lower.contains("pack")
            })
    })
}

/// Writes the cleanup marker into the pack generator's folder.
///
/// # Errors
///
/// - [`UpdateError::CleanupDisabled`] when `updates.cleanup_on_update` is off
/// - [`UpdateError::AddonFolderNotFound`] when the folder cannot be located
/// - [`UpdateError::MarkerExists`] when a marker is already pending; the
///   existing marker is left untouched
pub fn create_marker(
    config: &UpdaterConfig,
    install_dir: &Path,
    platform: Platform,
) -> UpdateResult<PathBuf> {
    if !config.updates.cleanup_on_update {
        return Err(UpdateError::CleanupDisabled);
    }

    let folder = locate_addon_folder(install_dir, platform).ok_or_else(|| {
        UpdateError::AddonFolderNotFound {
            project: Project::GeyserModelEnginePackGenerator,
            searched: extensions_dir(install_dir, platform),
        }
    })?;

    let marker = folder.join(CLEANUP_MARKER);
    match OpenOptions::new().write(true).create_new(true).open(&marker) {
        Ok(_) => {
            info!("Cleanup scheduled for next startup: {}", marker.display());
            Ok(marker)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(UpdateError::MarkerExists {
            path: marker,
        }),
        Err(e) => Err(UpdateError::fs("create cleanup marker", marker, e)),
    }
}

/// Runs the pending sweep, if any.
///
/// Returns `None` when the folder or the marker is absent, which is the
/// normal case. Otherwise every immediate child except `input/`, the marker
/// and `*.jar` files is removed (directories recursively), then the marker
/// itself. A child that cannot be removed is logged and recorded in
/// [`CleanupReport::failed`].
pub fn execute_if_pending(install_dir: &Path, platform: Platform) -> Option<CleanupReport> {
    let folder = locate_addon_folder(install_dir, platform)?;
    let marker = folder.join(CLEANUP_MARKER);
    if !marker.is_file() {
        debug!("No cleanup pending in {}", folder.display());
        return None;
    }

    info!("Running pending cleanup in {}", folder.display());
    let mut report = CleanupReport {
        folder: folder.clone(),
        ..CleanupReport::default()
    };

    let children = match list_dir_sorted(&folder) {
        Ok(children) => children.unwrap_or_default(),
        Err(e) => {
            warn!("Cannot list {}: {}", folder.display(), e);
            Vec::new()
        }
    };

    for child in children.into_iter().filter(|child| !is_preserved(child)) {
        match remove_path(&child) {
            Ok(()) => {
                debug!("Removed {}", child.display());
                report.removed.push(child);
            }
            Err(e) => {
                warn!("Cleanup could not remove {}: {:#}", child.display(), e);
                report.failed.push(child);
            }
        }
    }

    if let Err(e) = std::fs::remove_file(&marker) {
        warn!("Failed to remove cleanup marker {}: {}", marker.display(), e);
    }

    info!(
        "Cleanup finished: {} removed, {} failed",
        report.removed.len(),
        report.failed.len()
    );
    Some(report)
}

fn is_preserved(path: &Path) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return true;
    };

    if name == CLEANUP_MARKER {
        return true;
    }
    if path.is_dir() {
        return name == PRESERVED_INPUT_DIR;
    }
    name.to_ascii_lowercase().ends_with(ARTIFACT_EXTENSION)
}
