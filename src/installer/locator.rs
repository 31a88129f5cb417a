//! Finds the artifact of a project already present in a directory.

use std::path::{Path, PathBuf};

use crate::catalog::{Platform, Project};
use crate::constants::{ARTIFACT_EXTENSION, PLATFORM_TOKENS};
use crate::core::{UpdateError, UpdateResult};
use crate::utils::list_dir_sorted;

/// Every installed artifact of `project` in `directory`, in name order.
///
/// Only immediate children are considered: regular files ending in `.jar`
/// whose lowercase name contains the project's file hint. A missing directory
/// means nothing is installed.
///
/// # Errors
///
/// Any listing failure other than the directory not existing.
pub fn find_all_existing(project: Project, directory: &Path) -> UpdateResult<Vec<PathBuf>> {
    let Some(children) = list_dir_sorted(directory)
        .map_err(|e| UpdateError::fs("list install directory", directory, e))?
    else {
        return Ok(Vec::new());
    };

    let hint = project.file_hint();
    let candidates: Vec<PathBuf> = children
        .into_iter()
        .filter(|path| path.is_file())
        .filter(|path| {
            lowercase_name(path)
                .is_some_and(|name| name.ends_with(ARTIFACT_EXTENSION) && name.contains(hint))
        })
        .collect();

    if candidates.len() > 1 {
        tracing::debug!(
            "{} candidates for {} in {}",
            candidates.len(),
            project,
            directory.display()
        );
    }

    Ok(candidates)
}

/// The installed artifact of `project` in `directory`, if any.
///
/// See [`preferred`] for how one file is picked among several.
///
/// # Errors
///
/// Any listing failure other than the directory not existing.
pub fn find_existing(
    project: Project,
    platform: Platform,
    directory: &Path,
) -> UpdateResult<Option<PathBuf>> {
    let candidates = find_all_existing(project, directory)?;
    Ok(preferred(platform, &candidates).map(Path::to_path_buf))
}

/// Tie-break among candidates listed in name order.
///
/// The first carrying a token of `platform` wins, then the first carrying any
/// known platform token, then simply the first.
pub fn preferred(platform: Platform, candidates: &[PathBuf]) -> Option<&Path> {
    let has_any = |path: &PathBuf, tokens: &[&str]| {
        lowercase_name(path).is_some_and(|name| tokens.iter().any(|token| name.contains(token)))
    };

    candidates
        .iter()
        .find(|path| has_any(path, platform.file_tokens()))
        .or_else(|| candidates.iter().find(|path| has_any(path, PLATFORM_TOKENS)))
        .or_else(|| candidates.first())
        .map(PathBuf::as_path)
}

fn lowercase_name(path: &Path) -> Option<String> {
    Some(path.file_name()?.to_string_lossy().to_ascii_lowercase())
}
