//! Tagged-release resolver for GitHub-hosted add-ons.
//!
//! Two document shapes are handled:
//! - `releases/latest`: a single release object
//! - `releases`: an array of release objects, newest first
//!
//! Assets are scanned in document order (releases in order, then their assets
//! in order) over `browser_download_url`, and the first one accepted by the
//! [`AssetFilter`] wins.

use serde_json::Value;

use crate::catalog::Project;
use crate::constants::GITHUB_API;
use crate::core::{UpdateError, UpdateResult};
use crate::http::{HttpClient, file_name_from_url};

use super::matcher::AssetFilter;
use super::{ResolvedArtifact, fetch_json};

/// Which GitHub endpoint a project is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseScope {
    /// `GET /repos/{repo}/releases/latest`.
    Latest,
    /// `GET /repos/{repo}/releases`, for repositories whose latest release
    /// does not always carry the jar.
    List,
}

impl ReleaseScope {
    #[must_use]
    pub fn api_url(self, repo: &str) -> String {
        match self {
            Self::Latest => format!("{GITHUB_API}/repos/{repo}/releases/latest"),
            Self::List => format!("{GITHUB_API}/repos/{repo}/releases"),
        }
    }
}

pub async fn resolve<C: HttpClient>(
    client: &C,
    project: Project,
    repo: &str,
    scope: ReleaseScope,
    filter: &AssetFilter,
) -> UpdateResult<ResolvedArtifact> {
    let url = scope.api_url(repo);
    let document = fetch_json(client, &url).await?;
    select(&document, &url, project, filter)
}

pub fn select(
    document: &Value,
    url: &str,
    project: Project,
    filter: &AssetFilter,
) -> UpdateResult<ResolvedArtifact> {
    let releases: Vec<&Value> = match document {
        Value::Array(items) => items.iter().collect(),
        single => vec![single],
    };

    for release in releases {
        let assets = release.get("assets").and_then(Value::as_array).ok_or_else(|| {
            UpdateError::MissingField {
                field: "assets".to_string(),
                url: url.to_string(),
            }
        })?;

        let candidates = assets
            .iter()
            .filter_map(|asset| asset.get("browser_download_url").and_then(Value::as_str));

        if let Some(download_url) = filter.first_match(candidates) {
            let file_name =
                file_name_from_url(download_url).ok_or_else(|| UpdateError::MissingField {
                    field: "file name in browser_download_url".to_string(),
                    url: url.to_string(),
                })?;

            return Ok(ResolvedArtifact {
                download_url: download_url.to_string(),
                file_name,
                version: release.get("tag_name").and_then(Value::as_str).map(str::to_string),
                build: None,
            });
        }
    }

    Err(UpdateError::NoMatchingAsset {
        project,
        criteria: filter.describe(),
        url: url.to_string(),
    })
}
