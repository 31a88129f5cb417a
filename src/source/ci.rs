//! CI-build resolver for Jenkins "last successful build" endpoints.
//!
//! `GET {job}lastSuccessfulBuild/api/json` returns the build `number` and an
//! `artifacts` list of `{fileName, relativePath}` entries. The first artifact
//! whose `fileName` passes the filter is downloaded from
//! `{job}lastSuccessfulBuild/artifact/{relativePath}`.

use serde_json::Value;

use crate::catalog::Project;
use crate::core::{UpdateError, UpdateResult};
use crate::http::HttpClient;

use super::matcher::AssetFilter;
use super::{ResolvedArtifact, fetch_json};

#[must_use]
pub fn build_api_url(job_url: &str) -> String {
    format!("{}/lastSuccessfulBuild/api/json", job_url.trim_end_matches('/'))
}

#[must_use]
pub fn artifact_url(job_url: &str, relative_path: &str) -> String {
    format!(
        "{}/lastSuccessfulBuild/artifact/{}",
        job_url.trim_end_matches('/'),
        relative_path.trim_start_matches('/')
    )
}

pub async fn resolve<C: HttpClient>(
    client: &C,
    project: Project,
    job_url: &str,
    filter: &AssetFilter,
) -> UpdateResult<ResolvedArtifact> {
    let url = build_api_url(job_url);
    let document = fetch_json(client, &url).await?;
    select(&document, &url, job_url, project, filter)
}

pub fn select(
    document: &Value,
    url: &str,
    job_url: &str,
    project: Project,
    filter: &AssetFilter,
) -> UpdateResult<ResolvedArtifact> {
    let artifacts = document.get("artifacts").and_then(Value::as_array).ok_or_else(|| {
        UpdateError::MissingField {
            field: "artifacts".to_string(),
            url: url.to_string(),
        }
    })?;

    let artifact = artifacts
        .iter()
        .find(|artifact| {
            artifact
                .get("fileName")
                .and_then(Value::as_str)
                .is_some_and(|name| filter.matches(name))
        })
        .ok_or_else(|| UpdateError::NoMatchingAsset {
            project,
            criteria: filter.describe(),
            url: url.to_string(),
        })?;

    // `find` only accepted artifacts with a string fileName.
    let file_name = artifact.get("fileName").and_then(Value::as_str).unwrap_or_default();
    let relative_path = artifact.get("relativePath").and_then(Value::as_str).unwrap_or(file_name);
    let build = document.get("number").and_then(Value::as_u64);

    Ok(ResolvedArtifact {
        download_url: artifact_url(job_url, relative_path),
        file_name: file_name.to_string(),
        version: build.map(|number| format!("#{number}")),
        build,
    })
}
