//! Metadata-feed resolver (LuckPerms).
//!
//! The feed is a single JSON document whose `downloads` object maps the feed's
//! own platform keys (`bukkit`, `velocity`, `bungee`) to absolute URLs:
//!
//! ```json
//! {
//!   "version": "5.4.141",
//!   "downloads": {
//!     "bukkit": "https://download.luckperms.net/1556/bukkit/loader/LuckPerms-Bukkit-5.4.141.jar",
//!     "velocity": "https://download.luckperms.net/1556/velocity/LuckPerms-Velocity-5.4.141.jar"
//!   }
//! }
//! ```

use serde_json::Value;

use crate::catalog::Platform;
use crate::core::{UpdateError, UpdateResult};
use crate::http::{HttpClient, file_name_from_url};

use super::{ResolvedArtifact, fetch_json};

pub async fn resolve<C: HttpClient>(
    client: &C,
    feed_url: &str,
    platform: Platform,
) -> UpdateResult<ResolvedArtifact> {
    let document = fetch_json(client, feed_url).await?;
    select(&document, feed_url, platform)
}

/// Pick the download for `platform` out of an already parsed feed.
pub fn select(
    document: &Value,
    feed_url: &str,
    platform: Platform,
) -> UpdateResult<ResolvedArtifact> {
    let downloads = document.get("downloads").and_then(Value::as_object).ok_or_else(|| {
        UpdateError::MissingField {
            field: "downloads".to_string(),
            url: feed_url.to_string(),
        }
    })?;

    let key = platform.feed_key();
    let download_url = downloads.get(key).and_then(Value::as_str).ok_or_else(|| {
        UpdateError::PlatformNotFound {
            key: key.to_string(),
            url: feed_url.to_string(),
        }
    })?;

    let file_name = file_name_from_url(download_url).ok_or_else(|| UpdateError::MissingField {
        field: format!("file name in downloads.{key}"),
        url: feed_url.to_string(),
    })?;

    Ok(ResolvedArtifact {
        download_url: download_url.to_string(),
        file_name,
        version: document.get("version").and_then(Value::as_str).map(str::to_string),
        build: None,
    })
}
