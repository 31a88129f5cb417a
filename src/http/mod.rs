//! HTTP access for resolvers and the installer.
//!
//! Everything that touches the network goes through the [`HttpClient`] trait
//! so the engine can be driven by canned responses in tests. The production
//! implementation, [`ReqwestClient`], adds the fixed user agent, per-request
//! timeouts and the optional GitHub bearer token.

use futures::StreamExt;
use percent_encoding::percent_decode_str;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::config::NetworkConfig;
use crate::constants::{GITHUB_API_HOST, USER_AGENT};
use crate::core::{UpdateError, UpdateResult};

/// Minimal HTTP surface the engine depends on.
pub trait HttpClient: Send + Sync {
    /// GET `url` and return the body as text. Non-2xx is an error.
    fn fetch_text(&self, url: &str) -> impl Future<Output = UpdateResult<String>> + Send;

    /// GET `url` and stream the body into `dest`, returning the byte count.
    ///
    /// `dest` already exists (it is the installer's temporary file) and is
    /// truncated before writing.
    fn download(&self, url: &str, dest: &Path) -> impl Future<Output = UpdateResult<u64>> + Send;
}

/// [`HttpClient`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
    github_token: Option<String>,
    metadata_timeout: Duration,
    download_timeout: Duration,
}

impl ReqwestClient {
    pub fn new(network: &NetworkConfig) -> anyhow::Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            github_token: network.github_token(),
            metadata_timeout: network.metadata_timeout(),
            download_timeout: network.download_timeout(),
        })
    }

    fn get(&self, url: &str, timeout: Duration) -> reqwest::RequestBuilder {
        let mut request = self.client.get(url).timeout(timeout);

        if is_github_api(url) {
            let mut headers = HeaderMap::new();
            headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
            request = request.headers(headers);
            if let Some(token) = &self.github_token {
                request = request.bearer_auth(token);
            }
        }

        request
    }

    async fn send(&self, url: &str, timeout: Duration) -> UpdateResult<reqwest::Response> {
        let response = self.get(url, timeout).send().await.map_err(|e| network_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpdateError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

impl HttpClient for ReqwestClient {
    async fn fetch_text(&self, url: &str) -> UpdateResult<String> {
        debug!("Fetching {}", url);
        let response = self.send(url, self.metadata_timeout).await?;
        response.text().await.map_err(|e| network_error(url, &e))
    }

    async fn download(&self, url: &str, dest: &Path) -> UpdateResult<u64> {
        debug!("Downloading {} -> {}", url, dest.display());
        let response = self.send(url, self.download_timeout).await?;

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| UpdateError::fs("open download file", dest, e))?;

        let mut written = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| network_error(url, &e))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| UpdateError::fs("write download file", dest, e))?;
            written += chunk.len() as u64;
        }

        file.flush().await.map_err(|e| UpdateError::fs("flush download file", dest, e))?;
        file.sync_all().await.map_err(|e| UpdateError::fs("sync download file", dest, e))?;

        debug!("Downloaded {} bytes from {}", written, url);
        Ok(written)
    }
}

fn network_error(url: &str, error: &reqwest::Error) -> UpdateError {
    let reason = if error.is_timeout() {
        "request timed out".to_string()
    } else {
        error.to_string()
    };
    UpdateError::Network {
        url: url.to_string(),
        reason,
    }
}

/// Whether `url` points at the GitHub REST API.
#[must_use]
pub fn is_github_api(url: &str) -> bool {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(|host| host.eq_ignore_ascii_case(GITHUB_API_HOST)))
        .unwrap_or(false)
}

/// Last path segment of `url`, percent-decoded, without query or fragment.
///
/// Decoding can yield `/` or `..`; the installer rejects such names before
/// writing anything.
#[must_use]
pub fn file_name_from_url(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.next_back()?;
    if segment.is_empty() {
        return None;
    }
    let decoded = percent_decode_str(segment).decode_utf8().ok()?;
    Some(decoded.into_owned())
}
