//! Test utilities for addonsync
//!
//! Helpers shared by unit tests and the integration suite (enabled there via
//! the `test-utils` feature):
//! - [`init_test_logging`] to see engine logs in test output
//! - [`FakeHttp`], an [`HttpClient`] serving canned responses and recording
//!   every request
//! - [`jar_bytes`], a minimal valid jar for download fixtures
//!
//! # Example
//!
//! ```rust,no_run
//! use addonsync::test_utils::{FakeHttp, jar_bytes};
//!
//! let http = FakeHttp::new()
//!     .with_text("https://example.org/feed", r#"{"downloads": {}}"#)
//!     .with_bytes("https://example.org/Plugin.jar", jar_bytes("Plugin"));
//! ```

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, Once};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use zip::write::SimpleFileOptions;

use crate::core::{UpdateError, UpdateResult};
use crate::http::HttpClient;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, else `RUST_LOG`;
/// with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=addonsync=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

#[derive(Debug, Clone)]
enum Canned {
    Body(Vec<u8>),
    Status(u16),
}

#[derive(Debug, Default)]
struct FakeState {
    responses: HashMap<String, Canned>,
    requests: Vec<String>,
    downloads: Vec<String>,
}

/// In-memory [`HttpClient`].
///
/// URLs without a canned response answer HTTP 404. Clones share state, so a
/// test can keep a handle to inspect the request log after handing the client
/// to an engine.
#[derive(Debug, Clone, Default)]
pub struct FakeHttp {
    state: Arc<Mutex<FakeState>>,
}

impl FakeHttp {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_text(self, url: &str, body: &str) -> Self {
        self.respond(url, Canned::Body(body.as_bytes().to_vec()))
    }

    #[must_use]
    pub fn with_json(self, url: &str, body: serde_json::Value) -> Self {
        self.respond(url, Canned::Body(body.to_string().into_bytes()))
    }

    #[must_use]
    pub fn with_bytes(self, url: &str, body: Vec<u8>) -> Self {
        self.respond(url, Canned::Body(body))
    }

    #[must_use]
    pub fn with_status(self, url: &str, status: u16) -> Self {
        self.respond(url, Canned::Status(status))
    }

    /// Every URL fetched or downloaded, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    /// URLs passed to [`HttpClient::download`], in order.
    #[must_use]
    pub fn downloads(&self) -> Vec<String> {
        self.lock().downloads.clone()
    }

    fn respond(self, url: &str, canned: Canned) -> Self {
        self.lock().responses.insert(url.to_string(), canned);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn answer(&self, url: &str, download: bool) -> UpdateResult<Vec<u8>> {
        let canned = {
            let mut state = self.lock();
            state.requests.push(url.to_string());
            if download {
                state.downloads.push(url.to_string());
            }
            state.responses.get(url).cloned()
        };

        match canned {
            Some(Canned::Body(body)) => Ok(body),
            Some(Canned::Status(status)) => Err(UpdateError::HttpStatus {
                url: url.to_string(),
                status,
            }),
            None => Err(UpdateError::HttpStatus {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

impl HttpClient for FakeHttp {
    async fn fetch_text(&self, url: &str) -> UpdateResult<String> {
        let body = self.answer(url, false)?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    async fn download(&self, url: &str, dest: &Path) -> UpdateResult<u64> {
        let body = self.answer(url, true)?;
        tokio::fs::write(dest, &body)
            .await
            .map_err(|e| UpdateError::fs("write download file", dest, e))?;
        Ok(body.len() as u64)
    }
}

/// A small but valid jar: a manifest plus a `plugin.yml` naming `name`.
///
/// # Panics
///
/// Never for in-memory writers; panics only if the zip writer itself fails.
#[must_use]
pub fn jar_bytes(name: &str) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    // Fixed timestamp so equal names give byte-identical jars.
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored)
        .last_modified_time(zip::DateTime::default());

    writer.start_file("META-INF/MANIFEST.MF", options).unwrap();
    writer.write_all(b"Manifest-Version: 1.0\r\n\r\n").unwrap();
    writer.start_file("plugin.yml", options).unwrap();
    writer
        .write_all(format!("name: {name}\nversion: test\nmain: test.{name}\n").as_bytes())
        .unwrap();

    writer.finish().unwrap().into_inner()
}
