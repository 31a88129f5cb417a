//! addonsync - keep Geyser-ecosystem server add-ons up to date
//!
//! addonsync resolves the latest build of a fixed catalog of add-ons (Geyser,
//! Floodgate, LuckPerms, PacketEvents, ViaVersion, ViaBackwards and several
//! Geyser extensions) for a Spigot, Velocity or BungeeCord server, compares it
//! with what is installed and atomically swaps in new artifacts.
//!
//! # Architecture
//!
//! - [`catalog`]: closed enums for projects and platforms with capability tables
//! - [`source`]: one resolver per upstream ecosystem behind a registry keyed
//!   by project (GeyserMC download API, metadata feed, GitHub releases,
//!   Jenkins CI)
//! - [`version`]: file-name comparison deciding whether an update is needed
//! - [`installer`]: locating installed artifacts, download to a temporary file
//!   and atomic rename
//! - [`cleanup`]: the marker-driven deferred sweep of the pack generator folder
//! - [`engine`]: per-project orchestration returning one outcome per project
//! - [`http`]: the HTTP seam ([`http::HttpClient`]) and its `reqwest` implementation
//! - [`config`]: TOML configuration (enabled projects, channels, network)
//! - [`cli`]: the `addonsync` command-line host
//!
//! # Example
//!
//! ```rust,no_run
//! use addonsync::catalog::Platform;
//! use addonsync::config::UpdaterConfig;
//! use addonsync::engine::UpdateEngine;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Arc::new(UpdaterConfig::load().await?);
//! let engine = UpdateEngine::new(config)?;
//! let plugins = Path::new("/srv/minecraft/plugins");
//!
//! engine.execute_cleanup_if_pending(Platform::Spigot, plugins);
//! for outcome in engine.check_and_update(Platform::Spigot, plugins).await {
//!     println!("{}: updated={}", outcome.project, outcome.updated());
//! }
//! # Ok(())
//! # }
//! ```

// Domain
pub mod catalog;
pub mod constants;
pub mod core;

// Resolution and installation
pub mod cleanup;
pub mod engine;
pub mod installer;
pub mod source;
pub mod version;

// Supporting modules
pub mod cli;
pub mod config;
pub mod http;
pub mod models;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
