//! Global constants used throughout the addonsync codebase.
//!
//! This module contains timeouts, file names and upstream endpoints that are
//! shared across multiple modules. Defining them centrally keeps magic strings
//! out of the resolver and installer code.

use std::time::Duration;

/// User agent sent with every upstream request.
pub const USER_AGENT: &str = concat!("addonsync/", env!("CARGO_PKG_VERSION"));

/// Default timeout for metadata requests (release lists, CI build JSON, feeds).
pub const METADATA_TIMEOUT: Duration = Duration::from_secs(15);

/// Default timeout for artifact downloads (60 seconds).
///
/// Jars for the larger add-ons are tens of megabytes; the timeout covers the
/// whole transfer, not just the connection.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Extension shared by every installable artifact.
pub const ARTIFACT_EXTENSION: &str = ".jar";

/// Companion artifacts published next to the real add-on jar.
///
/// Any candidate containing one of these markers is never selected.
pub const COMPANION_MARKERS: &[&str] = &["-api", "sources", "javadoc", "-docs"];

/// Substrings that identify a platform-specific artifact file name.
pub const PLATFORM_TOKENS: &[&str] = &["spigot", "paper", "bukkit", "velocity", "bungee"];

/// Name of the zero-byte file that schedules a deferred folder sweep.
pub const CLEANUP_MARKER: &str = ".cleanup-pending";

/// Sub-folder of the pack generator that holds user input and survives sweeps.
pub const PRESERVED_INPUT_DIR: &str = "input";

/// Folder inside the Geyser data folder where extensions are installed.
pub const EXTENSIONS_DIR: &str = "extensions";

/// Lock file the CLI holds while it mutates an install directory.
pub const INSTALL_LOCK_FILE: &str = ".addonsync.lock";

/// Prefix of in-flight download files.
pub const TEMP_FILE_PREFIX: &str = ".addonsync-";

/// Suffix of in-flight download files.
pub const TEMP_FILE_SUFFIX: &str = ".part";

/// Base endpoint of the GeyserMC download API.
pub const GEYSER_DOWNLOAD_API: &str = "https://download.geysermc.org/v2/projects";

/// LuckPerms metadata feed mapping platform keys to download URLs.
pub const LUCKPERMS_METADATA_FEED: &str = "https://metadata.luckperms.net/data/downloads";

/// GitHub REST API root.
pub const GITHUB_API: &str = "https://api.github.com";

/// Host name the optional bearer token is sent to.
pub const GITHUB_API_HOST: &str = "api.github.com";

/// Environment variable overriding the configured GitHub token.
pub const GITHUB_TOKEN_ENV: &str = "ADDONSYNC_GITHUB_TOKEN";
