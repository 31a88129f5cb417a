//! Configuration for the update engine.
//!
//! The configuration is a small TOML document owned by the host. The engine
//! receives it behind an `Arc` and only ever reads it: which projects are
//! enabled, which channel the channelled projects follow, whether the pack
//! generator cleanup runs, and network settings.
//!
//! # Location
//!
//! - Unix/macOS: `~/.addonsync/config.toml`
//! - Windows: `%LOCALAPPDATA%\addonsync\config.toml`
//!
//! A missing file is not an error; defaults are used (Geyser and Floodgate
//! enabled, everything else disabled).
//!
//! # Example
//!
//! ```toml
//! [projects]
//! geyser = true
//! floodgate = true
//! luckperms = true
//!
//! [channels]
//! viaversion = "development"
//!
//! [updates]
//! cleanup_on_update = true
//! restart_after_update = true
//! restart_command = "restart"
//!
//! [network]
//! github_token = "ghp_..."
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::catalog::{Channel, Project};
use crate::constants::{DOWNLOAD_TIMEOUT, GITHUB_TOKEN_ENV, METADATA_TIMEOUT};

/// Root configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdaterConfig {
    #[serde(default)]
    pub projects: ProjectToggles,

    #[serde(default)]
    pub channels: ChannelConfig,

    #[serde(default)]
    pub updates: UpdatesConfig,

    #[serde(default)]
    pub network: NetworkConfig,
}

/// One switch per catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectToggles {
    #[serde(default = "enabled")]
    pub geyser: bool,
    #[serde(default = "enabled")]
    pub floodgate: bool,
    #[serde(default)]
    pub luckperms: bool,
    #[serde(default)]
    pub packetevents: bool,
    #[serde(default)]
    pub viaversion: bool,
    #[serde(default)]
    pub viabackwards: bool,
    #[serde(default)]
    pub thirdpartycosmetics: bool,
    #[serde(default)]
    pub emoteoffhand: bool,
    #[serde(default)]
    pub geysermodelengineextension: bool,
    #[serde(default)]
    pub geysermodelenginepackgenerator: bool,
}

const fn enabled() -> bool {
    true
}

impl Default for ProjectToggles {
    fn default() -> Self {
        Self {
            geyser: true,
            floodgate: true,
            luckperms: false,
            packetevents: false,
            viaversion: false,
            viabackwards: false,
            thirdpartycosmetics: false,
            emoteoffhand: false,
            geysermodelengineextension: false,
            geysermodelenginepackgenerator: false,
        }
    }
}

impl ProjectToggles {
    /// Every toggle switched off.
    #[must_use]
    pub fn none() -> Self {
        Self {
            geyser: false,
            floodgate: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn get(&self, project: Project) -> bool {
        match project {
            Project::Geyser => self.geyser,
            Project::Floodgate => self.floodgate,
            Project::LuckPerms => self.luckperms,
            Project::PacketEvents => self.packetevents,
            Project::ViaVersion => self.viaversion,
            Project::ViaBackwards => self.viabackwards,
            Project::ThirdPartyCosmetics => self.thirdpartycosmetics,
            Project::EmoteOffhand => self.emoteoffhand,
            Project::GeyserModelEngineExtension => self.geysermodelengineextension,
            Project::GeyserModelEnginePackGenerator => self.geysermodelenginepackgenerator,
        }
    }

    pub fn set(&mut self, project: Project, value: bool) {
        let slot = match project {
            Project::Geyser => &mut self.geyser,
            Project::Floodgate => &mut self.floodgate,
            Project::LuckPerms => &mut self.luckperms,
            Project::PacketEvents => &mut self.packetevents,
            Project::ViaVersion => &mut self.viaversion,
            Project::ViaBackwards => &mut self.viabackwards,
            Project::ThirdPartyCosmetics => &mut self.thirdpartycosmetics,
            Project::EmoteOffhand => &mut self.emoteoffhand,
            Project::GeyserModelEngineExtension => &mut self.geysermodelengineextension,
            Project::GeyserModelEnginePackGenerator => &mut self.geysermodelenginepackgenerator,
        };
        *slot = value;
    }
}

/// Channel selection for the projects that publish both releases and CI builds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelConfig {
    #[serde(default)]
    pub packetevents: Channel,
    #[serde(default)]
    pub viaversion: Channel,
}

impl ChannelConfig {
    /// Channel for `project`; projects without a toggle always report stable.
    #[must_use]
    pub const fn get(&self, project: Project) -> Channel {
        match project {
            Project::PacketEvents => self.packetevents,
            Project::ViaVersion => self.viaversion,
            _ => Channel::Stable,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatesConfig {
    /// Schedule the pack generator sweep after installing a new version.
    #[serde(default = "enabled")]
    pub cleanup_on_update: bool,

    /// Hint for the host: restart after at least one add-on was updated.
    #[serde(default)]
    pub restart_after_update: bool,

    #[serde(default = "default_restart_command")]
    pub restart_command: String,

    /// Reject downloads that do not open as a jar archive.
    #[serde(default = "enabled")]
    pub verify_archives: bool,
}

fn default_restart_command() -> String {
    "restart".to_string()
}

impl Default for UpdatesConfig {
    fn default() -> Self {
        Self {
            cleanup_on_update: true,
            restart_after_update: false,
            restart_command: default_restart_command(),
            verify_archives: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Optional bearer token for the GitHub API (raises the rate limit).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,

    #[serde(default = "default_metadata_timeout_secs")]
    pub metadata_timeout_secs: u64,

    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

const fn default_metadata_timeout_secs() -> u64 {
    METADATA_TIMEOUT.as_secs()
}

const fn default_download_timeout_secs() -> u64 {
    DOWNLOAD_TIMEOUT.as_secs()
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            metadata_timeout_secs: default_metadata_timeout_secs(),
            download_timeout_secs: default_download_timeout_secs(),
        }
    }
}

impl NetworkConfig {
    /// Token to send to the GitHub API, if any.
    ///
    /// A non-empty `ADDONSYNC_GITHUB_TOKEN` wins over the configured value.
    #[must_use]
    pub fn github_token(&self) -> Option<String> {
        std::env::var(GITHUB_TOKEN_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .or_else(|| self.github_token.clone().filter(|token| !token.trim().is_empty()))
    }

    #[must_use]
    pub const fn metadata_timeout(&self) -> Duration {
        Duration::from_secs(self.metadata_timeout_secs)
    }

    #[must_use]
    pub const fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

impl UpdaterConfig {
    /// Whether `project` is switched on.
    #[must_use]
    pub const fn is_enabled(&self, project: Project) -> bool {
        self.projects.get(project)
    }

    #[must_use]
    pub const fn channel(&self, project: Project) -> Channel {
        self.channels.get(project)
    }

    /// Load from the default location, falling back to defaults.
    pub async fn load() -> Result<Self> {
        Self::load_with_optional(None).await
    }

    /// Load from `path` when given, else from the default location.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => expand_path(&path),
            None => Self::default_path()?,
        };
        if path.exists() {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration from {}", path.display()))
    }

    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write configuration to {}", path.display()))?;

        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("addonsync")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".addonsync")
        };

        Ok(config_dir.join("config.toml"))
    }
}

/// Expand `~` and environment variables in a user-supplied path.
#[must_use]
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => path.to_path_buf(),
    }
}
