//! The update engine: the single entry point hosts talk to.
//!
//! The engine holds the configuration (read-only, shared) and an
//! [`HttpClient`]. Every operation takes the platform and install directory
//! explicitly, so one engine can serve several server directories.
//!
//! Projects are processed strictly one after another. The engine takes no
//! lock of its own; hosts that may overlap invocations on the same directory
//! wrap them in [`crate::utils::InstallLock`].

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::catalog::{Platform, Project};
use crate::cleanup::{self, CleanupReport};
use crate::config::UpdaterConfig;
use crate::http::{HttpClient, ReqwestClient};
use crate::installer::{self, find_existing, target_dir};
use crate::models::{UpdateOutcome, VersionInfo, VersionState};
use crate::source::resolve_latest;
use crate::version::is_update_available;

pub struct UpdateEngine<C: HttpClient = ReqwestClient> {
    config: Arc<UpdaterConfig>,
    client: C,
}

impl UpdateEngine<ReqwestClient> {
    /// Engine backed by a real HTTP client built from `config.network`.
    pub fn new(config: Arc<UpdaterConfig>) -> Result<Self> {
        let client = ReqwestClient::new(&config.network)?;
        Ok(Self::with_client(config, client))
    }
}

impl<C: HttpClient> UpdateEngine<C> {
    pub const fn with_client(config: Arc<UpdaterConfig>, client: C) -> Self {
        Self {
            config,
            client,
        }
    }

    #[must_use]
    pub fn config(&self) -> &UpdaterConfig {
        &self.config
    }

    /// Enabled projects in catalog order (parents before their extensions).
    pub fn enabled_projects(&self) -> impl Iterator<Item = Project> + '_ {
        Project::ALL.into_iter().filter(|project| self.config.is_enabled(*project))
    }

    /// Resolve, compare, download and install every enabled project.
    ///
    /// Returns exactly one outcome per enabled project. Disabled projects are
    /// absent. An enabled project that does not exist for `platform` yields a
    /// failed outcome rather than being skipped silently.
    pub async fn check_and_update(
        &self,
        platform: Platform,
        install_dir: &Path,
    ) -> Vec<UpdateOutcome> {
        let mut outcomes = Vec::new();

        for project in self.enabled_projects() {
            let outcome = self.install_latest(project, platform, install_dir).await;
            outcomes.push(outcome);
        }

        let updated = outcomes.iter().filter(|o| o.updated()).count();
        let failed = outcomes.iter().filter(|o| o.error().is_some()).count();
        info!(
            "Update run for {} finished: {} checked, {} updated, {} failed",
            platform,
            outcomes.len(),
            updated,
            failed
        );

        outcomes
    }

    /// Install the latest build of a single project.
    pub async fn install_latest(
        &self,
        project: Project,
        platform: Platform,
        install_dir: &Path,
    ) -> UpdateOutcome {
        installer::install_latest(&self.client, &self.config, project, platform, install_dir).await
    }

    /// Report installed and latest artifacts without changing anything on disk.
    ///
    /// One entry per catalog project, disabled ones included.
    pub async fn check_versions(&self, platform: Platform, install_dir: &Path) -> Vec<VersionInfo> {
        let mut infos = Vec::with_capacity(Project::ALL.len());

        for project in Project::ALL {
            if !self.config.is_enabled(project) {
                infos.push(VersionInfo::disabled(project));
                continue;
            }
            infos.push(self.version_info(project, platform, install_dir).await);
        }

        infos
    }

    async fn version_info(
        &self,
        project: Project,
        platform: Platform,
        install_dir: &Path,
    ) -> VersionInfo {
        let installed = match installed_file_name(project, platform, install_dir) {
            Ok(installed) => installed,
            Err(e) => {
                warn!("Cannot inspect installed {}: {}", project, e);
                None
            }
        };

        let channel = self.config.channel(project);
        let state = match resolve_latest(&self.client, project, platform, channel).await {
            Ok(latest) => VersionState::Resolved {
                update_available: is_update_available(installed.as_deref(), &latest.file_name),
                installed,
                latest: latest.file_name,
                version: latest.version,
                build: latest.build,
            },
            Err(e) => VersionState::Unresolved {
                installed,
                error: e.to_string(),
            },
        };

        VersionInfo {
            project,
            state,
        }
    }

    /// Run the deferred pack generator cleanup if a marker is pending.
    ///
    /// Meant to run once per process start, before the host loads add-ons.
    pub fn execute_cleanup_if_pending(
        &self,
        platform: Platform,
        install_dir: &Path,
    ) -> Option<CleanupReport> {
        cleanup::execute_if_pending(install_dir, platform)
    }

    /// Write the cleanup marker as if an update had just been applied.
    ///
    /// Returns `false`, with the reason logged, when cleanup is disabled, the
    /// pack generator folder is missing or a marker is already pending.
    pub fn simulate_update_marker(&self, platform: Platform, install_dir: &Path) -> bool {
        match cleanup::create_marker(&self.config, install_dir, platform) {
            Ok(marker) => {
                info!("Cleanup marker created at {}", marker.display());
                true
            }
            Err(e) => {
                warn!("Cleanup marker not created: {}", e);
                false
            }
        }
    }
}

/// File name of the installed artifact, without creating any directory.
fn installed_file_name(
    project: Project,
    platform: Platform,
    install_dir: &Path,
) -> crate::core::UpdateResult<Option<String>> {
    if !project.supports(platform) {
        return Ok(None);
    }
    let dir = match target_dir(project, platform, install_dir) {
        Ok(dir) => dir,
        Err(crate::core::UpdateError::ParentNotInstalled { .. }) => return Ok(None),
        Err(e) => return Err(e),
    };

    Ok(find_existing(project, platform, &dir)?
        .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned())))
}
