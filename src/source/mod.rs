//! Upstream source resolution.
//!
//! Each tracked project is published through one upstream ecosystem. This
//! module maps a project (and, for the two channelled projects, the configured
//! [`Channel`]) to a [`Source`] and resolves that source to the download
//! location of the latest build.
//!
//! # Strategies
//!
//! - [`direct`]: URL synthesized from project and platform (GeyserMC API)
//! - [`feed`]: bespoke JSON metadata document keyed by platform (LuckPerms)
//! - [`release`]: GitHub latest release or release list
//! - [`ci`]: Jenkins last successful build
//!
//! The registry ([`source_for`]) is the only place that knows which project
//! uses which strategy; adding an upstream is a new arm there plus, at most, a
//! new strategy module.
//!
//! # Matching
//!
//! JSON responses are parsed into a [`serde_json::Value`] tree. The release
//! and CI strategies then run the same first-match-with-exclusions predicate
//! ([`AssetFilter`]) over the candidate strings in document order.
//!
//! No strategy retries; a failed resolution surfaces as an [`UpdateError`]
//! and the next invocation is the retry.

pub mod ci;
pub mod direct;
pub mod feed;
pub mod matcher;
pub mod release;

pub use matcher::{AssetFilter, MatchMode, Needle};
pub use release::ReleaseScope;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::catalog::{Channel, Platform, Project};
use crate::constants::LUCKPERMS_METADATA_FEED;
use crate::core::{UpdateError, UpdateResult};
use crate::http::HttpClient;

/// The latest build of a project as reported by its upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedArtifact {
    pub download_url: String,
    /// File name the artifact is installed under.
    pub file_name: String,
    /// Release tag, feed version or CI build label when the upstream has one.
    pub version: Option<String>,
    /// CI build number.
    pub build: Option<u64>,
}

/// Upstream publication strategy of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    DirectPath {
        api_project: &'static str,
    },
    MetadataFeed {
        url: &'static str,
    },
    Release {
        repo: &'static str,
        scope: ReleaseScope,
        needle: Needle,
    },
    CiBuild {
        job_url: &'static str,
        needle: Needle,
    },
}

/// Resolver registry keyed by project variant.
#[must_use]
pub const fn source_for(project: Project, channel: Channel) -> Source {
    match project {
        Project::Geyser => Source::DirectPath {
            api_project: "geyser",
        },
        Project::Floodgate => Source::DirectPath {
            api_project: "floodgate",
        },
        Project::LuckPerms => Source::MetadataFeed {
            url: LUCKPERMS_METADATA_FEED,
        },
        Project::PacketEvents => match channel {
            Channel::Stable => Source::Release {
                repo: "retrooper/packetevents",
                scope: ReleaseScope::Latest,
                needle: Needle::PlatformSuffixed("packetevents-"),
            },
            Channel::Development => Source::CiBuild {
                job_url: "https://ci.codemc.io/job/retrooper/job/packetevents/",
                needle: Needle::PlatformSuffixed("packetevents-"),
            },
        },
        Project::ViaVersion => match channel {
            Channel::Stable => Source::Release {
                repo: "ViaVersion/ViaVersion",
                scope: ReleaseScope::Latest,
                needle: Needle::Fixed("ViaVersion-"),
            },
            Channel::Development => Source::CiBuild {
                job_url: "https://ci.viaversion.com/job/ViaVersion/",
                needle: Needle::Fixed("ViaVersion-"),
            },
        },
        Project::ViaBackwards => Source::CiBuild {
            job_url: "https://ci.viaversion.com/job/ViaBackwards/",
            needle: Needle::Fixed("ViaBackwards-"),
        },
        Project::ThirdPartyCosmetics => Source::Release {
            repo: "GeyserMC/ThirdPartyCosmetics",
            scope: ReleaseScope::Latest,
            needle: Needle::Fixed("ThirdPartyCosmetics"),
        },
        Project::EmoteOffhand => Source::Release {
            repo: "GeyserMC/EmoteOffhand",
            scope: ReleaseScope::Latest,
            needle: Needle::Fixed("EmoteOffhand"),
        },
        Project::GeyserModelEngineExtension => Source::Release {
            repo: "xSquishyLiam/mc-GeyserModelEngine-extension",
            scope: ReleaseScope::List,
            needle: Needle::Fixed("GeyserModelEngineExtension"),
        },
        Project::GeyserModelEnginePackGenerator => Source::Release {
            repo: "xSquishyLiam/mc-GeyserModelEngine-PackGenerator",
            scope: ReleaseScope::List,
            needle: Needle::Fixed("PackGenerator"),
        },
    }
}

impl Source {
    /// Resolve the latest build of `project` for `platform`.
    ///
    /// # Errors
    ///
    /// Transport failures, non-2xx responses, malformed JSON, missing fields
    /// and the absence of any qualifying artifact.
    pub async fn resolve<C: HttpClient>(
        &self,
        client: &C,
        project: Project,
        platform: Platform,
    ) -> UpdateResult<ResolvedArtifact> {
        match self {
            Self::DirectPath {
                api_project,
            } => direct::resolve(api_project, project, platform),
            Self::MetadataFeed {
                url,
            } => feed::resolve(client, url, platform).await,
            Self::Release {
                repo,
                scope,
                needle,
            } => {
                let filter = AssetFilter::contains(needle.for_platform(platform));
                release::resolve(client, project, repo, *scope, &filter).await
            }
            Self::CiBuild {
                job_url,
                needle,
            } => {
                let filter = AssetFilter::prefix(needle.for_platform(platform));
                ci::resolve(client, project, job_url, &filter).await
            }
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DirectPath { .. } => "direct",
            Self::MetadataFeed { .. } => "metadata feed",
            Self::Release { .. } => "github release",
            Self::CiBuild { .. } => "ci build",
        }
    }
}

/// Resolve the latest build of `project` on `platform` using the registry.
pub async fn resolve_latest<C: HttpClient>(
    client: &C,
    project: Project,
    platform: Platform,
    channel: Channel,
) -> UpdateResult<ResolvedArtifact> {
    if !project.supports(platform) {
        return Err(UpdateError::UnsupportedPlatform {
            project,
            platform,
        });
    }

    let source = source_for(project, channel);
    debug!("Resolving {} for {} via {}", project, platform, source.kind());
    let artifact = source.resolve(client, project, platform).await?;
    debug!("Latest {} for {}: {}", project, platform, artifact.file_name);
    Ok(artifact)
}

/// Fetch `url` and parse the body into a generic JSON tree.
pub(crate) async fn fetch_json<C: HttpClient>(client: &C, url: &str) -> UpdateResult<Value> {
    let body = client.fetch_text(url).await?;
    serde_json::from_str(&body).map_err(|e| UpdateError::InvalidJson {
        url: url.to_string(),
        reason: e.to_string(),
    })
}
