//! The fixed catalog of tracked add-ons and their capability table.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Platform;

/// Build channel for projects that publish both tagged releases and CI builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Tagged releases.
    #[default]
    Stable,
    /// Last successful CI build.
    Development,
}

/// One third-party add-on tracked by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Project {
    Geyser,
    Floodgate,
    LuckPerms,
    PacketEvents,
    ViaVersion,
    ViaBackwards,
    ThirdPartyCosmetics,
    EmoteOffhand,
    GeyserModelEngineExtension,
    GeyserModelEnginePackGenerator,
}

/// Static description of a project's behavior.
#[derive(Debug)]
pub struct Capabilities {
    /// Stable machine name, also the configuration key.
    pub key: &'static str,
    pub display_name: &'static str,
    /// Lowercase substring identifying the project's installed jar.
    pub file_hint: &'static str,
    /// Parent add-on for extensions.
    pub extension_of: Option<Project>,
    /// Published by a CI server.
    pub ci_built: bool,
    /// Published as tagged releases.
    pub tag_released: bool,
    /// Upstream serves the same filename for every build.
    pub static_file_name: bool,
    /// Installing a new version schedules a deferred folder sweep.
    pub cleanup_on_update: bool,
    pub platforms: &'static [Platform],
}

const ALL_PLATFORMS: &[Platform] = &Platform::ALL;
const SPIGOT_ONLY: &[Platform] = &[Platform::Spigot];

const GEYSER: Capabilities = Capabilities {
    key: "geyser",
    display_name: "Geyser",
    file_hint: "geyser",
    extension_of: None,
    ci_built: false,
    tag_released: false,
    static_file_name: true,
    cleanup_on_update: false,
    platforms: ALL_PLATFORMS,
};

const FLOODGATE: Capabilities = Capabilities {
    key: "floodgate",
    display_name: "Floodgate",
    file_hint: "floodgate",
    extension_of: None,
    ci_built: false,
    tag_released: false,
    static_file_name: true,
    cleanup_on_update: false,
    platforms: ALL_PLATFORMS,
};

const LUCKPERMS: Capabilities = Capabilities {
    key: "luckperms",
    display_name: "LuckPerms",
    file_hint: "luckperms",
    extension_of: None,
    ci_built: false,
    tag_released: false,
    static_file_name: false,
    cleanup_on_update: false,
    platforms: ALL_PLATFORMS,
};

const PACKETEVENTS: Capabilities = Capabilities {
    key: "packetevents",
    display_name: "PacketEvents",
    file_hint: "packetevents",
    extension_of: None,
    ci_built: true,
    tag_released: true,
    static_file_name: false,
    cleanup_on_update: false,
    platforms: ALL_PLATFORMS,
};

const VIAVERSION: Capabilities = Capabilities {
    key: "viaversion",
    display_name: "ViaVersion",
    file_hint: "viaversion",
    extension_of: None,
    ci_built: true,
    tag_released: true,
    static_file_name: false,
    cleanup_on_update: false,
    platforms: ALL_PLATFORMS,
};

const VIABACKWARDS: Capabilities = Capabilities {
    key: "viabackwards",
    display_name: "ViaBackwards",
    file_hint: "viabackwards",
    extension_of: None,
    ci_built: true,
    tag_released: false,
    static_file_name: false,
    cleanup_on_update: false,
    platforms: ALL_PLATFORMS,
};

const THIRD_PARTY_COSMETICS: Capabilities = Capabilities {
    key: "thirdpartycosmetics",
    display_name: "ThirdPartyCosmetics",
    file_hint: "thirdpartycosmetics",
    extension_of: Some(Project::Geyser),
    ci_built: false,
    tag_released: true,
    static_file_name: false,
    cleanup_on_update: false,
    platforms: ALL_PLATFORMS,
};

const EMOTE_OFFHAND: Capabilities = Capabilities {
    key: "emoteoffhand",
    display_name: "EmoteOffhand",
    file_hint: "emoteoffhand",
    extension_of: Some(Project::Geyser),
    ci_built: false,
    tag_released: true,
    static_file_name: false,
    cleanup_on_update: false,
    platforms: ALL_PLATFORMS,
};

const MODEL_ENGINE_EXTENSION: Capabilities = Capabilities {
    key: "geysermodelengineextension",
    display_name: "GeyserModelEngineExtension",
    file_hint: "geysermodelengineextension",
    extension_of: Some(Project::Geyser),
    ci_built: false,
    tag_released: true,
    static_file_name: false,
    cleanup_on_update: false,
    platforms: SPIGOT_ONLY,
};

const MODEL_ENGINE_PACK_GENERATOR: Capabilities = Capabilities {
    key: "geysermodelenginepackgenerator",
    display_name: "GeyserModelEnginePackGenerator",
    file_hint: "packgenerator",
    extension_of: Some(Project::Geyser),
    ci_built: false,
    tag_released: true,
    static_file_name: false,
    cleanup_on_update: true,
    platforms: SPIGOT_ONLY,
};

impl Project {
    /// Every project, parents before their extensions.
    pub const ALL: [Self; 10] = [
        Self::Geyser,
        Self::Floodgate,
        Self::LuckPerms,
        Self::PacketEvents,
        Self::ViaVersion,
        Self::ViaBackwards,
        Self::ThirdPartyCosmetics,
        Self::EmoteOffhand,
        Self::GeyserModelEngineExtension,
        Self::GeyserModelEnginePackGenerator,
    ];

    #[must_use]
    pub const fn capabilities(self) -> &'static Capabilities {
        match self {
            Self::Geyser => &GEYSER,
            Self::Floodgate => &FLOODGATE,
            Self::LuckPerms => &LUCKPERMS,
            Self::PacketEvents => &PACKETEVENTS,
            Self::ViaVersion => &VIAVERSION,
            Self::ViaBackwards => &VIABACKWARDS,
            Self::ThirdPartyCosmetics => &THIRD_PARTY_COSMETICS,
            Self::EmoteOffhand => &EMOTE_OFFHAND,
            Self::GeyserModelEngineExtension => &MODEL_ENGINE_EXTENSION,
            Self::GeyserModelEnginePackGenerator => &MODEL_ENGINE_PACK_GENERATOR,
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        self.capabilities().key
    }

    #[must_use]
    pub const fn file_hint(self) -> &'static str {
        self.capabilities().file_hint
    }

    #[must_use]
    pub const fn parent(self) -> Option<Self> {
        self.capabilities().extension_of
    }

    #[must_use]
    pub const fn is_extension(self) -> bool {
        self.capabilities().extension_of.is_some()
    }

    /// Whether the channel toggle applies to this project.
    #[must_use]
    pub const fn has_channels(self) -> bool {
        let caps = self.capabilities();
        caps.ci_built && caps.tag_released
    }

    #[must_use]
    pub fn supports(self, platform: Platform) -> bool {
        self.capabilities().platforms.contains(&platform)
    }

    /// Look a project up by its machine name (case-insensitive).
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|project| project.key().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.capabilities().display_name)
    }
}
