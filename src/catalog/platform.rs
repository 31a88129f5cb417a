//! Deployment targets supported by the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three server/proxy deployment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Plugin-style server (Spigot, Paper and forks).
    Spigot,
    /// Velocity proxy.
    Velocity,
    /// BungeeCord proxy (and Waterfall).
    BungeeCord,
}

impl Platform {
    pub const ALL: [Self; 3] = [Self::Spigot, Self::Velocity, Self::BungeeCord];

    /// Identifier used in download URLs of the GeyserMC API and in CLI flags.
    #[must_use]
    pub const fn api_name(self) -> &'static str {
        match self {
            Self::Spigot => "spigot",
            Self::Velocity => "velocity",
            Self::BungeeCord => "bungeecord",
        }
    }

    /// Key used by the LuckPerms metadata feed for this platform.
    #[must_use]
    pub const fn feed_key(self) -> &'static str {
        match self {
            Self::Spigot => "bukkit",
            Self::Velocity => "velocity",
            Self::BungeeCord => "bungee",
        }
    }

    /// Lowercase substrings that mark an artifact as built for this platform.
    #[must_use]
    pub const fn file_tokens(self) -> &'static [&'static str] {
        match self {
            Self::Spigot => &["spigot", "paper", "bukkit"],
            Self::Velocity => &["velocity"],
            Self::BungeeCord => &["bungee"],
        }
    }

    /// Name of the Geyser data folder on this platform.
    ///
    /// Extensions live in `<install dir>/<this folder>/extensions`.
    #[must_use]
    pub const fn geyser_data_folder(self) -> &'static str {
        match self {
            Self::Spigot => "Geyser-Spigot",
            Self::Velocity => "geyser",
            Self::BungeeCord => "Geyser-BungeeCord",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Spigot => "Spigot",
            Self::Velocity => "Velocity",
            Self::BungeeCord => "BungeeCord",
        };
        f.write_str(name)
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spigot" | "paper" | "bukkit" => Ok(Self::Spigot),
            "velocity" => Ok(Self::Velocity),
            "bungeecord" | "bungee" | "waterfall" => Ok(Self::BungeeCord),
            other => Err(format!(
                "unknown platform '{other}' (expected spigot, velocity or bungeecord)"
            )),
        }
    }
}
