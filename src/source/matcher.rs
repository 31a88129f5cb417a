//! First-match asset selection shared by the release and CI resolvers.

use crate::catalog::Platform;
use crate::constants::{ARTIFACT_EXTENSION, COMPANION_MARKERS};

/// Required substring of a candidate, possibly depending on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Needle {
    /// Same substring on every platform.
    Fixed(&'static str),
    /// The prefix followed by the platform's API name, e.g. `packetevents-velocity`.
    PlatformSuffixed(&'static str),
}

impl Needle {
    #[must_use]
    pub fn for_platform(self, platform: Platform) -> String {
        match self {
            Self::Fixed(needle) => needle.to_string(),
            Self::PlatformSuffixed(prefix) => format!("{prefix}{}", platform.api_name()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Needle anywhere in the candidate.
    Contains,
    /// Candidate starts with the needle.
    Prefix,
}

/// Predicate selecting the real add-on jar among upstream candidates.
///
/// A candidate qualifies when it matches the needle, ends with the artifact
/// extension and contains none of the companion markers (`-api`, `sources`,
/// `javadoc`, `-docs`). All comparisons are case-insensitive.
#[derive(Debug, Clone)]
pub struct AssetFilter {
    needle: String,
    mode: MatchMode,
}

impl AssetFilter {
    #[must_use]
    pub fn contains(needle: impl AsRef<str>) -> Self {
        Self {
            needle: needle.as_ref().to_ascii_lowercase(),
            mode: MatchMode::Contains,
        }
    }

    #[must_use]
    pub fn prefix(needle: impl AsRef<str>) -> Self {
        Self {
            needle: needle.as_ref().to_ascii_lowercase(),
            mode: MatchMode::Prefix,
        }
    }

    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        let lower = candidate.to_ascii_lowercase();

        let hit = match self.mode {
            MatchMode::Contains => lower.contains(&self.needle),
            MatchMode::Prefix => lower.starts_with(&self.needle),
        };

        hit && lower.ends_with(ARTIFACT_EXTENSION)
            && !COMPANION_MARKERS.iter().any(|marker| lower.contains(marker))
    }

    /// First qualifying candidate in iteration (document) order.
    pub fn first_match<'a, I>(&self, candidates: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        candidates.into_iter().find(|candidate| self.matches(candidate))
    }

    /// Human-readable summary used in "no matching artifact" errors.
    #[must_use]
    pub fn describe(&self) -> String {
        let mode = match self.mode {
            MatchMode::Contains => "containing",
            MatchMode::Prefix => "starting with",
        };
        format!("{mode} '{}', ending in {ARTIFACT_EXTENSION}", self.needle)
    }
}
