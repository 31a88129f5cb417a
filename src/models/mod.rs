//! Result records handed back to the host.
//!
//! [`UpdateOutcome`] is produced once per enabled project by the mutating
//! update path, [`VersionInfo`] once per catalog project by the read-only
//! status path. Both are plain values: the host renders them and drops them.
//!
//! The "exactly one of updated / unchanged / failed" rule is carried by the
//! [`UpdateStatus`] sum type rather than by independent flags; the boolean
//! accessors exist for hosts that want the flat view.

use serde::Serialize;
use std::fmt;

use crate::catalog::Project;

/// Result of one install attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateStatus {
    /// A new artifact was installed.
    Updated {
        file_name: String,
        /// Artifact that was replaced, when one was installed before.
        #[serde(skip_serializing_if = "Option::is_none")]
        previous: Option<String>,
    },
    /// The installed artifact already matches the latest one.
    Unchanged {
        file_name: String,
    },
    /// Resolution, download or installation failed. The message is never empty.
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    pub project: Project,
    #[serde(flatten)]
    pub status: UpdateStatus,
}

impl UpdateOutcome {
    #[must_use]
    pub const fn new(project: Project, status: UpdateStatus) -> Self {
        Self {
            project,
            status,
        }
    }

    /// A failed outcome. An empty message is replaced so the host always has
    /// something to show.
    #[must_use]
    pub fn failed(project: Project, error: impl fmt::Display) -> Self {
        let mut error = error.to_string();
        if error.trim().is_empty() {
            error = format!("{project} update failed for an unknown reason");
        }
        Self::new(
            project,
            UpdateStatus::Failed {
                error,
            },
        )
    }

    #[must_use]
    pub const fn updated(&self) -> bool {
        matches!(self.status, UpdateStatus::Updated { .. })
    }

    #[must_use]
    pub const fn skipped_no_change(&self) -> bool {
        matches!(self.status, UpdateStatus::Unchanged { .. })
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            UpdateStatus::Failed {
                error,
            } => Some(error),
            _ => None,
        }
    }

    /// File name now installed, when the attempt succeeded.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        match &self.status {
            UpdateStatus::Updated {
                file_name,
                ..
            }
            | UpdateStatus::Unchanged {
                file_name,
            } => Some(file_name),
            UpdateStatus::Failed { .. } => None,
        }
    }
}

/// Read-only status of one catalog project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum VersionState {
    /// Switched off in configuration; nothing was looked up.
    Disabled,
    /// The upstream answered.
    Resolved {
        installed: Option<String>,
        latest: String,
        /// Upstream version label (release tag, feed version or `#<build>`).
        #[serde(skip_serializing_if = "Option::is_none")]
        version: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        build: Option<u64>,
        update_available: bool,
    },
    /// The upstream could not be resolved; the local side is still reported.
    Unresolved {
        installed: Option<String>,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub project: Project,
    #[serde(flatten)]
    pub state: VersionState,
}

impl VersionInfo {
    #[must_use]
    pub const fn disabled(project: Project) -> Self {
        Self {
            project,
            state: VersionState::Disabled,
        }
    }

    #[must_use]
    pub const fn enabled(&self) -> bool {
        !matches!(self.state, VersionState::Disabled)
    }

    #[must_use]
    pub fn installed(&self) -> Option<&str> {
        match &self.state {
            VersionState::Resolved {
                installed,
                ..
            }
            | VersionState::Unresolved {
                installed,
                ..
            } => installed.as_deref(),
            VersionState::Disabled => None,
        }
    }

    #[must_use]
    pub fn latest(&self) -> Option<&str> {
        match &self.state {
            VersionState::Resolved {
                latest,
                ..
            } => Some(latest),
            _ => None,
        }
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        match &self.state {
            VersionState::Resolved {
                version,
                ..
            } => version.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub const fn update_available(&self) -> bool {
        matches!(
            self.state,
            VersionState::Resolved {
                update_available: true,
                ..
            }
        )
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            VersionState::Unresolved {
                error,
                ..
            } => Some(error),
            _ => None,
        }
    }

    #[must_use]
    pub fn build_number(&self) -> Option<u64> {
        match &self.state {
            VersionState::Resolved {
                build,
                ..
            } => *build,
            _ => None,
        }
    }
}
