//! Error handling for addonsync
//!
//! This module provides the error types and user-facing error reporting for the
//! update engine. The error system follows two principles:
//! 1. **Strongly-typed errors** for every failure the engine can classify
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Resolution**: [`UpdateError::Network`], [`UpdateError::HttpStatus`],
//!   [`UpdateError::NoMatchingAsset`], [`UpdateError::PlatformNotFound`], ...
//! - **Local state**: [`UpdateError::ParentNotInstalled`],
//!   [`UpdateError::FileSystem`], [`UpdateError::CorruptArtifact`]
//! - **Cleanup protocol**: [`UpdateError::MarkerExists`],
//!   [`UpdateError::CleanupDisabled`], [`UpdateError::AddonFolderNotFound`]
//!
//! The engine never lets one of these escape a per-project operation: they are
//! rendered with `{:#}` into the project's outcome and processing continues.
//! [`user_friendly_error`] is only used by the CLI for host-level failures.

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::{Platform, Project};

/// Errors produced while resolving, installing or cleaning up an add-on.
#[derive(Error, Debug)]
pub enum UpdateError {
    /// Transport-level failure (DNS, TLS, timeout, connection reset).
    #[error("Network error while requesting {url}: {reason}")]
    Network {
        url: String,
        reason: String,
    },

    /// The upstream answered with a non-2xx status.
    #[error("Request to {url} failed with HTTP {status}")]
    HttpStatus {
        url: String,
        status: u16,
    },

    /// The upstream body was not valid JSON.
    #[error("Invalid JSON returned by {url}: {reason}")]
    InvalidJson {
        url: String,
        reason: String,
    },

    /// A field the resolver relies on is absent from the upstream document.
    #[error("Field '{field}' missing from response of {url}")]
    MissingField {
        field: String,
        url: String,
    },

    /// No candidate satisfied the asset filter.
    #[error("No matching artifact for {project} ({criteria}) at {url}")]
    NoMatchingAsset {
        project: Project,
        criteria: String,
        url: String,
    },

    /// The metadata feed carries no entry for this platform.
    #[error("Platform '{key}' not found in {url}")]
    PlatformNotFound {
        key: String,
        url: String,
    },

    #[error("{project} is not available for {platform}")]
    UnsupportedPlatform {
        project: Project,
        platform: Platform,
    },

    /// An extension was requested but its parent add-on has no data folder.
    #[error("{project} requires {parent}, which is not installed (missing {path})")]
    ParentNotInstalled {
        project: Project,
        parent: Project,
        path: PathBuf,
    },

    /// The downloaded file is not a readable archive.
    #[error("Downloaded artifact from {url} is not a valid jar: {reason}")]
    CorruptArtifact {
        url: String,
        reason: String,
    },

    #[error("File system error: {operation} ({path})")]
    FileSystem {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A cleanup marker is already waiting for the next startup.
    #[error("Cleanup marker already present at {path}")]
    MarkerExists {
        path: PathBuf,
    },

    #[error("Cleanup on update is disabled in configuration")]
    CleanupDisabled,

    /// The add-on folder the cleanup protocol operates on could not be located.
    #[error("Could not locate the {project} folder under {searched}")]
    AddonFolderNotFound {
        project: Project,
        searched: PathBuf,
    },
}

impl UpdateError {
    /// Build a [`UpdateError::FileSystem`] from an I/O error.
    pub fn fs(
        operation: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used by the resolver and installer layers.
pub type UpdateResult<T> = Result<T, UpdateError>;

/// An error wrapped with an optional suggestion for display.
#[derive(Debug)]
pub struct ErrorContext {
    pub error: anyhow::Error,
    pub suggestion: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub fn new(error: anyhow::Error) -> Self {
        Self {
            error,
            suggestion: None,
        }
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{} {:#}", "error:".red().bold(), self.error);

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{} {}", "hint:".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.error)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }
        Ok(())
    }
}

/// Convert a host-level failure into an [`ErrorContext`] with a suggestion
/// when the failure is one the user can act on.
///
/// Per-project failures never get here; they are part of the command output.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let suggestion = error.chain().find_map(|cause| {
        if let Some(io_error) = cause.downcast_ref::<std::io::Error>() {
            return match io_error.kind() {
                std::io::ErrorKind::PermissionDenied => {
                    Some("Check that the server user can write to the install directory")
                }
                std::io::ErrorKind::NotFound => {
                    Some("Check that the path passed with --dir exists")
                }
                _ => None,
            };
        }
        if cause.downcast_ref::<toml::de::Error>().is_some() {
            return Some("Fix the syntax of the configuration file");
        }
        None
    });

    let context = ErrorContext::new(error);
    match suggestion {
        Some(suggestion) => context.with_suggestion(suggestion),
        None => context,
    }
}
