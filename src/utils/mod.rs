//! Filesystem helpers shared by the installer, the cleanup protocol and the CLI.
//!
//! - [`fs`] - directory creation, listing, removal and the install-directory lock

pub mod fs;

pub use fs::{InstallLock, ensure_dir, list_dir_sorted, remove_path};
