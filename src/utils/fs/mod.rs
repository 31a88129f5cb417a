//! File system utilities.
//!
//! Synchronous helpers return `anyhow::Result` with the offending path in the
//! error context. The install lock is async because acquiring it may block.

pub mod dirs;
pub mod lock;

pub use dirs::{ensure_dir, list_dir_sorted, remove_path};
pub use lock::InstallLock;
