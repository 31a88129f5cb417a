//! Process-level lock on an install directory.
//!
//! The update engine performs no mutual exclusion of its own. Hosts that may
//! run overlapping invocations (a manual trigger racing a periodic one, two
//! shells) take this lock around every mutating operation so two installs can
//! never race on the same destination file. The lock is released when the
//! [`InstallLock`] is dropped.

use anyhow::{Context, Result};
use fs4::fs_std::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::constants::INSTALL_LOCK_FILE;

/// An exclusive lock on `<install_dir>/.addonsync.lock`.
#[derive(Debug)]
pub struct InstallLock {
    file: File,
    path: PathBuf,
}

impl InstallLock {
    /// Acquires the lock, waiting for any other holder to release it.
    ///
    /// The install directory is created when missing. The blocking lock call
    /// runs on the blocking thread pool so the runtime is not stalled.
    ///
    /// # Errors
    ///
    /// Fails if the directory or lock file cannot be created, or if the file
    /// system does not support locking.
    pub async fn acquire(install_dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(install_dir).await.with_context(|| {
            format!("Failed to create install directory: {}", install_dir.display())
        })?;

        let lock_path = install_dir.join(INSTALL_LOCK_FILE);
        let lock_path_clone = lock_path.clone();

        let file = tokio::task::spawn_blocking(move || -> Result<File> {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&lock_path_clone)
                .with_context(|| {
                    format!("Failed to open lock file: {}", lock_path_clone.display())
                })?;

            file.lock_exclusive()
                .with_context(|| format!("Failed to lock {}", lock_path_clone.display()))?;

            Ok(file)
        })
        .await
        .context("Failed to spawn blocking task for lock acquisition")??;

        tracing::debug!("Acquired install lock {}", lock_path.display());

        Ok(Self {
            file,
            path: lock_path,
        })
    }

    /// Acquires the lock only if nobody else holds it.
    ///
    /// Returns `Ok(None)` when another process owns the lock.
    pub fn try_acquire(install_dir: &Path) -> Result<Option<Self>> {
        std::fs::create_dir_all(install_dir).with_context(|| {
            format!("Failed to create install directory: {}", install_dir.display())
        })?;

        let path = install_dir.join(INSTALL_LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("Failed to open lock file: {}", path.display()))?;

        let acquired = file
            .try_lock_exclusive()
            .with_context(|| format!("Failed to lock {}", path.display()))?;

        Ok(acquired.then(|| Self {
            file,
            path,
        }))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstallLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!("Failed to unlock {}: {}", self.path.display(), e);
        }
    }
}
