//! Command-line host for the update engine.
//!
//! # Commands
//!
//! - `update` - resolve and install every enabled project (`--startup` runs
//!   the pending cleanup first)
//! - `status` - report installed and latest artifacts without changing anything
//! - `cleanup` - run the pending pack generator cleanup now
//! - `mark-cleanup` - schedule the cleanup as if an update had been applied
//!
//! # Global Options
//!
//! - `--verbose` / `--quiet` - log level (`RUST_LOG` wins when set)
//! - `--config <PATH>` - configuration file instead of
//!   `~/.addonsync/config.toml`
//!
//! Mutating commands hold an exclusive lock on the install directory for their
//! whole duration, so overlapping invocations queue up instead of racing.
//!
//! ```bash
//! addonsync update --platform velocity --dir /srv/proxy/plugins --startup
//! addonsync --config ./addonsync.toml status --platform spigot --dir plugins --json
//! ```

mod cleanup;
mod status;
mod update;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::catalog::Platform;
use crate::config::{UpdaterConfig, expand_path};
use crate::utils::InstallLock;

/// Keep Geyser-ecosystem server add-ons up to date.
#[derive(Parser, Debug)]
#[command(
    name = "addonsync",
    about = "Resolve, download and atomically install the latest builds of server add-ons",
    version,
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, env = "ADDONSYNC_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Update every enabled add-on
    Update(update::UpdateCommand),

    /// Show installed and latest versions without changing anything
    Status(status::StatusCommand),

    /// Run the pending pack generator cleanup
    Cleanup(cleanup::CleanupCommand),

    /// Schedule the pack generator cleanup for the next startup
    MarkCleanup(cleanup::MarkCleanupCommand),
}

/// Server platform and install directory shared by all commands.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Server platform: spigot (paper, bukkit), velocity or bungeecord (waterfall)
    #[arg(short, long)]
    pub platform: Platform,

    /// Plugin directory of the server
    #[arg(short, long, value_name = "DIR")]
    pub dir: PathBuf,
}

impl TargetArgs {
    #[must_use]
    pub fn install_dir(&self) -> PathBuf {
        expand_path(&self.dir)
    }
}

/// Takes the install lock, saying so when another run already holds it.
async fn lock_install_dir(install_dir: &Path) -> Result<InstallLock> {
    if let Some(lock) = InstallLock::try_acquire(install_dir)? {
        return Ok(lock);
    }
    tracing::info!(
        "Another addonsync run holds {}, waiting for it to finish",
        install_dir.display()
    );
    InstallLock::acquire(install_dir).await
}

impl Cli {
    /// Log filter derived from the verbosity flags.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "addonsync=debug"
        } else if self.quiet {
            "warn"
        } else {
            "addonsync=info"
        }
    }

    /// Installs the global tracing subscriber, writing to stderr.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.log_filter()));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    pub async fn execute(self) -> Result<()> {
        let config = Arc::new(UpdaterConfig::load_with_optional(self.config.clone()).await?);

        match self.command {
            Commands::Update(cmd) => cmd.execute(config).await,
            Commands::Status(cmd) => cmd.execute(config).await,
            Commands::Cleanup(cmd) => cmd.execute(config).await,
            Commands::MarkCleanup(cmd) => cmd.execute(config).await,
        }
    }
}
