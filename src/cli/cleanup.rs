//! `addonsync cleanup` and `addonsync mark-cleanup`.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::sync::Arc;

use super::{TargetArgs, lock_install_dir};
use crate::config::UpdaterConfig;
use crate::engine::UpdateEngine;

/// Run the pending pack generator cleanup now.
#[derive(Args, Debug)]
pub struct CleanupCommand {
    #[command(flatten)]
    pub target: TargetArgs,
}

impl CleanupCommand {
    pub async fn execute(self, config: Arc<UpdaterConfig>) -> Result<()> {
        let install_dir = self.target.install_dir();
        let _lock = lock_install_dir(&install_dir).await?;
        let engine = UpdateEngine::new(config)?;

        match engine.execute_cleanup_if_pending(self.target.platform, &install_dir) {
            Some(report) => {
                println!(
                    "{} {}: {} removed, {} failed",
                    "Cleaned".green(),
                    report.folder.display(),
                    report.removed.len(),
                    report.failed.len()
                );
                for path in &report.failed {
                    println!("  {} {}", "could not remove".red(), path.display());
                }
            }
            None => println!("No cleanup pending"),
        }
        Ok(())
    }
}

/// Write the cleanup marker as if an update had just been applied.
#[derive(Args, Debug)]
pub struct MarkCleanupCommand {
    #[command(flatten)]
    pub target: TargetArgs,
}

impl MarkCleanupCommand {
    pub async fn execute(self, config: Arc<UpdaterConfig>) -> Result<()> {
        let install_dir = self.target.install_dir();
        let _lock = lock_install_dir(&install_dir).await?;
        let engine = UpdateEngine::new(config)?;

        if engine.simulate_update_marker(self.target.platform, &install_dir) {
            println!("{} cleanup will run at the next startup", "Scheduled:".green());
        } else {
            println!(
                "{} cleanup was not scheduled (disabled, folder missing or already pending)",
                "Skipped:".yellow()
            );
        }
        Ok(())
    }
}
