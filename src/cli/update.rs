//! `addonsync update`: install the latest build of every enabled add-on.
//!
//! With `--startup` the pending pack generator cleanup runs first, which is
//! how a server start script should invoke it. Per-project failures are part
//! of the report and do not change the exit code.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::sync::Arc;

use super::{TargetArgs, lock_install_dir};
use crate::catalog::Platform;
use crate::cleanup::CleanupReport;
use crate::config::UpdaterConfig;
use crate::engine::UpdateEngine;
use crate::models::{UpdateOutcome, UpdateStatus};

#[derive(Args, Debug)]
pub struct UpdateCommand {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Run the pending cleanup before updating (use at server start)
    #[arg(long)]
    pub startup: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct UpdateReport {
    platform: Platform,
    checked_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cleanup: Option<CleanupReport>,
    outcomes: Vec<UpdateOutcome>,
    restart_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    restart_command: Option<String>,
}

impl UpdateCommand {
    pub async fn execute(self, config: Arc<UpdaterConfig>) -> Result<()> {
        let install_dir = self.target.install_dir();
        let platform = self.target.platform;
        let _lock = lock_install_dir(&install_dir).await?;

        let engine = UpdateEngine::new(Arc::clone(&config))?;

        let cleanup = if self.startup {
            engine.execute_cleanup_if_pending(platform, &install_dir)
        } else {
            None
        };

        let outcomes = engine.check_and_update(platform, &install_dir).await;
        let any_updated = outcomes.iter().any(UpdateOutcome::updated);
        let restart_required = any_updated && config.updates.restart_after_update;

        let report = UpdateReport {
            platform,
            checked_at: Utc::now(),
            cleanup,
            outcomes,
            restart_required,
            restart_command: restart_required.then(|| config.updates.restart_command.clone()),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            display(&report);
        }
        Ok(())
    }
}

fn display(report: &UpdateReport) {
    if let Some(cleanup) = &report.cleanup {
        println!(
            "{} {} ({} removed, {} failed)",
            "Cleanup:".bold(),
            cleanup.folder.display(),
            cleanup.removed.len(),
            cleanup.failed.len()
        );
    }

    if report.outcomes.is_empty() {
        println!("{}", "No add-ons are enabled.".yellow());
        return;
    }

    println!("\n{} {}", "Add-ons for".bold(), report.platform.to_string().bold());
    println!("{}", "─".repeat(70));

    for outcome in &report.outcomes {
        let project = format!("{:<32}", outcome.project.capabilities().display_name);
        match &outcome.status {
            UpdateStatus::Updated {
                file_name,
                previous,
            } => {
                let from = previous.as_deref().map(|p| format!(" (was {p})")).unwrap_or_default();
                println!(
                    "{} {} {}{}",
                    project.green(),
                    "updated".green(),
                    file_name,
                    from.bright_black()
                );
            }
            UpdateStatus::Unchanged {
                file_name,
            } => println!("{} {} {}", project.normal(), "up to date".bright_black(), file_name),
            UpdateStatus::Failed {
                error,
            } => println!("{} {} {}", project.red(), "failed".red(), error),
        }
    }

    let updated = report.outcomes.iter().filter(|o| o.updated()).count();
    let failed = report.outcomes.iter().filter(|o| o.error().is_some()).count();
    println!("\n{}", "Summary:".bold());
    println!("  {} updated", updated.to_string().green());
    if failed > 0 {
        println!("  {} failed", failed.to_string().red());
    }

    if let Some(command) = &report.restart_command {
        println!(
            "\n{} run `{}` to load the new versions",
            "Restart required:".yellow().bold(),
            command
        );
    }
}
