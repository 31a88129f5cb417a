//! `addonsync status`: installed vs latest artifact for every project.
//!
//! Read-only: no lock is taken and nothing is downloaded.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::sync::Arc;

use super::TargetArgs;
use crate::catalog::Platform;
use crate::config::UpdaterConfig;
use crate::engine::UpdateEngine;
use crate::models::{VersionInfo, VersionState};

#[derive(Args, Debug)]
pub struct StatusCommand {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    platform: Platform,
    checked_at: DateTime<Utc>,
    projects: Vec<VersionInfo>,
}

impl StatusCommand {
    pub async fn execute(self, config: Arc<UpdaterConfig>) -> Result<()> {
        let install_dir = self.target.install_dir();
        let engine = UpdateEngine::new(config)?;

        let report = StatusReport {
            platform: self.target.platform,
            checked_at: Utc::now(),
            projects: engine.check_versions(self.target.platform, &install_dir).await,
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            display(&report);
        }
        Ok(())
    }
}

fn display(report: &StatusReport) {
    println!(
        "\n{:<32} {:<36} {:<36}",
        "Add-on".bold(),
        "Installed".bold(),
        "Latest".bold()
    );
    println!("{}", "─".repeat(104));

    for info in &report.projects {
        let name = info.project.capabilities().display_name;
        let installed = info.installed().unwrap_or("-");

        match &info.state {
            VersionState::Disabled => {
                println!("{:<32} {}", name.bright_black(), "disabled".bright_black());
            }
            VersionState::Resolved {
                latest,
                version,
                update_available,
                ..
            } => {
                let latest = match version {
                    Some(version) => format!("{latest} ({version})"),
                    None => latest.clone(),
                };
                let latest = if *update_available {
                    latest.green()
                } else {
                    latest.normal()
                };
                let name = if *update_available {
                    name.yellow()
                } else {
                    name.normal()
                };
                println!("{name:<32} {installed:<36} {latest:<36}");
            }
            VersionState::Unresolved {
                error,
                ..
            } => {
                println!("{:<32} {:<36} {}", name.red(), installed, error.red());
            }
        }
    }

    let available = report.projects.iter().filter(|i| i.update_available()).count();
    println!("\n{}", "Summary:".bold());
    if available == 0 {
        println!("  {}", "Everything enabled is up to date".green());
    } else {
        println!("  {} update(s) available", available.to_string().yellow());
    }
}
