//! The `post-update-cmd` command.
//!
//! Hooked into a project's `composer.json` as
//!
//! ```json
//! { "scripts": { "post-update-cmd": "devkit post-update-cmd" } }
//! ```
//!
//! it runs two steps against the project in the working directory:
//!
//! 1. `symlink` - replace installed packages with local checkouts found in
//!    ancestor directories (see [`crate::symlink`])
//! 2. `update` - sync dotfiles from the shared templates directory
//!    (see [`crate::dotfiles`])
//!
//! Both steps only run in development installs. Composer exports
//! `COMPOSER_DEV_MODE=1` for those and `0` for `--no-dev`; anything other than
//! a non-empty value that is not `0` makes the command a no-op.

use crate::cli::CliConfig;
use crate::config::ConfigCache;
use crate::constants::{COMPOSER_DEV_MODE_ENV, DEFAULT_DOTFILES_SUBDIR, DOTFILES_DIR_ENV};
use crate::dotfiles::{self, SyncReport};
use crate::project::Project;
use crate::symlink::{self, SkipReason, SymlinkReport};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;

/// A single post-update step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Step {
    /// Symlink local package checkouts
    Symlink,
    /// Sync dotfiles from the templates directory
    Update,
}

#[derive(Args, Debug)]
pub struct PostUpdateCommand {
    /// Run only this step (default: `symlink` then `update`)
    #[arg(value_enum)]
    pub step: Option<Step>,

    /// Project directory (default: the current directory)
    #[arg(long, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// Dotfiles templates directory
    ///
    /// Defaults to `vendor/clevercanyon/utilities-dev/src/libraries/dotfiles`
    /// inside the project.
    #[arg(long, value_name = "DIR", env = DOTFILES_DIR_ENV)]
    pub dotfiles_dir: Option<PathBuf>,
}

impl PostUpdateCommand {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let dev_mode = std::env::var(COMPOSER_DEV_MODE_ENV).ok();
        if !is_dev_mode(dev_mode.as_deref()) {
            debug!("{COMPOSER_DEV_MODE_ENV}={dev_mode:?}, skipping post-update steps");
            if !config.quiet {
                println!(
                    "{} {COMPOSER_DEV_MODE_ENV} is not enabled, nothing to do",
                    "ℹ".blue()
                );
            }
            return Ok(());
        }

        let project_dir = match self.project_dir {
            Some(dir) => dir,
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };

        let mut cache = ConfigCache::new();
        let project = Project::load(&project_dir, &mut cache)?;
        debug!("Running post-update steps for {}", project.name());

        let steps = match self.step {
            Some(step) => vec![step],
            None => vec![Step::Symlink, Step::Update],
        };

        for step in steps {
            match step {
                Step::Symlink => {
                    let report = symlink::run(&project).context("Failed to symlink local packages")?;
                    if !config.quiet {
                        print_symlink_report(&report);
                    }
                }
                Step::Update => {
                    let templates_dir = self
                        .dotfiles_dir
                        .clone()
                        .unwrap_or_else(|| project.dir().join(DEFAULT_DOTFILES_SUBDIR));
                    let report = dotfiles::run(&project, &templates_dir)
                        .with_context(|| format!("Failed to sync dotfiles from {}", templates_dir.display()))?;
                    if !config.quiet {
                        print_sync_report(&report);
                    }
                }
            }
        }

        Ok(())
    }
}

/// Composer dev mode is on for any non-empty value except `0`.
fn is_dev_mode(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some(v) if !v.is_empty() && v != "0")
}

fn print_symlink_report(report: &SymlinkReport) {
    if report.is_empty() {
        println!("No local packages to symlink");
        return;
    }

    for linked in &report.linked {
        println!(
            "{} {}/{} -> {}",
            "✓".green(),
            linked.request.packages_dir,
            linked.request.name,
            linked.target.display()
        );
    }
    for (request, reason) in &report.skipped {
        let why = match reason {
            SkipReason::NotInstalled => "not installed",
            SkipReason::NoLocalCheckout => "no local checkout",
        };
        println!("{} {}/{} ({why})", "-".dimmed(), request.packages_dir, request.name);
    }
}

fn print_sync_report(report: &SyncReport) {
    for path in &report.copied {
        println!("{} {path}", "✓".green());
    }
    for path in &report.merged {
        println!("{} {path} (merged)", "✓".green());
    }
    for path in &report.missing {
        println!("{} {path} is listed in the manifest but has no template", "⚠".yellow());
    }
    println!(
        "Synced {} dotfile(s)",
        report.copied.len() + report.merged.len()
    );
}
