//! Command-line interface for devkit.
//!
//! devkit is meant to be wired into a project's `composer.json` scripts, so
//! every command reads the project from the working directory unless told
//! otherwise and stays silent when there is nothing to do.
//!
//! # Available Commands
//!
//! - `post-update-cmd` - Runs after `composer update`: replaces installed packages
//!   with local checkouts and syncs dotfiles from the shared templates
//! - `scoper-config` - Regenerates the PHP-Scoper exclusion config from stub files
//!
//! # Command Usage Patterns
//!
//! ```bash
//! # From composer.json: "post-update-cmd": "devkit post-update-cmd"
//! COMPOSER_DEV_MODE=1 devkit post-update-cmd
//!
//! # Run a single step
//! COMPOSER_DEV_MODE=1 devkit post-update-cmd symlink
//!
//! # Regenerate the scoper config with the default WordPress stubs
//! devkit scoper-config
//! ```
//!
//! # Logging
//!
//! Diagnostics go to stderr through `tracing`. `RUST_LOG` always wins; without
//! it `--verbose` selects `debug`, `--quiet` selects `error` and the default is
//! `warn`. Command reports go to stdout and are suppressed by `--quiet`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub mod post_update;
pub mod scoper;

/// Runtime settings derived from the global flags.
///
/// Built once by [`Cli::build_config`] and handed to every command so that
/// tests can drive commands without going through argument parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Default log directive when `RUST_LOG` is not set.
    ///
    /// `None` means `warn`.
    pub log_level: Option<String>,

    /// Suppress command reports on stdout.
    pub quiet: bool,
}

impl CliConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the `tracing` filter for this configuration.
    ///
    /// `RUST_LOG` takes precedence when it is set and parses; otherwise the
    /// configured level (or `warn`) is used.
    #[must_use]
    pub fn log_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.log_level.as_deref().unwrap_or("warn")))
    }
}

/// Composer development toolchain.
#[derive(Parser)]
#[command(
    name = "devkit",
    about = "Composer development toolchain",
    version,
    author,
    long_about = "Layered Composer project configuration, local package symlinks, \
                  dotfile sync and PHP-Scoper config generation"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (equivalent to `RUST_LOG=debug`)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress everything except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Composer post-update steps (symlink local packages, sync dotfiles)
    ///
    /// Does nothing unless `COMPOSER_DEV_MODE` is set, so production installs
    /// (`composer install --no-dev`) are left untouched.
    #[command(name = "post-update-cmd")]
    PostUpdateCmd(post_update::PostUpdateCommand),

    /// Regenerate the PHP-Scoper exclusion config from PHP stub files
    #[command(name = "scoper-config")]
    ScoperConfig(scoper::ScoperConfigCommand),
}

impl Cli {
    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            quiet: self.quiet,
        }
    }

    /// Execute the selected command with the flags' configuration.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(&config)
    }

    /// Execute the selected command with an explicit configuration.
    pub fn execute_with_config(self, config: &CliConfig) -> Result<()> {
        match self.command {
            Commands::PostUpdateCmd(cmd) => cmd.execute(config),
            Commands::ScoperConfig(cmd) => cmd.execute(config),
        }
    }
}
