//! The `scoper-config` command.
//!
//! Parses PHP stub files and writes the PHP-Scoper config listing every
//! constant, class-like and function they declare, so those symbols are left
//! un-prefixed when a project is scoped.

use crate::cli::CliConfig;
use crate::constants::{DEFAULT_SCOPER_OUTPUT, DEFAULT_SCOPER_STUBS};
use crate::scoper;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ScoperConfigCommand {
    /// PHP stub file to parse (repeatable)
    ///
    /// Defaults to the `php-stubs` WordPress, WordPress globals and
    /// WooCommerce stubs under `vendor/`.
    #[arg(long = "stub", value_name = "FILE")]
    pub stubs: Vec<PathBuf>,

    /// Where to write the generated config
    #[arg(long, value_name = "FILE", default_value = DEFAULT_SCOPER_OUTPUT)]
    pub output: PathBuf,
}

impl ScoperConfigCommand {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let stubs = if self.stubs.is_empty() {
            DEFAULT_SCOPER_STUBS.iter().map(PathBuf::from).collect()
        } else {
            self.stubs
        };

        let list = scoper::update_config_file(&stubs, &self.output)?;

        if !config.quiet {
            println!(
                "{} Wrote {} ({} constants, {} classes, {} functions)",
                "✓".green(),
                self.output.display(),
                list.constants.len(),
                list.classes.len(),
                list.functions.len()
            );
        }

        Ok(())
    }
}
