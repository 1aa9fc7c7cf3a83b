//! devkit CLI entry point
//!
//! Parses arguments, sets up logging and runs the selected command. Failures are
//! printed through [`user_friendly_error`] and exit with status 1.

use composer_devkit::cli;
use composer_devkit::core::error::user_friendly_error;
use clap::Parser;

fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();
    let config = cli.build_config();

    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(e) = cli.execute_with_config(&config) {
        // Convert to user-friendly error with context and suggestions
        let error_ctx = user_friendly_error(e);
        error_ctx.display();
        std::process::exit(1);
    }
}
