//! Integration test suite for devkit
//!
//! End-to-end tests that drive the `devkit` binary against temporary
//! workspaces built with [`composer_devkit::test_utils::TestWorkspaceBuilder`],
//! plus library-level tests that need process-wide environment variables.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **post_update**: `post-update-cmd` dev-mode gate, symlinking and dotfile sync
//! - **project**: project loading through the default `.dev.json` location
//! - **scoper_config**: `scoper-config` output generation

mod post_update;
mod project;
mod scoper_config;

use assert_cmd::Command;
use composer_devkit::test_utils::TestWorkspace;

/// `devkit` running in the workspace's project directory, isolated from the
/// caller's environment.
fn devkit(ws: &TestWorkspace) -> Command {
    let mut cmd = Command::cargo_bin("devkit").unwrap();
    cmd.current_dir(&ws.project_dir)
        .env("DEVKIT_DEV_JSON_DIR", &ws.home_dir)
        .env_remove("DEVKIT_DOTFILES_DIR")
        .env_remove("COMPOSER_DEV_MODE")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}
