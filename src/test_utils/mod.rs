//! Test utilities for devkit
//!
//! Helpers shared by unit tests and the integration suite:
//! - [`TestWorkspaceBuilder`] lays out a temporary project, home directory and
//!   dotfile templates
//! - [`init_test_logging`] routes `tracing` output through the test harness
//!
//! # Example
//!
//! ```rust,no_run
//! use composer_devkit::test_utils::TestWorkspaceBuilder;
//! use serde_json::json;
//!
//! let ws = TestWorkspaceBuilder::new()
//!     .unwrap()
//!     .with_project_path("a/b/project")
//!     .with_namespace_value(
//!         "post_update_cmd_handler",
//!         json!({"symlink_local_packages": {"vendor": ["acme/base"]}}),
//!     )
//!     .build()
//!     .unwrap();
//! assert!(ws.project_path("composer.json").is_file());
//! ```

pub mod builder;

pub use builder::{TestWorkspace, TestWorkspaceBuilder};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has any effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=composer_devkit=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
