//! devkit - Composer development toolchain
//!
//! Development-time helpers for a family of Composer projects that share
//! configuration through installed packages.
//!
//! # Architecture Overview
//!
//! Every project carries its devkit settings in `composer.json` under
//! `extra.clevercanyon`. A namespace may list other installed packages under
//! `@extends-packages`; their namespaces are loaded first and the project's own
//! settings are deep-merged on top. A personal `~/.dev.json` is loaded the same
//! way for per-developer settings.
//!
//! On top of that configuration devkit provides:
//! - replacing installed packages with local checkouts (symlinks)
//! - syncing shared dotfiles from a templates directory into each project
//! - generating the PHP-Scoper exclusion list from PHP stub files
//!
//! # Core Modules
//!
//! - [`config`] - JSON config loading, `@extends-packages`, merging and caching
//! - [`project`] - [`project::Project`], the validated descriptor of one project
//! - [`package_name`] - Composer and npm package identity rules
//! - [`symlink`] - local-package symlinking
//! - [`dotfiles`] - dotfile template sync and `package.json` merging
//! - [`scoper`] - PHP stub parsing and scoper config rendering
//!
//! ## Supporting Modules
//! - [`cli`] - Command-line interface
//! - [`core`] - Error types and user-facing error reporting
//! - [`constants`] - File names, config paths and environment variables
//! - [`utils`] - Atomic writes and path helpers
//!
//! # Configuration Layers
//!
//! ```json
//! {
//!     "name": "acme/site",
//!     "extra": {
//!         "clevercanyon": {
//!             "@extends-packages": ["acme/base"],
//!             "brand": { "data": { "slug": "acme-site" } },
//!             "post_update_cmd_handler": {
//!                 "symlink_local_packages": { "vendor": ["acme/base"] }
//!             }
//!         }
//!     }
//! }
//! ```
//!
//! `vendor/acme/base/composer.json` is loaded (recursively resolving its own
//! `@extends-packages`), then `acme/site`'s namespace is merged over it. Objects
//! merge key by key; arrays and scalars are replaced.

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod dotfiles;
pub mod package_name;
pub mod project;
pub mod scoper;
pub mod symlink;
pub mod utils;

// test_utils is available for tests in this crate and for integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
