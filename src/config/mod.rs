//! Layered JSON configuration
//!
//! devkit reads two documents:
//!
//! - `composer.json` in the project directory. Its `extra.<namespace>` subtree
//!   may pull in the same subtree from other installed packages through an
//!   `@extends-packages` directive.
//! - `.dev.json` in the developer's home directory (or `$DEVKIT_DEV_JSON_DIR`).
//!
//! A missing file is never an error and reads as `{}`. A file that exists but
//! cannot be decoded is a [`DevkitError::ConfigParseError`](crate::core::DevkitError).
//! Results are memoized in a caller-owned [`ConfigCache`].
//!
//! # Modules
//!
//! - [`loader`] - [`ConfigLoader`] and the three-way [`ConfigFile`] read outcome
//! - [`cache`] - [`ConfigCache`], the per-invocation memo
//! - [`merge`] - [`deep_merge`] and `${VAR}` [`interpolate`]
//! - [`path`] - dotted-path [`lookup`] into config trees

pub mod cache;
pub mod loader;
pub mod merge;
pub mod path;

pub use cache::{ConfigCache, DocumentKind};
pub use loader::{ConfigFile, ConfigLoader, default_dev_dir};
pub use merge::{deep_merge, interpolate, merge_layers};
pub use path::{lookup, lookup_str};
