//! File system utilities
//!
//! Every write goes through [`atomic_write`] so an interrupted run never leaves a
//! half-written `package.json` or `.scoper.php` behind.
//!
//! # Examples
//!
//! ```rust,no_run
//! use composer_devkit::utils::fs::{ensure_dir, safe_write};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! ensure_dir(Path::new("src/libraries/dotfiles"))?;
//! safe_write(Path::new("src/libraries/dotfiles/.scoper.php"), "<?php\n")?;
//! # Ok(())
//! # }
//! ```

pub mod atomic;
pub mod dirs;
pub mod paths;

pub use atomic::{atomic_write, safe_write};
pub use dirs::{ensure_dir, ensure_parent_dir, remove_path};
pub use paths::{absolutize, normalize_path, to_forward_slashes};
