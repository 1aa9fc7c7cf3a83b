//! Filesystem helpers shared by the loader, the symlinker and the dotfile sync
//!
//! - [`fs`] - atomic writes, directory creation, path normalization and removal

pub mod fs;

pub use fs::{absolutize, atomic_write, ensure_dir, normalize_path, remove_path, safe_write};
