//! Core types shared across devkit
//!
//! - [`error`] - [`DevkitError`] and the CLI-facing [`ErrorContext`]
//! - [`file_error`] - file operation errors that carry path, purpose and caller

pub mod error;
pub mod file_error;

pub use error::{DevkitError, ErrorContext, user_friendly_error};
pub use file_error::{FileOperation, FileOperationError, FileOps, FileResultExt};
