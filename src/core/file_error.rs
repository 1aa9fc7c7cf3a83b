//! File operation errors that remember where they happened
//!
//! An `io::Error` alone says "No such file or directory". Wrapping it at the
//! call site with [`FileResultExt::with_file_context`] keeps the path, what the
//! file was needed for and which module asked, so the CLI can print all three.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Kind of file operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Read,
    Write,
    Copy,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::Copy => write!(f, "copying"),
        }
    }
}

/// An I/O failure with the path, purpose and caller attached
#[derive(Error, Debug)]
#[error("Failed {operation} {} ({purpose})", file_path.display())]
pub struct FileOperationError {
    pub operation: FileOperation,
    pub file_path: PathBuf,
    /// Why the file was being accessed, e.g. "reading the dotfiles manifest"
    pub purpose: String,
    /// Module that initiated the operation
    pub caller: String,
    #[source]
    pub source: std::io::Error,
}

impl FileOperationError {
    /// Multi-line explanation for the CLI, with a hint based on the I/O error kind
    pub fn user_message(&self) -> String {
        let mut message = format!(
            "Failed {} '{}' for {} ({})",
            self.operation,
            self.file_path.display(),
            self.purpose,
            self.caller
        );

        match self.source.kind() {
            std::io::ErrorKind::NotFound => {
                message.push_str("\n\nThe file does not exist at the specified path.");
            }
            std::io::ErrorKind::PermissionDenied => {
                message.push_str(&format!(
                    "\n\nPermission denied. Check file/directory permissions for: {}",
                    self.file_path.display()
                ));
            }
            _ => {
                message.push_str(&format!("\n\nError details: {}", self.source));
            }
        }

        message
    }
}

/// Extension trait for `io::Result` to attach file operation context
pub trait FileResultExt<T> {
    fn with_file_context(
        self,
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        caller: impl Into<String>,
    ) -> Result<T, FileOperationError>;
}

impl<T> FileResultExt<T> for Result<T, std::io::Error> {
    fn with_file_context(
        self,
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        caller: impl Into<String>,
    ) -> Result<T, FileOperationError> {
        self.map_err(|source| FileOperationError {
            operation,
            file_path: file_path.into(),
            purpose: purpose.into(),
            caller: caller.into(),
            source,
        })
    }
}

/// Access checks used before touching files that may be protected
pub struct FileOps;

impl FileOps {
    /// Verify that `path` can be opened for reading
    pub fn ensure_readable(
        path: &Path,
        purpose: &str,
        caller: &str,
    ) -> Result<(), FileOperationError> {
        std::fs::File::open(path).map(|_| ()).with_file_context(
            FileOperation::Read,
            path,
            purpose,
            caller,
        )
    }

    /// Verify that `path` can be opened for writing without truncating it
    pub fn ensure_writable(
        path: &Path,
        purpose: &str,
        caller: &str,
    ) -> Result<(), FileOperationError> {
        std::fs::OpenOptions::new().write(true).open(path).map(|_| ()).with_file_context(
            FileOperation::Write,
            path,
            purpose,
            caller,
        )
    }
}
