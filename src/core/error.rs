//! Error handling for devkit
//!
//! This module provides the error types and user-friendly error reporting for the
//! devkit toolchain. The error system is designed around two core principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! The error system consists of two main types:
//! - [`DevkitError`] - Enumerated error types for all failure cases in devkit
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! # Error Categories
//!
//! devkit errors are organized into several categories:
//! - **Loading**: [`DevkitError::ConfigParseError`] for files that exist but cannot be read
//!   or decoded. A file that does not exist is never an error.
//! - **Contract violations**: [`DevkitError::ConfigError`], [`DevkitError::InvalidPackageName`],
//!   [`DevkitError::CircularDependency`], [`DevkitError::MissingExtendsPackage`],
//!   [`DevkitError::ProjectError`]
//! - **Mutations**: [`DevkitError::SymlinkFailed`], [`DevkitError::FileSystemError`],
//!   [`DevkitError::PermissionDenied`]
//! - **Stub parsing**: [`DevkitError::StubParseError`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use composer_devkit::core::{DevkitError, ErrorContext, user_friendly_error};
//!
//! fn load() -> Result<(), DevkitError> {
//!     Err(DevkitError::ConfigError {
//!         message: "`@extends-packages` must be an array".to_string(),
//!     })
//! }
//!
//! if let Err(e) = load() {
//!     let ctx = user_friendly_error(anyhow::Error::from(e));
//!     ctx.display();
//! }
//! ```

use super::file_error::FileOperationError;
use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for devkit operations
///
/// Each variant carries the path or value that caused the failure so messages
/// can name the offending file directly.
#[derive(Error, Debug, Clone)]
pub enum DevkitError {
    /// Configuration value has the wrong shape
    ///
    /// Raised for contract violations inside an otherwise well-formed document,
    /// e.g. a symlink mapping that is not an object or an unknown packages directory.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// A config file exists but could not be read or decoded
    #[error("Unable to load config file {file}: {reason}")]
    ConfigParseError {
        /// Path to the file that failed to load
        file: String,
        /// Specific reason for the failure
        reason: String,
    },

    /// A package name failed ecosystem validation
    #[error("Invalid package name '{name}': {reason}")]
    InvalidPackageName {
        /// The rejected package name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// An `@extends-packages` entry points at a package with no `composer.json`
    #[error("Missing composer.json for `@extends-packages` entry '{package}' (expected at {file})")]
    MissingExtendsPackage {
        /// The package named by the directive
        package: String,
        /// Where its composer.json was expected
        file: String,
    },

    /// `@extends-packages` chains loop back on themselves
    ///
    /// Example: A extends B, B extends C, C extends A
    #[error("Circular `@extends-packages` chain detected: {chain}")]
    CircularDependency {
        /// String representation of the chain, e.g. `a/x -> b/y -> a/x`
        chain: String,
    },

    /// Project descriptor could not be constructed
    #[error("Invalid project: {message}")]
    ProjectError {
        /// Description of what is missing or invalid
        message: String,
    },

    /// Deleting an installed package or creating its symlink failed
    #[error("Failed to symlink {path}: {reason}")]
    SymlinkFailed {
        /// The installed package path being replaced
        path: String,
        /// What went wrong
        reason: String,
    },

    /// File system error
    #[error("File system error: {operation}")]
    FileSystemError {
        /// The file system operation that failed
        operation: String,
        /// Path where the file system error occurred
        path: String,
    },

    /// Permission denied
    #[error("Permission denied: {operation}")]
    PermissionDenied {
        /// The operation that was denied due to insufficient permissions
        operation: String,
        /// Path where permission was denied
        path: String,
    },

    /// A stub file could not be parsed
    #[error("Failed to parse stub file {file}: {reason}")]
    StubParseError {
        /// Stub file path
        file: String,
        /// Parser failure description
        reason: String,
    },

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// Error context wrapper that provides user-friendly error information
///
/// `ErrorContext` wraps a [`DevkitError`] and adds an optional suggestion and
/// details. This is how the CLI presents every failure before exiting with
/// status 1.
///
/// # Display Format
///
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context in yellow (optional)
/// 3. **Suggestion**: Actionable steps in green (optional)
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying devkit error
    pub error: DevkitError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`DevkitError`]
    #[must_use]
    pub const fn new(error: DevkitError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`DevkitError`] anywhere in the `anyhow` chain (so errors wrapped
/// with `.context(...)` still get tailored suggestions), then
/// [`FileOperationError`]s and plain [`std::io::Error`]s, and finally falls back
/// to printing the full chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(devkit_error) = error.chain().find_map(|e| e.downcast_ref::<DevkitError>()) {
        let mut ctx = create_error_context(devkit_error.clone());
        // Keep the outer context messages visible
        let outer = error.to_string();
        if outer != devkit_error.to_string() {
            ctx.details = Some(match ctx.details.take() {
                Some(details) => format!("{outer}\n{details}"),
                None => outer,
            });
        }
        return ctx;
    }

    if let Some(file_error) = error.chain().find_map(|e| e.downcast_ref::<FileOperationError>()) {
        let path = file_error.file_path.display().to_string();
        let devkit_error = if file_error.source.kind() == std::io::ErrorKind::PermissionDenied {
            DevkitError::PermissionDenied {
                operation: file_error.to_string(),
                path,
            }
        } else {
            DevkitError::FileSystemError {
                operation: file_error.to_string(),
                path,
            }
        };
        let mut ctx = ErrorContext::new(devkit_error).with_details(file_error.user_message());
        let outer = error.to_string();
        if outer != file_error.to_string() {
            ctx.details = ctx.details.map(|details| format!("{outer}\n{details}"));
        }
        return ctx;
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(DevkitError::PermissionDenied {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check file ownership and permissions in the project directory")
                .with_details(
                    "This error occurs when devkit doesn't have permission to read or write files",
                );
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(DevkitError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();

    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(DevkitError::Other {
        message,
    })
}

/// Map each [`DevkitError`] variant to an [`ErrorContext`] with a suggestion
fn create_error_context(error: DevkitError) -> ErrorContext {
    match &error {
        DevkitError::ConfigParseError {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Check the JSON syntax of the file. A missing file is fine, a broken one is not",
        ),
        DevkitError::InvalidPackageName {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Use lowercase `vendor/name` for Composer packages and `name` or `@scope/name` for npm packages")
            .with_details("Package names are limited to 214 bytes"),
        DevkitError::MissingExtendsPackage {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Require the extended package so it is installed in `vendor/`, or remove it from `@extends-packages`",
        ),
        DevkitError::CircularDependency {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Remove one of the `@extends-packages` entries that closes the loop"),
        DevkitError::ProjectError {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Run devkit from a project root whose composer.json declares `name` and `extra.<namespace>.brand.data.slug`",
        ),
        DevkitError::SymlinkFailed {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Check permissions on the packages directory and re-run; earlier links are kept",
        ),
        DevkitError::PermissionDenied {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check file ownership and permissions in the project directory"),
        _ => ErrorContext::new(error),
    }
}
