//! Error types for test-result-filter
//!
//! This module provides structured error handling using thiserror.

use thiserror::Error;
use std::path::PathBuf;

/// Result type alias for filter operations
pub type Result<T> = std::result::Result<T, FilterError>;

/// Errors that can occur while loading reports or building the source corpus
#[derive(Error, Debug)]
pub enum FilterError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal failed part-way
    #[error("Failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    /// Directory not found
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed XML in the report document
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Well-formed XML that is not a usable JUnit report
    #[error("Invalid report: {message}")]
    InvalidReport { message: String },

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<FilterError>,
    },
}

impl FilterError {
    /// Wrap an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        FilterError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        FilterError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid report error
    pub fn invalid_report(message: impl Into<String>) -> Self {
        FilterError::InvalidReport {
            message: message.into(),
        }
    }
}

impl From<walkdir::Error> for FilterError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
        match err.into_io_error() {
            Some(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                FilterError::DirectoryNotFound { path }
            }
            Some(io_err) => FilterError::Walk {
                path,
                message: io_err.to_string(),
            },
            None => FilterError::Walk {
                path,
                message: "filesystem loop detected".to_string(),
            },
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(ctx))
    }
}
