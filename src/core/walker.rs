//! Directory traversal for the source corpus
//!
//! This module provides the FileWalker trait and default implementation
//! for walking directory trees and reading the files found there.

use crate::core::error::{FilterError, Result};
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;

/// Render `path` with `/` separators, dropping a Windows verbatim
/// (`\\?\`) or device (`\\.\`) prefix
pub fn normalize_path_separators(path: &str) -> String {
    let path = path
        .strip_prefix(r"\\?\")
        .or_else(|| path.strip_prefix(r"\\.\"))
        .unwrap_or(path);
    path.replace('\\', "/")
}

/// Trait for file system walking
///
/// The corpus only decides *which* files to keep; listing and reading
/// them goes through this trait so both can be mocked in tests.
#[cfg_attr(test, automock)]
pub trait FileWalker: Send + Sync {
    /// List every regular file below `root`, recursively
    fn walk(&self, root: &Path) -> Result<Vec<PathBuf>>;

    /// Read a file's full content
    fn read(&self, path: &Path) -> Result<String>;
}

/// Default file walker implementation backed by walkdir
///
/// Symbolic links are not followed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultWalker;

impl DefaultWalker {
    /// Create a new DefaultWalker
    pub fn new() -> Self {
        Self
    }
}

impl FileWalker for DefaultWalker {
    fn walk(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.exists() {
            return Err(FilterError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }
        if !root.is_dir() {
            return Err(FilterError::invalid_config(format!(
                "'{}' is not a directory",
                root.display()
            )));
        }

        let mut files = Vec::new();

        for entry in walkdir::WalkDir::new(root).sort_by_file_name() {
            // Unreadable entries abort the walk instead of being skipped
            let entry = entry?;

            if entry.file_type().is_dir() {
                continue;
            }

            files.push(entry.into_path());
        }

        Ok(files)
    }

    fn read(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path)?;
        Ok(read_file_content(&bytes))
    }
}

/// Decode file content, normalizing line endings.
///
/// Invalid UTF-8 sequences are replaced rather than rejected so that
/// every eligible file still takes part in the search.
pub fn read_file_content(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).replace("\r\n", "\n")
}
