//! Run configuration
//!
//! Settings come from three layers: built-in defaults, an optional JSON
//! config file, and command-line overrides. They are merged once at startup
//! into an immutable [`Settings`] value that the rest of the run borrows.

use std::path::Path;

use tracing::{debug, warn};

use super::corpus::CorpusConfig;
use super::error::Result;
use super::filter::FilterConfig;
use super::models::{FileConfig, DEFAULT_CONFIG_FILE};

/// Fully resolved settings for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub filter: FilterConfig,
    pub corpus: CorpusConfig,
}

impl Settings {
    /// Merge a file config with the command-line filter options.
    ///
    /// `source_url` from the command line wins over the file.
    pub fn resolve(file: &FileConfig, mut filter: FilterConfig, source_url: Option<String>) -> Self {
        filter.source_url = source_url.unwrap_or_else(|| file.source_url.clone());
        Self {
            filter,
            corpus: CorpusConfig::from(file),
        }
    }
}

/// Load the config file for a run.
///
/// An explicitly named file must load. Otherwise `DEFAULT_CONFIG_FILE` in the
/// source tree root is used when present; a broken implicit file only warns.
pub fn load_file_config(explicit: Option<&Path>, tree_root: &Path) -> Result<FileConfig> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "loading config");
        return FileConfig::from_file(path);
    }

    let implicit = tree_root.join(DEFAULT_CONFIG_FILE);
    if !implicit.exists() {
        return Ok(FileConfig::default());
    }

    match FileConfig::from_file(&implicit) {
        Ok(config) => {
            debug!(path = %implicit.display(), "loaded config");
            Ok(config)
        }
        Err(e) => {
            warn!("Could not load config file: {}", e);
            Ok(FileConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::FilterError;
    use crate::core::filter::ResultFilter;
    use crate::core::models::DEFAULT_SOURCE_URL;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_without_any_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_file_config(None, temp_dir.path()).unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_load_implicit_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(DEFAULT_CONFIG_FILE),
            r#"{"source_url": "https://example.com/blob/main"}"#,
        )
        .unwrap();

        let config = load_file_config(None, temp_dir.path()).unwrap();
        assert_eq!(config.source_url, "https://example.com/blob/main");
        assert_eq!(config.source_suffix, ".go");
    }

    #[test]
    fn test_load_broken_implicit_file_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(DEFAULT_CONFIG_FILE), "{ nope").unwrap();

        let config = load_file_config(None, temp_dir.path()).unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.json");
        let result = load_file_config(Some(&missing), temp_dir.path());
        assert!(matches!(result, Err(FilterError::FileNotFound { .. })));
    }

    #[test]
    fn test_resolve_cli_url_overrides_file() {
        let file = FileConfig {
            source_url: "https://file.example".to_string(),
            ..FileConfig::default()
        };
        let filter = FilterConfig {
            result: ResultFilter::Failed,
            ..FilterConfig::default()
        };

        let from_file = Settings::resolve(&file, filter.clone(), None);
        assert_eq!(from_file.filter.source_url, "https://file.example");
        assert_eq!(from_file.filter.result, ResultFilter::Failed);

        let from_cli = Settings::resolve(&file, filter, Some("https://cli.example".to_string()));
        assert_eq!(from_cli.filter.source_url, "https://cli.example");
    }

    #[test]
    fn test_resolve_defaults() {
        let settings = Settings::resolve(&FileConfig::default(), FilterConfig::default(), None);
        assert_eq!(settings.filter.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(settings.corpus, CorpusConfig::default());
    }
}
