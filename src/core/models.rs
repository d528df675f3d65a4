//! Core data models for test-result-filter
//!
//! This module contains the fundamental data structures used throughout the filter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use super::error::{FilterError, Result, ResultExt};
use super::names::decompose;

/// Default link base for source references
pub const DEFAULT_SOURCE_URL: &str = "https://github.com/openshift/origin/blob/master";

/// Default suffix of files eligible for the source corpus
pub const DEFAULT_SOURCE_SUFFIX: &str = ".go";

/// Default path marker of machine-generated files
pub const DEFAULT_EXCLUDE_MARKER: &str = "zz_generated";

/// Config file looked up in the source tree root when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = ".test_result_filter.json";

/// Outcome of a single test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
    /// Anything else the report can express (e.g. `<error>`)
    Other,
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Passed => write!(f, "passed"),
            TestStatus::Failed => write!(f, "failed"),
            TestStatus::Skipped => write!(f, "skipped"),
            TestStatus::Other => write!(f, "other"),
        }
    }
}

/// A single test case from the report, with its name decomposed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRecord {
    /// Name as it appears in the report
    pub raw_name: String,
    /// Name without context and tags
    pub simple_name: String,
    /// Leading bracketed label, or empty
    pub context: String,
    /// Every bracketed label, in order of appearance
    pub tags: Vec<String>,
    pub status: TestStatus,
    /// Failure or error body, if any
    pub error_text: Option<String>,
    pub classname: Option<String>,
    /// Name of the innermost enclosing `<testsuite>`
    pub suite: Option<String>,
}

impl TestRecord {
    /// Create a new TestRecord, decomposing the raw name
    pub fn new(raw_name: impl Into<String>, status: TestStatus) -> Self {
        let raw_name = raw_name.into();
        let parts = decompose(&raw_name);
        Self {
            raw_name,
            simple_name: parts.simple_name,
            context: parts.context,
            tags: parts.tags,
            status,
            error_text: None,
            classname: None,
            suite: None,
        }
    }

    /// Attach failure or error text
    pub fn with_error_text(mut self, text: impl Into<String>) -> Self {
        self.error_text = Some(text.into());
        self
    }

    /// Attach the JUnit classname
    pub fn with_classname(mut self, classname: impl Into<String>) -> Self {
        self.classname = Some(classname.into());
        self
    }

    /// Attach the enclosing suite name
    pub fn with_suite(mut self, suite: impl Into<String>) -> Self {
        self.suite = Some(suite.into());
        self
    }

    /// Check whether `tag` is one of this record's tags (exact match)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_passed(&self) -> bool {
        self.status == TestStatus::Passed
    }

    pub fn is_failed(&self) -> bool {
        self.status == TestStatus::Failed
    }

    pub fn is_skipped(&self) -> bool {
        self.status == TestStatus::Skipped
    }
}

/// Where a test's name was found in the source corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReference {
    /// Path below the corpus root, always starting with `/`
    pub relative_path: String,
    /// 1-based line number of the match
    pub line_number: usize,
}

impl SourceReference {
    /// Link to the referenced line under `base_url`
    pub fn link(&self, base_url: &str) -> String {
        format!(
            "{}{}#L{}",
            base_url.trim_end_matches('/'),
            self.relative_path,
            self.line_number
        )
    }

    /// Human-readable line used by the text output
    pub fn pretty_string(&self, base_url: &str) -> String {
        format!("Test source code location: {}", self.link(base_url))
    }
}

/// Output format of the rendered report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Line-oriented text (default)
    #[default]
    Text,
    /// One JSON array of annotated records
    Json,
}

/// Configuration loaded from .test_result_filter.json
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct FileConfig {
    /// Suffix of files eligible for the source corpus
    #[serde(default = "default_source_suffix")]
    pub source_suffix: String,
    /// Path substrings excluding a file from the corpus
    #[serde(default = "default_exclude_markers")]
    pub exclude_markers: Vec<String>,
    /// Link base for source references
    #[serde(default = "default_source_url")]
    pub source_url: String,
}

fn default_source_suffix() -> String {
    DEFAULT_SOURCE_SUFFIX.to_string()
}

fn default_exclude_markers() -> Vec<String> {
    vec![DEFAULT_EXCLUDE_MARKER.to_string()]
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            source_suffix: default_source_suffix(),
            exclude_markers: default_exclude_markers(),
            source_url: default_source_url(),
        }
    }
}

impl FileConfig {
    /// Load a config file from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(FilterError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let json = std::fs::read_to_string(path)?;
        let config: FileConfig = serde_json::from_str(&json)
            .map_err(FilterError::from)
            .context(format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the corpus meaningless
    pub fn validate(&self) -> Result<()> {
        if self.source_suffix.is_empty() {
            return Err(FilterError::invalid_config("source_suffix must not be empty"));
        }
        if self.exclude_markers.iter().any(|m| m.is_empty()) {
            return Err(FilterError::invalid_config(
                "exclude_markers must not contain empty strings",
            ));
        }
        Ok(())
    }
}
