//! In-memory source corpus
//!
//! Every eligible source file below a root directory is read once into a
//! path-keyed map. Lookups never touch the filesystem again.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};

use super::error::{Result, ResultExt};
use super::models::{FileConfig, DEFAULT_EXCLUDE_MARKER, DEFAULT_SOURCE_SUFFIX};
use super::walker::{normalize_path_separators, DefaultWalker, FileWalker};

/// Which files end up in the corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusConfig {
    /// Required path suffix
    pub suffix: String,
    /// A path containing any of these is skipped (generated code)
    pub exclude_markers: Vec<String>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SOURCE_SUFFIX.to_string(),
            exclude_markers: vec![DEFAULT_EXCLUDE_MARKER.to_string()],
        }
    }
}

impl From<&FileConfig> for CorpusConfig {
    fn from(config: &FileConfig) -> Self {
        Self {
            suffix: config.source_suffix.clone(),
            exclude_markers: config.exclude_markers.clone(),
        }
    }
}

impl CorpusConfig {
    /// Check a (normalized) path against the inclusion policy
    pub fn includes(&self, path: &str) -> bool {
        path.ends_with(&self.suffix)
            && !self
                .exclude_markers
                .iter()
                .any(|marker| path.contains(marker.as_str()))
    }
}

/// Immutable mapping from file path to file content
#[derive(Debug, Clone, Default)]
pub struct SourceCorpus {
    files: BTreeMap<String, String>,
}

impl SourceCorpus {
    /// Build the corpus from `root` with the default policy
    pub fn build(root: &Path) -> Result<Self> {
        Self::build_with(&DefaultWalker::new(), root, &CorpusConfig::default())
    }

    /// Build the corpus from `root` using a custom walker and policy
    pub fn build_with(walker: &dyn FileWalker, root: &Path, config: &CorpusConfig) -> Result<Self> {
        let mut files = BTreeMap::new();
        let mut skipped = 0usize;

        let paths = walker
            .walk(root)
            .context(format!("scanning {}", root.display()))?;

        for path in paths {
            let key = normalize_path_separators(&path.to_string_lossy());
            if !config.includes(&key) {
                skipped += 1;
                continue;
            }

            let content = walker
                .read(&path)
                .context(format!("reading {}", path.display()))?;
            files.insert(key, content);
        }

        info!(
            root = %root.display(),
            files = files.len(),
            skipped,
            "built source corpus"
        );

        Ok(Self { files })
    }

    /// Build a corpus directly from path/content pairs
    pub fn from_files<I, P, C>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        let files = files
            .into_iter()
            .map(|(path, content)| (path.into(), content.into()))
            .collect::<BTreeMap<_, _>>();
        debug!(files = files.len(), "corpus created from memory");
        Self { files }
    }

    /// Iterate entries in path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    /// Content of a single file, if present
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
