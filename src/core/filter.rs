//! Record selection and source annotation
//!
//! [`FilterConfig`] is built once from the command line and never changes;
//! [`ReportFilter`] applies it to the loaded records and attaches source
//! references when a corpus is available.

use serde::Serialize;
use tracing::debug;

use super::corpus::SourceCorpus;
use super::error::{FilterError, Result};
use super::locator::SourceLocator;
use super::models::{SourceReference, TestRecord, DEFAULT_SOURCE_URL};

/// Which statuses survive the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultFilter {
    #[default]
    All,
    Passed,
    Failed,
    Skipped,
}

impl ResultFilter {
    /// Parse a `--result` value
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(ResultFilter::All),
            "passed" => Ok(ResultFilter::Passed),
            "failed" => Ok(ResultFilter::Failed),
            "skipped" => Ok(ResultFilter::Skipped),
            other => Err(FilterError::invalid_config(format!(
                "unknown result filter '{}' (choices: all, skipped, failed, passed)",
                other
            ))),
        }
    }

    pub fn accepts(&self, record: &TestRecord) -> bool {
        match self {
            ResultFilter::All => true,
            ResultFilter::Passed => record.is_passed(),
            ResultFilter::Failed => record.is_failed(),
            ResultFilter::Skipped => record.is_skipped(),
        }
    }

    /// Error text is only ever shown for `failed` and `all`
    pub fn allows_errors(&self) -> bool {
        matches!(self, ResultFilter::All | ResultFilter::Failed)
    }
}

/// Immutable run configuration for filtering and rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    pub result: ResultFilter,
    /// Exact-match tag predicate
    pub tag: Option<String>,
    pub show_errors: bool,
    /// Link base for source references
    pub source_url: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            result: ResultFilter::All,
            tag: None,
            show_errors: false,
            source_url: DEFAULT_SOURCE_URL.to_string(),
        }
    }
}

impl FilterConfig {
    /// Check a record against the tag and status predicates
    pub fn matches(&self, record: &TestRecord) -> bool {
        if let Some(tag) = &self.tag {
            if !record.has_tag(tag) {
                return false;
            }
        }
        self.result.accepts(record)
    }

    /// Whether an `ERROR:` block belongs in the output for `record`.
    ///
    /// Failed records always get one, even with no text; other records only
    /// when they carry error text.
    pub fn shows_error_for(&self, record: &TestRecord) -> bool {
        self.show_errors
            && self.result.allows_errors()
            && (record.is_failed() || record.error_text.is_some())
    }
}

/// Result of looking a record up in the corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLookup {
    /// No corpus was supplied
    Disabled,
    Found(SourceReference),
    NotFound,
}

/// A surviving record with its (optional) source reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedRecord<'r> {
    pub record: &'r TestRecord,
    pub source: SourceLookup,
    /// Error text to render, if enabled for this record
    pub error_text: Option<&'r str>,
}

/// Serializable form of a source reference for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct SourceLink {
    pub path: String,
    pub line: usize,
    pub url: String,
}

/// Applies a [`FilterConfig`] to records and annotates the survivors
pub struct ReportFilter<'a> {
    config: &'a FilterConfig,
    locator: Option<SourceLocator<'a>>,
}

impl<'a> ReportFilter<'a> {
    /// Filter without source annotation
    pub fn new(config: &'a FilterConfig) -> Self {
        Self {
            config,
            locator: None,
        }
    }

    /// Annotate survivors with source references from `corpus`
    pub fn with_corpus(mut self, corpus: &'a SourceCorpus, root: impl Into<String>) -> Self {
        self.locator = Some(SourceLocator::new(corpus, root));
        self
    }

    /// Records passing the tag and status predicates, in input order
    pub fn apply<'r>(&self, records: &'r [TestRecord]) -> impl Iterator<Item = &'r TestRecord> + 'r
    where
        'a: 'r,
    {
        let config: &'r FilterConfig = self.config;
        records.iter().filter(move |r| config.matches(r))
    }

    /// Attach the source lookup and error text to a surviving record
    pub fn annotate<'r>(&self, record: &'r TestRecord) -> AnnotatedRecord<'r> {
        let source = match &self.locator {
            None => SourceLookup::Disabled,
            Some(locator) => match locator.locate(&record.raw_name) {
                Some(reference) => SourceLookup::Found(reference),
                None => {
                    debug!(name = %record.raw_name, "test source not found");
                    SourceLookup::NotFound
                }
            },
        };

        let error_text = if self.config.shows_error_for(record) {
            Some(record.error_text.as_deref().unwrap_or(""))
        } else {
            None
        };

        AnnotatedRecord {
            record,
            source,
            error_text,
        }
    }

    /// Filter then annotate, in input order
    pub fn run<'r>(&self, records: &'r [TestRecord]) -> Vec<AnnotatedRecord<'r>>
    where
        'a: 'r,
    {
        self.apply(records).map(|r| self.annotate(r)).collect()
    }

    /// JSON-friendly source link for an annotated record
    pub fn source_link(&self, annotated: &AnnotatedRecord<'_>) -> Option<SourceLink> {
        match &annotated.source {
            SourceLookup::Found(reference) => Some(SourceLink {
                path: reference.relative_path.clone(),
                line: reference.line_number,
                url: reference.link(&self.config.source_url),
            }),
            _ => None,
        }
    }
}
