//! Source location lookup for test names
//!
//! Test names are often a stable literal from the test source followed by
//! generated or parameterized words. The locator searches the corpus for the
//! full name first and then for ever shorter word prefixes, so the longest
//! prefix present in any file wins.
//!
//! # Example
//! ```
//! use test_result_filter::core::{SourceCorpus, SourceLocator};
//!
//! let corpus = SourceCorpus::from_files([(
//!     "/origin/test/e2e.go",
//!     "package e2e\n\ng.It(\"should mount a volume\", func() {\n",
//! )]);
//! let locator = SourceLocator::new(&corpus, "/origin");
//! let found = locator.locate("should mount a volume [Serial]").unwrap();
//! assert_eq!(found.relative_path, "/test/e2e.go");
//! assert_eq!(found.line_number, 3);
//! ```

use tracing::{debug, trace};

use super::corpus::SourceCorpus;
use super::models::SourceReference;
use super::walker::normalize_path_separators;

/// A literal hit inside one corpus entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusMatch<'a> {
    /// Full corpus path of the entry
    pub path: &'a str,
    /// 1-based line number of the match start
    pub line_number: usize,
}

/// Find the first corpus entry (in path order) containing `needle`.
///
/// Plain substring search; `needle` is never interpreted as a pattern.
pub fn find_in_corpus<'a>(corpus: &'a SourceCorpus, needle: &str) -> Option<CorpusMatch<'a>> {
    corpus.iter().find_map(|(path, content)| {
        content.find(needle).map(|offset| CorpusMatch {
            path,
            line_number: line_number_at(content, offset),
        })
    })
}

/// 1-based line number of byte `offset` in `content`
pub fn line_number_at(content: &str, offset: usize) -> usize {
    content.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

/// Candidate search strings for a name, longest first.
///
/// The name is split on whitespace and re-joined with single spaces. The
/// empty prefix is not a candidate.
pub fn candidates(raw_name: &str) -> Vec<String> {
    let words: Vec<&str> = raw_name.split_whitespace().collect();
    (1..=words.len())
        .rev()
        .map(|i| words[..i].join(" "))
        .collect()
}

/// Strip `root` from a corpus path, yielding a `/`-prefixed relative path
pub fn relativize(path: &str, root: &str) -> String {
    let root = normalize_path_separators(root);
    let root = root.trim_end_matches('/');
    let relative = path.strip_prefix(root).unwrap_or(path);
    format!("/{}", relative.trim_start_matches('/'))
}

/// Resolves test names to source references against a prebuilt corpus
pub struct SourceLocator<'a> {
    corpus: &'a SourceCorpus,
    root: String,
}

impl<'a> SourceLocator<'a> {
    /// Create a locator over `corpus`, whose paths are rooted at `root`
    pub fn new(corpus: &'a SourceCorpus, root: impl Into<String>) -> Self {
        Self {
            corpus,
            root: root.into(),
        }
    }

    /// Locate `raw_name` in the corpus.
    ///
    /// Returns `None` when no non-empty prefix of the name occurs in any file.
    pub fn locate(&self, raw_name: &str) -> Option<SourceReference> {
        for candidate in candidates(raw_name) {
            trace!(candidate = %candidate, "trying candidate");

            if let Some(hit) = find_in_corpus(self.corpus, &candidate) {
                debug!(
                    name = raw_name,
                    matched = %candidate,
                    path = hit.path,
                    line = hit.line_number,
                    "located test source"
                );
                return Some(SourceReference {
                    relative_path: relativize(hit.path, &self.root),
                    line_number: hit.line_number,
                });
            }
        }

        None
    }
}

/// Convenience wrapper over [`SourceLocator::locate`]
pub fn locate(raw_name: &str, corpus: &SourceCorpus, root: &str) -> Option<SourceReference> {
    SourceLocator::new(corpus, root).locate(raw_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> SourceCorpus {
        SourceCorpus::from_files([
            (
                "/origin/test/extended/storage.go",
                "package storage\nline2\nfoo bar baz\nmore\n",
            ),
            (
                "/origin/test/extended/apps.go",
                "package apps\n\n\tg.It(\"deploys [Slow] an app\", func() {\n",
            ),
        ])
    }

    #[test]
    fn test_line_number_at() {
        let content = "line1\nline2\nfoo bar baz\n";
        assert_eq!(line_number_at(content, 0), 1);
        assert_eq!(line_number_at(content, content.find("line2").unwrap()), 2);
        assert_eq!(line_number_at(content, content.find("foo").unwrap()), 3);
    }

    #[test]
    fn test_candidates_longest_first() {
        assert_eq!(
            candidates("foo  bar\tbaz"),
            vec!["foo bar baz", "foo bar", "foo"]
        );
        assert!(candidates("   ").is_empty());
    }

    #[test]
    fn test_relativize() {
        assert_eq!(relativize("/origin/test/a.go", "/origin"), "/test/a.go");
        assert_eq!(relativize("/origin/test/a.go", "/origin/"), "/test/a.go");
        assert_eq!(relativize("/elsewhere/a.go", "/origin"), "/elsewhere/a.go");
    }

    #[test]
    fn test_locate_exact_line() {
        let found = locate("foo bar baz", &corpus(), "/origin").unwrap();
        assert_eq!(found.relative_path, "/test/extended/storage.go");
        assert_eq!(found.line_number, 3);
    }

    #[test]
    fn test_locate_truncates_generated_suffix() {
        let found = locate("foo bar qux quux", &corpus(), "/origin").unwrap();
        assert_eq!(found.relative_path, "/test/extended/storage.go");
        assert_eq!(found.line_number, 3);
    }

    #[test]
    fn test_locate_prefers_longest_prefix() {
        // "package" alone matches both files; the longer prefix only matches apps.go
        let found = locate("package apps extra words", &corpus(), "/origin").unwrap();
        assert_eq!(found.relative_path, "/test/extended/apps.go");
        assert_eq!(found.line_number, 1);
    }

    #[test]
    fn test_locate_tie_breaks_on_path_order() {
        let found = locate("package", &corpus(), "/origin").unwrap();
        assert_eq!(found.relative_path, "/test/extended/apps.go");
    }

    #[test]
    fn test_locate_brackets_are_literal() {
        let found = locate("deploys [Slow] an app", &corpus(), "/origin").unwrap();
        assert_eq!(found.relative_path, "/test/extended/apps.go");
        assert_eq!(found.line_number, 3);
    }

    #[test]
    fn test_locate_not_found() {
        assert_eq!(locate("nothing matches here", &corpus(), "/origin"), None);
    }

    #[test]
    fn test_locate_empty_name_not_found() {
        assert_eq!(locate("", &corpus(), "/origin"), None);
    }

    #[test]
    fn test_locate_empty_corpus() {
        assert_eq!(locate("foo", &SourceCorpus::default(), "/origin"), None);
    }
}
