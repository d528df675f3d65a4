//! JUnit XML report reader
//!
//! Streams the report with quick-xml and produces one [`TestRecord`] per
//! `<testcase>`. Accepts both a `<testsuites>` root and a bare `<testsuite>`
//! root; suites may nest.

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, info};

use crate::core::error::{FilterError, Result, ResultExt};
use crate::core::models::{TestRecord, TestStatus};

static TESTSUITES_TAG: &[u8] = b"testsuites";
static TESTSUITE_TAG: &[u8] = b"testsuite";
static TESTCASE_TAG: &[u8] = b"testcase";
static FAILURE_TAG: &[u8] = b"failure";
static ERROR_TAG: &[u8] = b"error";
static SKIPPED_TAG: &[u8] = b"skipped";

/// Child element of a testcase that decides its status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Failure,
    Error,
    Skipped,
}

impl Outcome {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            t if t == FAILURE_TAG => Some(Outcome::Failure),
            t if t == ERROR_TAG => Some(Outcome::Error),
            t if t == SKIPPED_TAG => Some(Outcome::Skipped),
            _ => None,
        }
    }
}

/// A `<testcase>` whose end tag has not been seen yet
#[derive(Debug, Default)]
struct PendingCase {
    name: String,
    classname: Option<String>,
    suite: Option<String>,
    failed: bool,
    errored: bool,
    skipped: bool,
    message: Option<String>,
    body: String,
}

impl PendingCase {
    fn from_start(start: &BytesStart<'_>, suite: Option<&String>) -> Result<Self> {
        let name = attribute(start, b"name")?.ok_or_else(|| {
            FilterError::invalid_report("<testcase> is missing the name attribute")
        })?;
        Ok(Self {
            name,
            classname: attribute(start, b"classname")?,
            suite: suite.cloned(),
            ..Self::default()
        })
    }

    fn begin_outcome(&mut self, outcome: Outcome, start: &BytesStart<'_>) -> Result<()> {
        match outcome {
            Outcome::Failure => self.failed = true,
            Outcome::Error => self.errored = true,
            Outcome::Skipped => {
                self.skipped = true;
                return Ok(());
            }
        }
        if self.message.is_none() {
            self.message = attribute(start, b"message")?;
        }
        Ok(())
    }

    fn status(&self) -> TestStatus {
        if self.failed {
            TestStatus::Failed
        } else if self.errored {
            TestStatus::Other
        } else if self.skipped {
            TestStatus::Skipped
        } else {
            TestStatus::Passed
        }
    }

    fn finish(self) -> TestRecord {
        let status = self.status();
        let mut record = TestRecord::new(self.name, status);

        if self.failed || self.errored {
            let text = if self.body.is_empty() {
                self.message
            } else {
                Some(self.body)
            };
            if let Some(text) = text {
                record = record.with_error_text(text);
            }
        }
        if let Some(classname) = self.classname {
            record = record.with_classname(classname);
        }
        if let Some(suite) = self.suite {
            record = record.with_suite(suite);
        }
        record
    }
}

/// Read an attribute value, unescaped
fn attribute(start: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Parse a JUnit XML document into test records, in document order
pub fn parse_report(xml: &str) -> Result<Vec<TestRecord>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut records = Vec::new();
    let mut suites: Vec<String> = Vec::new();
    let mut current: Option<PendingCase> = None;
    // Whether text currently belongs to a <failure>/<error> body
    let mut capturing = false;
    let mut saw_root = false;

    loop {
        let event = reader.read_event()?;
        let (start, is_empty) = match &event {
            Event::Start(e) => (Some(e), false),
            Event::Empty(e) => (Some(e), true),
            _ => (None, false),
        };

        if let Some(start) = start {
            let tag = start.name();
            let tag = tag.as_ref();

            if !saw_root {
                if tag != TESTSUITES_TAG && tag != TESTSUITE_TAG {
                    return Err(FilterError::invalid_report(format!(
                        "unexpected root element <{}>",
                        String::from_utf8_lossy(tag)
                    )));
                }
                saw_root = true;
            }

            if tag == TESTSUITE_TAG {
                if !is_empty {
                    suites.push(attribute(start, b"name")?.unwrap_or_default());
                }
            } else if tag == TESTCASE_TAG {
                let case = PendingCase::from_start(start, suites.last())?;
                if is_empty {
                    records.push(case.finish());
                } else {
                    current = Some(case);
                }
            } else if let (Some(case), Some(outcome)) = (current.as_mut(), Outcome::from_tag(tag)) {
                case.begin_outcome(outcome, start)?;
                capturing = !is_empty && outcome != Outcome::Skipped;
            }
            continue;
        }

        match event {
            Event::Text(text) if capturing => {
                if let Some(case) = current.as_mut() {
                    case.body.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) if capturing => {
                if let Some(case) = current.as_mut() {
                    case.body.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(end) => {
                let tag = end.name();
                let tag = tag.as_ref();
                if tag == TESTSUITE_TAG {
                    suites.pop();
                } else if tag == TESTCASE_TAG {
                    if let Some(case) = current.take() {
                        records.push(case.finish());
                    }
                } else if Outcome::from_tag(tag).is_some() {
                    capturing = false;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(FilterError::invalid_report("document has no root element"));
    }

    debug!(records = records.len(), "parsed junit report");
    Ok(records)
}

/// Read and parse a JUnit XML file
pub fn load_report(path: &Path) -> Result<Vec<TestRecord>> {
    if !path.is_file() {
        return Err(FilterError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let xml = std::fs::read_to_string(path)?;
    let records = parse_report(&xml).context(format!("parsing {}", path.display()))?;

    info!(path = %path.display(), records = records.len(), "loaded report");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites>
    <testsuite name="openshift-tests" tests="4" failures="1">
        <testcase name="[sig-storage] [Feature:X] does a thing" classname="storage" time="1.5"/>
        <testcase name="[sig-apps] deploys an app" time="2">
            <failure message="timed out">expected 1 replica &amp; got 0</failure>
            <system-out>noise</system-out>
        </testcase>
        <testcase name="[sig-node] skipped one">
            <skipped message="not supported"/>
        </testcase>
        <testcase name="errored one">
            <error message="panic"><![CDATA[goroutine 1 <running>]]></error>
        </testcase>
    </testsuite>
</testsuites>
"#;

    #[test]
    fn test_parse_report_statuses() {
        let records = parse_report(REPORT).unwrap();
        let statuses: Vec<TestStatus> = records.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                TestStatus::Passed,
                TestStatus::Failed,
                TestStatus::Skipped,
                TestStatus::Other
            ]
        );
    }

    #[test]
    fn test_parse_report_decomposes_names() {
        let records = parse_report(REPORT).unwrap();
        assert_eq!(records[0].raw_name, "[sig-storage] [Feature:X] does a thing");
        assert_eq!(records[0].context, "sig-storage");
        assert_eq!(records[0].tags, vec!["sig-storage", "Feature:X"]);
        assert_eq!(records[0].simple_name, "does a thing");
        assert_eq!(records[0].classname.as_deref(), Some("storage"));
        assert_eq!(records[0].suite.as_deref(), Some("openshift-tests"));
    }

    #[test]
    fn test_parse_report_error_text() {
        let records = parse_report(REPORT).unwrap();
        assert_eq!(records[0].error_text, None);
        assert_eq!(records[1].error_text.as_deref(), Some("expected 1 replica & got 0"));
        assert_eq!(records[2].error_text, None);
        assert_eq!(records[3].error_text.as_deref(), Some("goroutine 1 <running>"));
    }

    #[test]
    fn test_parse_report_falls_back_to_message() {
        let xml = r#"<testsuite name="s"><testcase name="t"><failure message="boom"/></testcase></testsuite>"#;
        let records = parse_report(xml).unwrap();
        assert_eq!(records[0].status, TestStatus::Failed);
        assert_eq!(records[0].error_text.as_deref(), Some("boom"));
    }

    #[test]
    fn test_parse_report_bare_and_nested_suites() {
        let xml = r#"<testsuite name="outer">
            <testsuite name="inner"><testcase name="a"/></testsuite>
            <testcase name="b"/>
        </testsuite>"#;
        let records = parse_report(xml).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].suite.as_deref(), Some("inner"));
        assert_eq!(records[1].suite.as_deref(), Some("outer"));
    }

    #[test]
    fn test_parse_report_rejects_foreign_root() {
        let err = parse_report("<html><body/></html>").unwrap_err();
        assert!(matches!(err, FilterError::InvalidReport { .. }));
    }

    #[test]
    fn test_parse_report_rejects_empty_document() {
        let err = parse_report("").unwrap_err();
        assert!(matches!(err, FilterError::InvalidReport { .. }));
    }

    #[test]
    fn test_parse_report_rejects_malformed_xml() {
        let err = parse_report("<testsuites><testsuite></testsuites>").unwrap_err();
        assert!(matches!(err, FilterError::Xml(_)));
    }

    #[test]
    fn test_parse_report_requires_testcase_name() {
        let err = parse_report(r#"<testsuite><testcase classname="x"/></testsuite>"#).unwrap_err();
        assert!(err.to_string().contains("name attribute"));
    }

    #[test]
    fn test_load_report_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("junit.xml");
        std::fs::write(&path, REPORT).unwrap();

        let records = load_report(&path).unwrap();
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn test_load_report_missing_file() {
        let err = load_report(Path::new("/nonexistent/junit.xml")).unwrap_err();
        assert!(matches!(err, FilterError::FileNotFound { .. }));
    }
}
