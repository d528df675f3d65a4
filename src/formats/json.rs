//! JSON output
//!
//! The whole result is a single array so it can be piped straight into `jq`.

use std::io::Write;

use serde::Serialize;

use crate::core::error::Result;
use crate::core::filter::{AnnotatedRecord, ReportFilter, SourceLink, SourceLookup};
use crate::core::models::TestStatus;

/// Serialized shape of one record
#[derive(Debug, Serialize)]
pub struct JsonRecord<'r> {
    pub name: &'r str,
    pub simple_name: &'r str,
    pub context: &'r str,
    pub tags: &'r [String],
    pub status: TestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classname: Option<&'r str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suite: Option<&'r str>,
    /// `null` when the lookup ran and failed; absent when no corpus was used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Option<SourceLink>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'r str>,
}

impl<'r> JsonRecord<'r> {
    pub fn new(filter: &ReportFilter<'_>, annotated: &AnnotatedRecord<'r>) -> Self {
        let record = annotated.record;
        let source = match annotated.source {
            SourceLookup::Disabled => None,
            _ => Some(filter.source_link(annotated)),
        };

        Self {
            name: &record.raw_name,
            simple_name: &record.simple_name,
            context: &record.context,
            tags: &record.tags,
            status: record.status,
            classname: record.classname.as_deref(),
            suite: record.suite.as_deref(),
            source,
            error: annotated.error_text,
        }
    }
}

/// Write annotated records as a pretty-printed JSON array
pub fn write_json<W: Write>(
    mut writer: W,
    filter: &ReportFilter<'_>,
    records: &[AnnotatedRecord<'_>],
) -> Result<()> {
    let rows: Vec<JsonRecord<'_>> = records.iter().map(|a| JsonRecord::new(filter, a)).collect();
    serde_json::to_writer_pretty(&mut writer, &rows)?;
    writeln!(writer)?;
    Ok(())
}
