//! Line-oriented text output
//!
//! One block per record, terminated by a `-` separator line:
//!
//! ```text
//! does a thing
//! context: sig-storage
//! tags:
//!  - sig-storage
//!  - Feature:X
//! Test source code location: https://github.com/openshift/origin/blob/master/test/e2e.go#L12
//! -
//! ```

use std::io::{self, Write};

use crate::core::filter::{AnnotatedRecord, SourceLookup};

/// Writes annotated records as plain text
pub struct TextWriter<W: Write> {
    writer: W,
    source_url: String,
}

impl<W: Write> TextWriter<W> {
    /// Create a writer linking source references under `source_url`
    pub fn new(writer: W, source_url: impl Into<String>) -> Self {
        Self {
            writer,
            source_url: source_url.into(),
        }
    }

    /// Write a single record block
    pub fn write_record(&mut self, annotated: &AnnotatedRecord<'_>) -> io::Result<()> {
        let record = annotated.record;
        let w = &mut self.writer;

        writeln!(w, "{}", record.simple_name)?;
        writeln!(w, "context: {}", record.context)?;

        if !record.tags.is_empty() {
            writeln!(w, "tags:")?;
            for tag in &record.tags {
                writeln!(w, " - {}", tag)?;
            }
        }

        match &annotated.source {
            SourceLookup::Disabled => {}
            SourceLookup::Found(reference) => {
                writeln!(w, "{}", reference.pretty_string(&self.source_url))?
            }
            SourceLookup::NotFound => writeln!(w, "Source not found")?,
        }

        if let Some(error) = annotated.error_text {
            writeln!(w, "ERROR:")?;
            writeln!(w, "{}", error)?;
        }

        writeln!(w, "-")
    }

    /// Write every record, in order
    pub fn write_all(&mut self, records: &[AnnotatedRecord<'_>]) -> io::Result<()> {
        for annotated in records {
            self.write_record(annotated)?;
        }
        self.writer.flush()
    }

    /// Consume the writer, returning the underlying sink
    pub fn into_inner(self) -> W {
        self.writer
    }
}
