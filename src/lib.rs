//! test-result-filter - JUnit result filtering and test source lookup
//!
//! Reads a JUnit XML report, splits every test name into a context label,
//! tags and a simplified name, filters the tests by status and tag, and
//! optionally points each one at the source line that defines it.
//!
//! # Architecture
//!
//! This crate follows the "Library-First" pattern:
//! - **lib.rs** (this file): Pure logic, no CLI concerns
//! - **bin/main.rs**: Thin wrapper that parses flags and calls [`run`]

pub mod core;
pub mod formats;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Once;

use tracing::info;

pub use crate::core::{
    AnnotatedRecord, DefaultWalker, FileConfig, FilterConfig, FilterError, OutputFormat,
    ReportFilter, Result, ResultFilter, SourceCorpus, SourceLocator, SourceReference, TestRecord,
    TestStatus,
};
use crate::core::{load_file_config, ResultExt, Settings};
use crate::formats::{load_report, write_json, TextWriter};

/// Library version (matches Cargo.toml)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

static TRACING_INIT: Once = Once::new();

/// Initialize tracing to stderr.
///
/// Safe to call multiple times. The filter comes from `RUST_LOG`
/// (e.g. `RUST_LOG=test_result_filter=debug`) and defaults to `warn`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .init();
    });
}

/// Everything one invocation needs, as given on the command line
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// JUnit XML report
    pub report: PathBuf,
    /// Root of the source tree searched for test names
    pub tree_root: PathBuf,
    /// Explicit config file
    pub config: Option<PathBuf>,
    /// Link base override
    pub source_url: Option<String>,
    pub filter: FilterConfig,
    pub format: OutputFormat,
}

/// Load, filter, annotate and render a report.
///
/// Returns the number of records written.
pub fn run(options: &RunOptions, out: impl Write) -> Result<usize> {
    let file_config = load_file_config(options.config.as_deref(), &options.tree_root)?;
    let settings = Settings::resolve(&file_config, options.filter.clone(), options.source_url.clone());

    let records = load_report(&options.report)?;

    let corpus = SourceCorpus::build_with(&DefaultWalker::new(), &options.tree_root, &settings.corpus)
        .context("building source corpus")?;

    let root = options.tree_root.to_string_lossy();
    let filter = ReportFilter::new(&settings.filter).with_corpus(&corpus, root);
    let annotated = filter.run(&records);

    info!(
        total = records.len(),
        selected = annotated.len(),
        "filtered report"
    );

    match options.format {
        OutputFormat::Text => {
            TextWriter::new(out, settings.filter.source_url.as_str()).write_all(&annotated)?
        }
        OutputFormat::Json => write_json(out, &filter, &annotated)?,
    }

    Ok(annotated.len())
}
