//! test-result-filter CLI
//!
//! Filters a JUnit report by status and tag and points every surviving test
//! at the source line that defines it.

// Exclude from coverage - CLI binary tested via integration tests
#![cfg_attr(tarpaulin, ignore)]

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::ffi::OsString;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use test_result_filter::{self, FilterConfig, OutputFormat, ResultFilter, RunOptions};

/// Long options that may also be spelled with a single dash (`-filename`)
const LONG_OPTIONS: &[&str] = &[
    "filename",
    "origin-tree-path",
    "result",
    "tag",
    "show-errors",
    "format",
    "config",
    "source-url",
];

/// Filter and annotate JUnit test results.
#[derive(Parser, Debug)]
#[command(name = "test-result-filter")]
#[command(version = test_result_filter::VERSION)]
#[command(about = "Filter JUnit test results by status and tag, and locate their source")]
#[command(after_help = "EXAMPLES:
  # Failed storage tests with their errors
  test-result-filter --filename junit.xml --origin-tree-path ~/origin \\
      --result failed --tag sig-storage --show-errors

  # Everything, as JSON
  test-result-filter -filename junit.xml -origin-tree-path ~/origin --format json
")]
struct Cli {
    /// Input JUnit XML file
    #[arg(long = "filename", value_name = "FILE")]
    filename: Option<PathBuf>,

    /// Root of the source tree to search for test names
    #[arg(long = "origin-tree-path", value_name = "DIR")]
    origin_tree_path: Option<PathBuf>,

    /// Which results to show
    #[arg(long = "result", value_enum, default_value = "all")]
    result: ResultArg,

    /// Only show tests carrying this tag, e.g. sig-storage
    #[arg(long = "tag", value_name = "TAG")]
    tag: Option<String>,

    /// Print failure output (with --result failed or all)
    #[arg(long = "show-errors")]
    show_errors: bool,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    format: OutputFormatArg,

    /// Config file (default: <origin-tree-path>/.test_result_filter.json)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base URL for source links
    #[arg(long = "source-url", value_name = "URL")]
    source_url: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ResultArg {
    All,
    Skipped,
    Failed,
    Passed,
}

impl From<ResultArg> for ResultFilter {
    fn from(arg: ResultArg) -> Self {
        match arg {
            ResultArg::All => ResultFilter::All,
            ResultArg::Skipped => ResultFilter::Skipped,
            ResultArg::Failed => ResultFilter::Failed,
            ResultArg::Passed => ResultFilter::Passed,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    Text,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Rewrite `-filename` / `-tag=x` style arguments to their `--` form
fn normalize_arg(arg: &OsString) -> Option<OsString> {
    let text = arg.to_str()?;
    let rest = text.strip_prefix('-')?;
    if rest.starts_with('-') {
        return None;
    }
    let name = rest.split('=').next().unwrap_or(rest);
    LONG_OPTIONS
        .contains(&name)
        .then(|| OsString::from(format!("-{}", text)))
}

/// Whether `arg` is an option that consumes the next argument as its value
fn takes_value(arg: &str) -> bool {
    if arg == "-c" {
        return true;
    }
    match arg.strip_prefix("--") {
        Some(name) => name != "show-errors" && LONG_OPTIONS.contains(&name),
        None => false,
    }
}

/// Normalize option names only; option values and anything after `--` pass through
fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    let mut normalized = Vec::new();
    let mut value_next = false;
    let mut passthrough = false;

    for arg in args {
        if passthrough || value_next {
            value_next = false;
            normalized.push(arg);
            continue;
        }

        let arg = normalize_arg(&arg).unwrap_or(arg);
        match arg.to_str() {
            Some("--") => passthrough = true,
            Some(text) => value_next = takes_value(text),
            None => {}
        }
        normalized.push(arg);
    }

    normalized
}

fn main() {
    // Piping into head/less must end quietly, not with a broken-pipe error
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }

    let cli = match Cli::try_parse_from(normalize_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            e.print().ok();
            std::process::exit(1);
        }
        // --help / --version
        Err(e) => e.exit(),
    };

    test_result_filter::init_tracing();

    let Some(report) = cli.filename else {
        println!("missing input filename");
        std::process::exit(1);
    };

    let Some(tree_root) = cli.origin_tree_path else {
        println!("missing origin-tree-path");
        std::process::exit(1);
    };

    let options = RunOptions {
        report,
        tree_root,
        config: cli.config,
        source_url: cli.source_url,
        filter: FilterConfig {
            result: cli.result.into(),
            tag: cli.tag.filter(|t| !t.is_empty()),
            show_errors: cli.show_errors,
            ..FilterConfig::default()
        },
        format: cli.format.into(),
    };

    if let Err(e) = execute(&options) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn execute(options: &RunOptions) -> anyhow::Result<()> {
    let stdout = io::stdout();
    test_result_filter::run(options, BufWriter::new(stdout.lock()))
        .with_context(|| format!("filtering {}", options.report.display()))?;
    Ok(())
}
