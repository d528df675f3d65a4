//! Core module for test-result-filter
//!
//! # Architecture
//!
//! - `models`: Core data structures (TestRecord, SourceReference, FileConfig)
//! - `error`: Error types using thiserror
//! - `names`: Test name decomposition (context, tags, simple name)
//! - `walker`: Directory traversal with the FileWalker trait
//! - `corpus`: In-memory source corpus
//! - `locator`: Progressive literal search for test sources
//! - `filter`: Status/tag selection and source annotation
//! - `config`: Config file loading and settings resolution

pub mod models;
pub mod error;
pub mod names;
pub mod walker;
pub mod corpus;
pub mod locator;
pub mod filter;
pub mod config;

// Re-export commonly used types
pub use models::{TestRecord, TestStatus, SourceReference, OutputFormat, FileConfig};
pub use error::{FilterError, Result, ResultExt};
pub use names::{decompose, extract_context, extract_tags, simplify, DecomposedName};
pub use walker::{FileWalker, DefaultWalker};
pub use corpus::{SourceCorpus, CorpusConfig};
pub use locator::{locate, SourceLocator};
pub use filter::{FilterConfig, ResultFilter, ReportFilter, AnnotatedRecord, SourceLookup};
pub use config::{load_file_config, Settings};
