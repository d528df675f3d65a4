//! Input and output formats
//!
//! The JUnit reader turns a report into records; the text and JSON writers
//! render filtered records. Writers use the `std::io::Write` trait.

pub mod junit;
pub mod text;
pub mod json;

pub use junit::{load_report, parse_report};
pub use text::TextWriter;
pub use json::{write_json, JsonRecord};
