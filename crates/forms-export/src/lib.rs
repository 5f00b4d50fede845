//! Export projections over completed submissions.
//!
//! Rendering goes through each element type's `format_export`; this crate
//! only shapes tables and objects and writes them to whatever `io::Write`
//! the caller supplies.

pub mod error;
pub mod exporter;
pub mod json;

pub use error::ExportError;
pub use exporter::Exporter;
pub use json::{to_json, write_json};
