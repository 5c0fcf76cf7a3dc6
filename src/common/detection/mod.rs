//! Container format detection.
//!
//! Classifies a candidate file before any database handle is opened. The
//! checks run cheapest first and read at most the first 16 bytes of the file:
//! the file name extension, the ZIP local-file-header signature used by the
//! newer (unsupported) packaging, and the SQLite header string.

// Submodule declarations
pub mod functions;
pub mod types;
pub mod utils;

// Re-exports
pub use functions::{classify, classify_bytes, classify_reader, has_expected_extension};
pub use types::ContainerFormat;
