//! sketchx - Extract design metadata from legacy Sketch documents
//!
//! Legacy (pre-ZIP) Sketch documents are SQLite databases. This library
//! validates such a file, reads its `metadata` and `payload` tables, decodes
//! the archived payload entries (binary property lists) and exports both
//! tables as JSON and XML.
//!
//! # Features
//!
//! - **Format sniffing**: tells SQLite containers from ZIP-packaged documents
//!   by their signature, reading at most 16 bytes
//! - **Table reading**: read-only SQLite access, each table read independently
//! - **Archive decoding**: binary property lists mapped onto a typed value tree
//! - **Export**: full-fidelity JSON and a flat XML summary
//! - **Batch mode**: whole directories, one result per file
//!
//! # Example - Processing one file
//!
//! ```no_run
//! use sketchx::sketch::{ExtractOptions, Extractor};
//!
//! let extractor = Extractor::new(ExtractOptions::new().with_output_dir("out"));
//! let result = extractor.process("design.sketch");
//! println!("{}", result.status_message());
//! ```
//!
//! # Example - Processing a directory
//!
//! ```no_run
//! use std::path::Path;
//! use sketchx::sketch::{Extractor, process_directory};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let entries = process_directory(Path::new("designs"), &Extractor::default())?;
//! for entry in entries {
//!     println!("{}", entry);
//! }
//! # Ok(())
//! # }
//! ```

/// Shared detection, error and XML utilities
pub mod common;

/// JSON and XML exporters
pub mod export;

/// Legacy Sketch container extraction
pub mod sketch;

// Re-export commonly used types for convenience
pub use common::{ContainerFormat, Error, Result};
pub use sketch::{ExtractOptions, ExtractionResult, Extractor, Value, ValueMap};
