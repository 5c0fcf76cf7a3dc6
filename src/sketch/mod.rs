//! Legacy Sketch document support.
//!
//! Sketch documents saved before version 43 are SQLite databases with two
//! key/value tables:
//!
//! - `metadata(name, value)`: plain document properties
//! - `payload(name, value)`: blobs, some of which (`main`, `UIMetadata`) are
//!   keyed archives serialized as binary property lists
//!
//! Newer documents are ZIP packages and are rejected rather than unpacked.
//!
//! # Example
//!
//! ```rust,no_run
//! use sketchx::sketch::{ExtractOptions, Extractor};
//!
//! let extractor = Extractor::new(ExtractOptions::default());
//! let extraction = extractor.extract("design.sketch")?;
//! for (name, value) in &extraction.metadata {
//!     println!("{name} = {}", value.to_display_text());
//! }
//! # Ok::<(), sketchx::Error>(())
//! ```

pub mod archive;
pub mod batch;
pub mod config;
pub mod extract;
pub mod tables;
pub mod value;

pub use batch::{BatchEntry, process_directory};
pub use config::ExtractOptions;
pub use extract::{
    EmptyTables, Extraction, ExtractionResult, ExtractionSummary, Extractor, OutputKind,
    OutputLedger, RejectReason,
};
pub use tables::{Row, Table, TableRows, read_tables};
pub use value::{Value, ValueMap};
