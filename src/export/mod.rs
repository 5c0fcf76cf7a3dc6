//! Exporters for extracted tables.
//!
//! Both exporters take the same [`ValueMap`](crate::sketch::ValueMap) but
//! give different structural guarantees:
//!
//! - **JSON** renders the full value tree and is the format of record.
//! - **XML** is a flat summary: one `<item name="...">` per top-level key
//!   whose text is the value's string form. Nested arrays and dictionaries
//!   are stringified, never expanded into child elements.
//!
//! Writers report failures per output file so that one failed write does
//! not stop the others from being attempted.

pub mod json;
pub mod xml;

use std::fs;
use std::path::Path;

use crate::common::{Error, Result};

pub use json::{to_json_string, write_json};
pub use xml::{to_xml_string, write_xml};

/// Write rendered output to `path`, mapping any failure to
/// [`Error::WriteFailure`] for that path.
pub(crate) fn write_output(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| Error::WriteFailure {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
