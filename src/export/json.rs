//! JSON exporter.

use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::write_output;
use crate::common::{Error, Result};
use crate::sketch::ValueMap;

/// Render `map` as pretty-printed JSON.
///
/// Keys keep the map's iteration order and nested values are rendered in
/// full. `indent` is the number of spaces per nesting level.
///
/// # Examples
///
/// ```rust
/// use sketchx::export::to_json_string;
/// use sketchx::sketch::{Value, ValueMap};
///
/// let mut map = ValueMap::new();
/// map.insert("app".to_string(), Value::from("Sketch"));
/// assert_eq!(to_json_string(&map, 4).unwrap(), "{\n    \"app\": \"Sketch\"\n}");
/// ```
pub fn to_json_string(map: &ValueMap, indent: usize) -> Result<String> {
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    map.serialize(&mut serializer)?;

    String::from_utf8(buf)
        .map_err(|e| Error::Serialization(format!("Invalid UTF-8 in generated JSON: {}", e)))
}

/// Render `map` as JSON and write it to `path`.
pub fn write_json(map: &ValueMap, path: &Path, indent: usize) -> Result<()> {
    let json = to_json_string(map, indent)?;
    write_output(path, &json)
}
