//! Structured Value Tree.
//!
//! A single value domain shared by both logical tables of a container: plain
//! SQLite cells from the `metadata` table and decoded property-list archives
//! from the `payload` table both land here, so the exporters only deal with
//! one type.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Ordered mapping from entry name to value.
///
/// Iteration order is the order in which a key was first inserted; inserting
/// an existing key replaces its value in place.
pub type ValueMap = IndexMap<String, Value>;

/// A generic decoded value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    /// Integers of any width and signedness
    Integer(i128),
    Real(f64),
    String(String),
    /// Opaque bytes
    Data(Vec<u8>),
    Array(Vec<Value>),
    Dictionary(ValueMap),
}

impl Value {
    /// Text used where a value must become a single string (XML item text).
    ///
    /// Scalars render in their display form, blobs as base64 and containers
    /// as compact JSON. Containers are never expanded further.
    pub fn to_display_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Real(r) => r.to_string(),
            Value::String(s) => s.clone(),
            Value::Data(bytes) => STANDARD.encode(bytes),
            Value::Array(_) | Value::Dictionary(_) => {
                // Serializing our own Value into a String cannot fail
                serde_json::to_string(self).unwrap_or_default()
            },
        }
    }

    /// Short type name, used in log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::String(_) => "string",
            Value::Data(_) => "data",
            Value::Array(_) => "array",
            Value::Dictionary(_) => "dictionary",
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => {
                // Keep the common case on the 64-bit paths every format supports
                if let Ok(small) = i64::try_from(*i) {
                    serializer.serialize_i64(small)
                } else if let Ok(unsigned) = u64::try_from(*i) {
                    serializer.serialize_u64(unsigned)
                } else {
                    serializer.serialize_i128(*i)
                }
            },
            Value::Real(r) => serializer.serialize_f64(*r),
            Value::String(s) => serializer.serialize_str(s),
            Value::Data(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            },
            Value::Dictionary(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            },
        }
    }
}

impl From<rusqlite::types::Value> for Value {
    fn from(cell: rusqlite::types::Value) -> Self {
        use rusqlite::types::Value as Cell;

        match cell {
            Cell::Null => Value::Null,
            Cell::Integer(i) => Value::Integer(i128::from(i)),
            Cell::Real(r) => Value::Real(r),
            Cell::Text(s) => Value::String(s),
            Cell::Blob(bytes) => Value::Data(bytes),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i128::from(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

/// Collect `(name, value)` pairs into a [`ValueMap`], last write wins.
///
/// A repeated name keeps the position of its first occurrence and the value
/// of its last one.
pub fn collect_last_write_wins<I, K>(rows: I) -> ValueMap
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    let mut map = ValueMap::new();
    for (name, value) in rows {
        map.insert(name.into(), value);
    }
    map
}
