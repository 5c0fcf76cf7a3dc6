//! Structured-Object Decoder.
//!
//! Payload entries such as `main` and `UIMetadata` hold keyed archives
//! serialized as binary property lists (`bplist00`). Parsing is delegated to
//! the `plist` crate; this module only checks the magic and maps the decoded
//! tree onto [`Value`].

use std::io::Cursor;
use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};

use super::value::{Value, ValueMap};
use crate::common::{Error, Result};

/// Leading bytes of a binary property list.
pub const BPLIST_MAGIC: &[u8; 6] = b"bplist";

/// Check whether `bytes` starts like a binary property list.
#[inline]
pub fn is_binary_plist(bytes: &[u8]) -> bool {
    bytes.starts_with(BPLIST_MAGIC)
}

/// Decode a binary property list blob into a [`Value`] tree.
///
/// # Errors
///
/// Returns [`Error::DecodeFailure`] when the magic is missing or the
/// archive is malformed (truncated trailer, unknown object marker, offsets
/// out of range).
///
/// # Examples
///
/// ```rust
/// use sketchx::sketch::archive::decode;
///
/// assert!(decode(b"not a plist").is_err());
/// ```
pub fn decode(blob: &[u8]) -> Result<Value> {
    if !is_binary_plist(blob) {
        return Err(Error::DecodeFailure(
            "missing binary property list magic".to_string(),
        ));
    }

    let plist = plist::Value::from_reader(Cursor::new(blob))?;
    Ok(convert_plist_value(plist))
}

/// Convert a decoded plist value into the generic value domain.
pub fn convert_plist_value(value: plist::Value) -> Value {
    match value {
        plist::Value::String(s) => Value::String(s),
        plist::Value::Integer(i) => convert_integer(i),
        plist::Value::Real(r) => Value::Real(r),
        plist::Value::Boolean(b) => Value::Boolean(b),
        plist::Value::Date(d) => {
            let time: SystemTime = d.into();
            let time: DateTime<Utc> = time.into();
            Value::String(time.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        },
        plist::Value::Data(bytes) => Value::Data(bytes),
        plist::Value::Array(items) => {
            Value::Array(items.into_iter().map(convert_plist_value).collect())
        },
        plist::Value::Dictionary(dict) => {
            let mut map = ValueMap::with_capacity(dict.len());
            for (key, val) in dict {
                map.insert(key, convert_plist_value(val));
            }
            Value::Dictionary(map)
        },
        // Keyed archivers reference objects by UID
        plist::Value::Uid(uid) => Value::Integer(i128::from(uid.get())),
        _ => Value::Null,
    }
}

fn convert_integer(i: plist::Integer) -> Value {
    match (i.as_signed(), i.as_unsigned()) {
        (Some(signed), _) => Value::Integer(i128::from(signed)),
        (None, Some(unsigned)) => Value::Integer(i128::from(unsigned)),
        (None, None) => Value::Null,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Encode a plist value with the crate's binary writer.
    pub(crate) fn encode_binary(value: &plist::Value) -> Vec<u8> {
        let mut buf = Vec::new();
        value.to_writer_binary(&mut buf).unwrap();
        buf
    }

    pub(crate) fn sample_document() -> plist::Value {
        let mut dict = plist::Dictionary::new();
        dict.insert("name".to_string(), plist::Value::String("Page 1".to_string()));
        dict.insert("version".to_string(), plist::Value::Integer(88i64.into()));
        dict.insert("visible".to_string(), plist::Value::Boolean(true));
        dict.insert(
            "layers".to_string(),
            plist::Value::Array(vec![
                plist::Value::String("Artboard".to_string()),
                plist::Value::Integer(2i64.into()),
            ]),
        );
        plist::Value::Dictionary(dict)
    }

    #[test]
    fn test_decode_round_trip() {
        let blob = encode_binary(&sample_document());
        let decoded = decode(&blob).unwrap();

        let mut expected = ValueMap::new();
        expected.insert("name".to_string(), Value::from("Page 1"));
        expected.insert("version".to_string(), Value::Integer(88));
        expected.insert("visible".to_string(), Value::Boolean(true));
        expected.insert(
            "layers".to_string(),
            Value::Array(vec![Value::from("Artboard"), Value::Integer(2)]),
        );
        assert_eq!(decoded, Value::Dictionary(expected));
    }

    #[test]
    fn test_decode_preserves_key_order() {
        let blob = encode_binary(&sample_document());
        let Value::Dictionary(map) = decode(&blob).unwrap() else {
            panic!("expected dictionary");
        };
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "version", "visible", "layers"]);
    }

    #[test]
    fn test_decode_scalars_and_data() {
        let value = plist::Value::Array(vec![
            plist::Value::Real(2.5),
            plist::Value::Data(vec![0xDE, 0xAD]),
            plist::Value::Integer(u64::MAX.into()),
            plist::Value::Integer((-12i64).into()),
            plist::Value::Uid(plist::Uid::new(5)),
        ]);
        let decoded = decode(&encode_binary(&value)).unwrap();
        assert_eq!(
            decoded,
            Value::Array(vec![
                Value::Real(2.5),
                Value::Data(vec![0xDE, 0xAD]),
                Value::Integer(i128::from(u64::MAX)),
                Value::Integer(-12),
                Value::Integer(5),
            ])
        );
    }

    #[test]
    fn test_decode_date_as_rfc3339() {
        let date = plist::Date::from(SystemTime::UNIX_EPOCH);
        let decoded = decode(&encode_binary(&plist::Value::Date(date))).unwrap();
        assert_eq!(decoded, Value::from("1970-01-01T00:00:00Z"));
    }

    #[test]
    fn test_decode_rejects_missing_magic() {
        let err = decode(b"<?xml version=\"1.0\"?><plist/>").unwrap_err();
        assert!(matches!(err, Error::DecodeFailure(_)));
    }

    #[test]
    fn test_decode_rejects_truncated_archive() {
        let blob = encode_binary(&sample_document());
        let truncated = &blob[..blob.len() - 10];
        assert!(matches!(decode(truncated), Err(Error::DecodeFailure(_))));
    }

    #[test]
    fn test_decode_rejects_magic_only() {
        assert!(matches!(decode(b"bplist00"), Err(Error::DecodeFailure(_))));
    }
}
