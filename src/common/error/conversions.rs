//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from
//! third-party error types to the unified Error type.

use super::types::Error;

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::ReadFailure(err.to_string())
    }
}

impl From<plist::Error> for Error {
    fn from(err: plist::Error) -> Self {
        Error::DecodeFailure(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        // serde_json reports writer failures as IO-category errors
        if err.is_io() {
            Error::Io(err.into())
        } else {
            Error::Serialization(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rusqlite_error_is_read_failure() {
        let err: Error = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, Error::ReadFailure(_)));
        assert!(err.is_file_level());
    }

    #[test]
    fn test_plist_error_is_decode_failure() {
        let err: Error = plist::Value::from_reader(std::io::Cursor::new(b"bplist00".to_vec()))
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::DecodeFailure(_)));
        assert!(!err.is_file_level());
    }
}
