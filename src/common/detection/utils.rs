//! Signature constants for container detection.

/// ZIP local file header.
pub const ZIP_SIGNATURE: &[u8; 4] = &[0x50, 0x4B, 0x03, 0x04];

/// SQLite 3 database header string, including its trailing NUL.
pub const SQLITE_SIGNATURE: &[u8; 16] = b"SQLite format 3\0";

/// Number of leading bytes needed to tell every format apart.
pub const HEADER_LEN: usize = SQLITE_SIGNATURE.len();
