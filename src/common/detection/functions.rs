//! Core container detection functions.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use super::types::ContainerFormat;
use super::utils::{HEADER_LEN, SQLITE_SIGNATURE, ZIP_SIGNATURE};
use crate::common::Result;

/// Check whether the file name of `path` ends with `.{extension}`
/// (case-sensitive, `extension` given without the dot).
///
/// A bare `.sketch` file name matches, as does any other name ending in the
/// suffix.
///
/// # Examples
///
/// ```rust
/// use sketchx::common::detection::has_expected_extension;
///
/// assert!(has_expected_extension("design.sketch", "sketch"));
/// assert!(!has_expected_extension("design.SKETCH", "sketch"));
/// ```
pub fn has_expected_extension<P: AsRef<Path>>(path: P, extension: &str) -> bool {
    let suffix = format!(".{extension}");
    path.as_ref()
        .file_name()
        .is_some_and(|name| name.as_encoded_bytes().ends_with(suffix.as_bytes()))
}

/// Classify the file at `path`.
///
/// The extension check runs first and short-circuits: a file with the wrong
/// extension is never opened. Any I/O failure while reading the header,
/// including a file shorter than the 4-byte ZIP signature, is returned as
/// an error rather than a format mismatch.
///
/// # Examples
///
/// ```rust,no_run
/// use sketchx::common::detection::{ContainerFormat, classify};
///
/// match classify("design.sketch", "sketch")? {
///     ContainerFormat::RelationalContainer => println!("supported"),
///     other => println!("skipped: {:?}", other),
/// }
/// # Ok::<(), sketchx::Error>(())
/// ```
pub fn classify<P: AsRef<Path>>(path: P, extension: &str) -> Result<ContainerFormat> {
    let path = path.as_ref();
    if !has_expected_extension(path, extension) {
        return Ok(ContainerFormat::NotExpectedExtension);
    }

    let mut file = File::open(path)?;
    classify_reader(&mut file)
}

/// Classify a container from any reader positioned at its first byte.
///
/// At most 16 bytes are consumed.
pub fn classify_reader<R: Read>(reader: &mut R) -> Result<ContainerFormat> {
    let mut header = Vec::with_capacity(HEADER_LEN);
    reader.take(HEADER_LEN as u64).read_to_end(&mut header)?;

    if header.len() < ZIP_SIGNATURE.len() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("file is {} bytes, too short to carry a signature", header.len()),
        )
        .into());
    }

    Ok(classify_bytes(&header))
}

/// Classify a container from its leading bytes.
///
/// Input shorter than a signature simply fails to match it; use
/// [`classify_reader`] to treat short input as a read failure.
///
/// # Examples
///
/// ```rust
/// use sketchx::common::detection::{ContainerFormat, classify_bytes};
///
/// assert_eq!(classify_bytes(b"PK\x03\x04rest"), ContainerFormat::ZipContainer);
/// assert_eq!(
///     classify_bytes(b"SQLite format 3\0"),
///     ContainerFormat::RelationalContainer
/// );
/// ```
pub fn classify_bytes(bytes: &[u8]) -> ContainerFormat {
    if bytes.starts_with(ZIP_SIGNATURE) {
        return ContainerFormat::ZipContainer;
    }

    if bytes.len() >= HEADER_LEN && &bytes[..HEADER_LEN] == SQLITE_SIGNATURE {
        ContainerFormat::RelationalContainer
    } else {
        ContainerFormat::NotRelationalContainer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;
    use proptest::prelude::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn test_wrong_extension_short_circuits() {
        // The file does not exist: a read attempt would fail with an IO error
        let format = classify("/nonexistent/dir/design.fig", "sketch").unwrap();
        assert_eq!(format, ContainerFormat::NotExpectedExtension);
    }

    #[test]
    fn test_extension_is_case_sensitive() {
        assert!(has_expected_extension("a/b/design.sketch", "sketch"));
        assert!(!has_expected_extension("design.Sketch", "sketch"));
        assert!(!has_expected_extension("design.sketch.bak", "sketch"));
        assert!(!has_expected_extension("sketch", "sketch"));
        assert!(!has_expected_extension("designsketch", "sketch"));
    }

    #[test]
    fn test_bare_suffix_name_has_extension() {
        assert!(has_expected_extension(".sketch", "sketch"));
        assert!(has_expected_extension("dir/.sketch", "sketch"));
    }

    #[test]
    fn test_classify_zip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "new.sketch", b"PK\x03\x04\x14\x00\x00\x00");
        assert_eq!(classify(&path, "sketch").unwrap(), ContainerFormat::ZipContainer);
    }

    #[test]
    fn test_classify_sqlite_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = SQLITE_SIGNATURE.to_vec();
        bytes.extend_from_slice(&[0x10, 0x00, 0x01, 0x01]);
        let path = write_file(dir.path(), "old.sketch", &bytes);
        let format = classify(&path, "sketch").unwrap();
        assert_eq!(format, ContainerFormat::RelationalContainer);
        assert!(format.is_supported());
    }

    #[test]
    fn test_classify_other_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "text.sketch", b"just some plain text here");
        assert_eq!(
            classify(&path, "sketch").unwrap(),
            ContainerFormat::NotRelationalContainer
        );
    }

    #[test]
    fn test_partial_sqlite_header_is_not_relational() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "cut.sketch", b"SQLite for");
        assert_eq!(
            classify(&path, "sketch").unwrap(),
            ContainerFormat::NotRelationalContainer
        );
    }

    #[test]
    fn test_truncated_file_is_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "tiny.sketch", b"PK");
        let err = classify(&path, "sketch").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_missing_file_is_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = classify(dir.path().join("absent.sketch"), "sketch").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    proptest! {
        #[test]
        fn prop_zip_signature_always_wins(rest in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut bytes = ZIP_SIGNATURE.to_vec();
            bytes.extend_from_slice(&rest);
            prop_assert_eq!(classify_bytes(&bytes), ContainerFormat::ZipContainer);
            let mut cursor = std::io::Cursor::new(bytes);
            prop_assert_eq!(classify_reader(&mut cursor).unwrap(), ContainerFormat::ZipContainer);
        }

        #[test]
        fn prop_wrong_extension_never_reads(stem in "[a-z]{1,8}", ext in "[a-z]{1,6}") {
            prop_assume!(ext != "sketch");
            let path = format!("/definitely/missing/{stem}.{ext}");
            prop_assert_eq!(
                classify(&path, "sketch").unwrap(),
                ContainerFormat::NotExpectedExtension
            );
        }
    }
}
