//! Container format type enumeration.

/// Outcome of sniffing a candidate container file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    /// File name does not carry the expected extension; nothing was read
    NotExpectedExtension,
    /// ZIP-packaged document (newer format revision, not supported)
    ZipContainer,
    /// Neither ZIP nor SQLite
    NotRelationalContainer,
    /// SQLite database, the supported container revision
    RelationalContainer,
}

impl ContainerFormat {
    /// Whether the extraction pipeline can proceed with this file.
    #[inline]
    pub fn is_supported(self) -> bool {
        self == ContainerFormat::RelationalContainer
    }
}
