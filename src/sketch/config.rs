//! Configuration for container extraction.
//!
//! Controls which files are accepted, which payload entries are decoded and
//! where the exported files are written.
use std::path::{Path, PathBuf};

/// Default container file extension.
pub const DEFAULT_EXTENSION: &str = "sketch";

/// Payload entries decoded by default.
pub const DEFAULT_ALLOW_LIST: &[&str] = &["main", "UIMetadata"];

/// Options for [`Extractor`](super::extract::Extractor).
///
/// # Examples
///
/// ```rust
/// use sketchx::sketch::ExtractOptions;
///
/// // Create with defaults
/// let options = ExtractOptions::default();
///
/// // Or customize
/// let options = ExtractOptions::new()
///     .with_output_dir("out")
///     .with_allowed_entry("previews");
/// assert!(options.is_allowed("previews"));
/// ```
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Expected file extension, without the dot, matched case-sensitively
    pub extension: String,
    /// Payload entry names eligible for structured decoding
    pub allow_list: Vec<String>,
    /// Directory the exported files are written to
    pub output_dir: PathBuf,
    /// Indentation width of the JSON export (spaces)
    pub json_indent: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            allow_list: DEFAULT_ALLOW_LIST.iter().map(|s| s.to_string()).collect(),
            output_dir: PathBuf::from("."),
            json_indent: 4,
        }
    }
}

impl ExtractOptions {
    /// Create a new `ExtractOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expected container extension.
    ///
    /// A leading dot is ignored, so `"sketch"` and `".sketch"` are equivalent.
    #[inline]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Replace the payload allow-list.
    #[inline]
    pub fn with_allow_list<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_list = names.into_iter().map(Into::into).collect();
        self
    }

    /// Add one name to the payload allow-list.
    #[inline]
    pub fn with_allowed_entry(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.is_allowed(&name) {
            self.allow_list.push(name);
        }
        self
    }

    /// Set the output directory.
    #[inline]
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the JSON indentation width.
    #[inline]
    pub fn with_json_indent(mut self, indent: usize) -> Self {
        self.json_indent = indent;
        self
    }

    /// Whether payload entry `name` is decoded and exported.
    #[inline]
    pub fn is_allowed(&self, name: &str) -> bool {
        self.allow_list.iter().any(|allowed| allowed == name)
    }
}
