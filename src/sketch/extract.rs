//! Extraction Orchestrator.
//!
//! Drives one container through the pipeline:
//!
//! 1. extension check and format sniffing ([`classify`])
//! 2. reading the `metadata` and `payload` tables ([`read_tables`])
//! 3. building the metadata map (last write wins)
//! 4. decoding allow-listed payload entries ([`decode`]); entries that fail
//!    to decode are dropped, entries outside the allow-list are ignored
//! 5. exporting each non-empty map as `{stem}_{table}.json` and
//!    `{stem}_{table}.xml`
//!
//! Nothing below file level escapes [`Extractor::process`]: decode and write
//! failures are logged and folded into the returned [`ExtractionResult`].

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use super::archive::decode;
use super::config::ExtractOptions;
use super::tables::{Table, TableRows, read_tables};
use super::value::{Value, ValueMap, collect_last_write_wins};
use crate::common::detection::{ContainerFormat, classify};
use crate::common::{Error, Result};
use crate::export::{write_json, write_xml};

/// Why a file was rejected before its tables were read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// File name lacks the expected extension
    WrongExtension { expected: String },
    /// ZIP-packaged document revision
    UnsupportedPackaging,
    /// Not a SQLite database
    NotRelationalContainer,
    /// The file header could not be read
    Io(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::WrongExtension { expected } => {
                write!(f, "file does not have the .{expected} extension")
            },
            RejectReason::UnsupportedPackaging => {
                f.write_str("file is a ZIP archive; this document version is not supported")
            },
            RejectReason::NotRelationalContainer => f.write_str("file is not a SQLite database"),
            RejectReason::Io(message) => write!(f, "could not read file: {message}"),
        }
    }
}

/// One of the four files an extraction can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    MetadataJson,
    MetadataXml,
    PayloadJson,
    PayloadXml,
}

impl OutputKind {
    /// Outputs produced for `table`, in write order.
    pub fn for_table(table: Table) -> [OutputKind; 2] {
        match table {
            Table::Metadata => [OutputKind::MetadataJson, OutputKind::MetadataXml],
            Table::Payload => [OutputKind::PayloadJson, OutputKind::PayloadXml],
        }
    }

    /// File name suffix appended to the input's stem.
    pub fn suffix(self) -> &'static str {
        match self {
            OutputKind::MetadataJson => "_metadata.json",
            OutputKind::MetadataXml => "_metadata.xml",
            OutputKind::PayloadJson => "_payload.json",
            OutputKind::PayloadXml => "_payload.xml",
        }
    }

    /// Output file name for an input with file stem `stem`.
    pub fn file_name(self, stem: &str) -> String {
        format!("{stem}{}", self.suffix())
    }
}

/// An output that could not be written.
#[derive(Debug)]
pub struct OutputFailure {
    pub kind: OutputKind,
    pub error: Error,
}

/// Which tables produced no entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyTables {
    Metadata,
    Payload,
    Both,
}

impl EmptyTables {
    fn from_counts(metadata: usize, payload: usize) -> Option<Self> {
        match (metadata == 0, payload == 0) {
            (true, true) => Some(EmptyTables::Both),
            (true, false) => Some(EmptyTables::Metadata),
            (false, true) => Some(EmptyTables::Payload),
            (false, false) => None,
        }
    }
}

/// The two maps extracted from one container, before export.
#[derive(Debug, Default)]
pub struct Extraction {
    /// `metadata` table, values passed through as stored
    pub metadata: ValueMap,
    /// Decoded allow-listed `payload` entries
    pub payload: ValueMap,
    /// Allow-listed payload entries whose blob failed to decode
    pub dropped_entries: Vec<String>,
    /// Payload rows outside the allow-list
    pub ignored_entries: usize,
    /// Table read failures, rendered as messages
    pub table_failures: Vec<String>,
}

/// Counts and outputs of a completed extraction.
#[derive(Debug, Default)]
pub struct ExtractionSummary {
    pub metadata_entries: usize,
    pub payload_entries: usize,
    pub written: Vec<(OutputKind, PathBuf)>,
    pub write_failures: Vec<OutputFailure>,
    pub dropped_entries: Vec<String>,
    pub ignored_entries: usize,
    pub table_failures: Vec<String>,
}

impl ExtractionSummary {
    /// Whether output `kind` was written.
    pub fn was_written(&self, kind: OutputKind) -> bool {
        self.written.iter().any(|(k, _)| *k == kind)
    }
}

/// Per-file outcome.
#[derive(Debug)]
pub enum ExtractionResult {
    Rejected(RejectReason),
    Succeeded(ExtractionSummary),
    PartiallyEmpty {
        summary: ExtractionSummary,
        empty: EmptyTables,
    },
}

impl ExtractionResult {
    /// Summary of a file that got past sniffing.
    pub fn summary(&self) -> Option<&ExtractionSummary> {
        match self {
            ExtractionResult::Rejected(_) => None,
            ExtractionResult::Succeeded(summary)
            | ExtractionResult::PartiallyEmpty { summary, .. } => Some(summary),
        }
    }

    #[inline]
    pub fn is_rejected(&self) -> bool {
        matches!(self, ExtractionResult::Rejected(_))
    }

    /// One-line human readable status.
    pub fn status_message(&self) -> String {
        let summary = match self {
            ExtractionResult::Rejected(reason) => return format!("Error: {reason}."),
            ExtractionResult::Succeeded(summary)
            | ExtractionResult::PartiallyEmpty { summary, .. } => summary,
        };

        let mut message = format!(
            "Processing completed successfully ({} metadata entries, {} payload entries)",
            summary.metadata_entries, summary.payload_entries
        );
        if let ExtractionResult::PartiallyEmpty { empty, .. } = self {
            message.push_str(match empty {
                EmptyTables::Metadata => "; no metadata",
                EmptyTables::Payload => "; no payload",
                EmptyTables::Both => "; no metadata or payload",
            });
        }
        if !summary.write_failures.is_empty() {
            message.push_str(&format!(
                "; {} output file(s) could not be written",
                summary.write_failures.len()
            ));
        }
        message.push('.');
        message
    }
}

/// Output paths already claimed during a run.
///
/// Two inputs with the same file stem would map to the same outputs; the
/// second one gets a write failure instead of overwriting the first.
#[derive(Debug, Default)]
pub struct OutputLedger {
    claimed: HashSet<PathBuf>,
}

impl OutputLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `path`; returns `false` if it was already claimed.
    pub fn claim(&mut self, path: &Path) -> bool {
        self.claimed.insert(path.to_path_buf())
    }
}

/// Extracts containers according to a set of [`ExtractOptions`].
///
/// # Examples
///
/// ```rust,no_run
/// use sketchx::sketch::{ExtractOptions, Extractor};
///
/// let extractor = Extractor::new(ExtractOptions::new().with_output_dir("out"));
/// let result = extractor.process("design.sketch");
/// println!("{}", result.status_message());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Check that `path` is a supported container.
    ///
    /// # Errors
    ///
    /// [`Error::InputRejected`] carrying the reason otherwise.
    pub fn validate<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let format = classify(path, &self.options.extension).map_err(|e| {
            error!("Failed to read header of '{}': {}", path.display(), e);
            Error::InputRejected(RejectReason::Io(e.to_string()))
        })?;

        let reason = match format {
            ContainerFormat::RelationalContainer => return Ok(()),
            ContainerFormat::NotExpectedExtension => {
                error!(
                    "File '{}' does not have the .{} extension",
                    path.display(),
                    self.options.extension
                );
                RejectReason::WrongExtension {
                    expected: self.options.extension.clone(),
                }
            },
            ContainerFormat::ZipContainer => {
                info!(
                    "File '{}' is a ZIP archive; this version is not supported",
                    path.display()
                );
                RejectReason::UnsupportedPackaging
            },
            ContainerFormat::NotRelationalContainer => {
                error!("File '{}' is not a SQLite database", path.display());
                RejectReason::NotRelationalContainer
            },
        };
        Err(Error::InputRejected(reason))
    }

    /// Validate `path` and build both maps without writing anything.
    pub fn extract<P: AsRef<Path>>(&self, path: P) -> Result<Extraction> {
        let path = path.as_ref();
        self.validate(path)?;
        debug!("File '{}' passed format sniffing", path.display());

        let tables = read_tables(path);
        Ok(self.build_extraction(path, tables))
    }

    /// Build both maps from already-read table rows.
    pub fn build_extraction(&self, path: &Path, tables: TableRows) -> Extraction {
        let mut extraction = Extraction {
            table_failures: tables
                .failures
                .iter()
                .map(|f| match f.table {
                    Some(table) => format!("{table}: {}", f.error),
                    None => f.error.to_string(),
                })
                .collect(),
            ..Extraction::default()
        };

        extraction.metadata =
            collect_last_write_wins(tables.metadata.into_iter().map(|row| (row.name, row.value)));
        info!(
            "Read {} metadata entries from '{}'",
            extraction.metadata.len(),
            path.display()
        );

        for row in tables.payload {
            if !self.options.is_allowed(&row.name) {
                extraction.ignored_entries += 1;
                continue;
            }

            let decoded = match &row.value {
                Value::Data(blob) => decode(blob),
                other => Err(Error::DecodeFailure(format!(
                    "expected a blob, found {}",
                    other.kind()
                ))),
            };

            match decoded {
                Ok(tree) => {
                    extraction.payload.insert(row.name, tree);
                },
                Err(e) => {
                    error!(
                        "Failed to decode payload entry '{}' in '{}': {}",
                        row.name,
                        path.display(),
                        e
                    );
                    extraction.dropped_entries.push(row.name);
                },
            }
        }

        extraction
    }

    /// Process one file, writing up to four output files.
    pub fn process<P: AsRef<Path>>(&self, path: P) -> ExtractionResult {
        self.process_with_ledger(path, &mut OutputLedger::new())
    }

    /// Like [`process`](Self::process), sharing `ledger` across calls so that
    /// colliding output paths within one run are detected.
    pub fn process_with_ledger<P: AsRef<Path>>(
        &self,
        path: P,
        ledger: &mut OutputLedger,
    ) -> ExtractionResult {
        let path = path.as_ref();
        let extraction = match self.extract(path) {
            Ok(extraction) => extraction,
            Err(Error::InputRejected(reason)) => return ExtractionResult::Rejected(reason),
            Err(e) => return ExtractionResult::Rejected(RejectReason::Io(e.to_string())),
        };

        let stem = file_stem(path);
        let mut summary = ExtractionSummary {
            metadata_entries: extraction.metadata.len(),
            payload_entries: extraction.payload.len(),
            dropped_entries: extraction.dropped_entries,
            ignored_entries: extraction.ignored_entries,
            table_failures: extraction.table_failures,
            ..ExtractionSummary::default()
        };

        self.export_table(path, &stem, Table::Metadata, &extraction.metadata, ledger, &mut summary);
        self.export_table(path, &stem, Table::Payload, &extraction.payload, ledger, &mut summary);

        match EmptyTables::from_counts(summary.metadata_entries, summary.payload_entries) {
            Some(empty) => ExtractionResult::PartiallyEmpty { summary, empty },
            None => ExtractionResult::Succeeded(summary),
        }
    }

    /// Output path of `kind` for an input with file stem `stem`.
    pub fn output_path(&self, stem: &str, kind: OutputKind) -> PathBuf {
        self.options.output_dir.join(kind.file_name(stem))
    }

    fn export_table(
        &self,
        source: &Path,
        stem: &str,
        table: Table,
        map: &ValueMap,
        ledger: &mut OutputLedger,
        summary: &mut ExtractionSummary,
    ) {
        if map.is_empty() {
            warn!("No data in table '{}' for file '{}'", table, source.display());
            return;
        }

        for kind in OutputKind::for_table(table) {
            let path = self.output_path(stem, kind);
            match self.write_output(map, kind, &path, ledger) {
                Ok(()) => {
                    info!("Table '{}' saved to '{}'", table, path.display());
                    summary.written.push((kind, path));
                },
                Err(e) => {
                    error!("{}", e);
                    summary.write_failures.push(OutputFailure { kind, error: e });
                },
            }
        }
    }

    fn write_output(
        &self,
        map: &ValueMap,
        kind: OutputKind,
        path: &Path,
        ledger: &mut OutputLedger,
    ) -> Result<()> {
        if !ledger.claim(path) {
            return Err(Error::WriteFailure {
                path: path.to_path_buf(),
                message: "output already written by another input in this run".to_string(),
            });
        }

        match kind {
            OutputKind::MetadataJson | OutputKind::PayloadJson => {
                write_json(map, path, self.options.json_indent)
            },
            OutputKind::MetadataXml | OutputKind::PayloadXml => write_xml(map, path),
        }
    }
}

/// Input file name without directory and extension.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
