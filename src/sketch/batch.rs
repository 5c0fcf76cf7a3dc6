//! Directory batch processing.
//!
//! Files are processed strictly one at a time. A failing file never stops
//! the batch: every matching file yields exactly one [`BatchEntry`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use super::extract::{ExtractionResult, Extractor, OutputLedger};
use crate::common::Result;
use crate::common::detection::has_expected_extension;

/// Outcome for one file of a batch.
#[derive(Debug)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub result: ExtractionResult,
}

impl BatchEntry {
    /// File name as shown in reports.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

impl fmt::Display for BatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file_name(), self.result.status_message())
    }
}

/// List files in `dir` (non-recursive) that carry `extension`, sorted by
/// file name. Symbolic links are followed; links to regular files are listed.
pub fn list_containers(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if has_expected_extension(&path, extension) && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Process every container in `dir`.
///
/// # Errors
///
/// Only a failure to list the directory is returned as an error; per-file
/// failures are reported in the entries.
pub fn process_directory(dir: &Path, extractor: &Extractor) -> Result<Vec<BatchEntry>> {
    process_directory_with_ledger(dir, extractor, &mut OutputLedger::new())
}

/// Like [`process_directory`], sharing `ledger` with other calls in the
/// same run.
pub fn process_directory_with_ledger(
    dir: &Path,
    extractor: &Extractor,
    ledger: &mut OutputLedger,
) -> Result<Vec<BatchEntry>> {
    let paths = list_containers(dir, &extractor.options().extension)?;
    info!("Found {} container(s) in '{}'", paths.len(), dir.display());

    let entries = paths
        .into_iter()
        .map(|path| {
            let result = extractor.process_with_ledger(&path, ledger);
            BatchEntry { path, result }
        })
        .collect();
    Ok(entries)
}
