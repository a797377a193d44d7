//! Metadata about a loaded source file.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, csv-semicolon, tsv, xlsx, ...).
    pub format: String,
    /// Text encoding the file was decoded with; spreadsheets report "binary".
    pub encoding: String,
    /// Number of worksheets read (1 for delimited text).
    pub sheet_count: usize,
    /// Number of non-blank rows, header included.
    pub row_count: usize,
    /// Width of the widest row.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        encoding: String,
        sheet_count: usize,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            encoding,
            sheet_count,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}
