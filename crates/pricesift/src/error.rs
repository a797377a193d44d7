//! Error types for the pricesift library.
//!
//! Ingestion failures fall into two families. [`InputError`] covers files and
//! tables that cannot be read at all, [`ClassificationError`] covers tables whose
//! column roles could not be resolved. Both surface to callers wrapped in
//! [`PipelineError`]. Cell-level problems never become errors: they degrade to
//! defaults or skip the row.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// The table could not be read or is structurally unusable.
#[derive(Debug, Error)]
pub enum InputError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from the spreadsheet reader.
    #[error("Spreadsheet error in '{path}': {message}")]
    Spreadsheet { path: PathBuf, message: String },

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no rows left after blank-row filtering.
    #[error("Empty table: {0}")]
    EmptyTable(String),
}

/// Failure reported by an LLM provider.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Provider could not be configured (missing key, bad header value, client build).
    #[error("LLM configuration error: {0}")]
    Config(String),

    /// The request did not complete within the configured timeout.
    #[error("LLM request timed out after {0:?}")]
    Timeout(Duration),

    /// The service could not be reached or the transfer failed.
    #[error("LLM transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("LLM API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The service answered but carried no text.
    #[error("LLM returned no content")]
    EmptyResponse,
}

impl LlmError {
    /// Map a reqwest failure, keeping timeouts distinguishable.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(timeout)
        } else {
            LlmError::Transport(err.to_string())
        }
    }
}

/// Column roles could not be resolved.
#[derive(Debug, Error)]
pub enum ClassificationError {
    /// No column could be identified as the product name.
    #[error("No product name column found: {0}")]
    NoNameColumn(String),

    /// The delegated service failed.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The delegated service answered with something that is not the agreed JSON object.
    #[error("Malformed classifier response: {0}")]
    MalformedResponse(String),

    /// A returned column index does not fit the table.
    #[error("Column index {index} for '{role}' is outside the table ({columns} columns)")]
    IndexOutOfRange {
        role: &'static str,
        index: i64,
        columns: usize,
    },
}

/// Umbrella error returned by the ingestion pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input could not be used.
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Neither classifier produced a usable mapping.
    #[error("Classification error: {0}")]
    Classification(#[from] ClassificationError),

    /// The caller cancelled the ingestion.
    #[error("Ingestion cancelled")]
    Cancelled,
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
