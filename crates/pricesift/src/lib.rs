//! Pricesift: schema-less ingestion of supplier price lists.
//!
//! Supplier price lists arrive as spreadsheets and CSV exports with banner rows,
//! free-form headers and locale-specific number formats. Pricesift locates the
//! header row, works out which columns hold the product name, price, quantity
//! and unit, and emits one canonical line item per usable data row.
//!
//! # Core Principles
//!
//! - **Total**: a malformed cell degrades to a default, never aborts the file
//! - **Delegation with fallback**: an LLM may classify columns; the keyword
//!   heuristic always stands behind it
//! - **Source order**: entries come out in the order their rows went in
//!
//! # Example
//!
//! ```no_run
//! use pricesift::IngestionPipeline;
//!
//! let pipeline = IngestionPipeline::new();
//! let report = pipeline.ingest_file("price_list.xlsx").unwrap();
//!
//! println!("Header row: {}", report.classification.header_row);
//! println!("Entries: {}", report.entries.len());
//! ```

pub mod cancel;
pub mod error;
pub mod inference;
pub mod input;
pub mod llm;
pub mod materialize;
pub mod normalize;

mod pipeline;

pub use crate::pipeline::{
    Classification, IngestConfig, IngestReport, IngestionPipeline, DEFAULT_DATE_FORMAT,
};
pub use cancel::CancelFlag;
pub use error::{ClassificationError, InputError, LlmError, PipelineError, Result};
pub use inference::{
    ColumnClassifier, ColumnMapping, DelegatedClassifier, HeaderLocator, HeuristicClassifier,
    Preview,
};
pub use input::{Cell, Loader, LoaderConfig, RawTable, SourceMetadata};
pub use llm::{
    AnthropicProvider, LlmConfig, LlmProvider, MockProvider, OllamaProvider, OpenAIProvider,
};
pub use materialize::{CanonicalEntry, EntryStamp, RowMaterializer};
