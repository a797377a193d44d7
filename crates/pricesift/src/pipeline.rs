//! Ingestion pipeline and public entry points.

use std::fmt::Write;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cancel::CancelFlag;
use crate::error::{InputError, PipelineError, Result};
use crate::inference::{
    ColumnClassifier, ColumnMapping, DelegatedClassifier, HeaderLocator, HeuristicClassifier,
    Preview, DEFAULT_PREVIEW_ROWS, DEFAULT_SCAN_ROWS,
};
use crate::input::{Cell, Loader, LoaderConfig, RawTable, SourceMetadata};
use crate::llm::LlmProvider;
use crate::materialize::{CanonicalEntry, EntryStamp, RowMaterializer, DEFAULT_SUPPLIER, DEFAULT_UNIT};

/// Date stamp format used when none is configured.
pub const DEFAULT_DATE_FORMAT: &str = "%d.%m.%Y";

/// Configuration for ingestion.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Loader configuration for file input.
    pub loader: LoaderConfig,
    /// Rows searched for a header.
    pub header_scan_rows: usize,
    /// Data rows shown to classifiers after the header.
    pub preview_rows: usize,
    /// Supplier label stamped on entries.
    pub supplier: String,
    /// Unit used when a row has none.
    pub default_unit: String,
    /// chrono format for the entry date stamp.
    pub date_format: String,
    /// Fixed ingestion date (None = today, local time).
    pub ingestion_date: Option<NaiveDate>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            header_scan_rows: DEFAULT_SCAN_ROWS,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            supplier: DEFAULT_SUPPLIER.to_string(),
            default_unit: DEFAULT_UNIT.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            ingestion_date: None,
        }
    }
}

/// How the columns of a table were resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    /// Index of the header row.
    pub header_row: usize,
    /// Resolved column roles.
    pub mapping: ColumnMapping,
    /// Name of the classifier that produced the mapping.
    pub classifier: String,
    /// Why the delegated classifier was not used, when it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegated_error: Option<String>,
}

/// Result of ingesting a file.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// Header and column resolution.
    pub classification: Classification,
    /// Data rows dropped for lack of a product name.
    pub skipped_rows: usize,
    /// Canonical line items in source order.
    pub entries: Vec<CanonicalEntry>,
}

/// Ingests price-list tables into canonical entries.
///
/// The delegated classifier, when configured, is tried first; any failure falls
/// back to the heuristic classifier. Holds no per-ingestion state, so one
/// pipeline can serve concurrent ingestions.
pub struct IngestionPipeline {
    config: IngestConfig,
    loader: Loader,
    locator: HeaderLocator,
    heuristic: HeuristicClassifier,
    delegated: Option<Box<dyn ColumnClassifier>>,
}

impl IngestionPipeline {
    /// Create a pipeline with default configuration and no delegated classifier.
    pub fn new() -> Self {
        Self::with_config(IngestConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: IngestConfig) -> Self {
        Self {
            loader: Loader::with_config(config.loader.clone()),
            locator: HeaderLocator::with_scan_rows(config.header_scan_rows),
            heuristic: HeuristicClassifier::new(),
            delegated: None,
            config,
        }
    }

    /// Delegate classification to an LLM, keeping the heuristic as fallback.
    pub fn with_llm(self, provider: Arc<dyn LlmProvider>) -> Self {
        self.with_classifier(DelegatedClassifier::new(provider))
    }

    /// Use `classifier` as the first-choice classifier.
    pub fn with_classifier(mut self, classifier: impl ColumnClassifier + 'static) -> Self {
        self.delegated = Some(Box::new(classifier));
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Ingest an already loaded table.
    pub fn ingest(&self, table: &RawTable) -> Result<Vec<CanonicalEntry>> {
        self.ingest_with_cancel(table, &CancelFlag::new())
    }

    /// Ingest a table, abandoning the work once `cancel` is raised.
    pub fn ingest_with_cancel(
        &self,
        table: &RawTable,
        cancel: &CancelFlag,
    ) -> Result<Vec<CanonicalEntry>> {
        let classification = self.classify(table, cancel)?;
        self.materialize(table, &classification, cancel)
    }

    /// Resolve the header row and column roles without producing entries.
    pub fn inspect(&self, table: &RawTable) -> Result<Classification> {
        self.classify(table, &CancelFlag::new())
    }

    /// Load a file and ingest it.
    pub fn ingest_file(&self, path: impl AsRef<Path>) -> Result<IngestReport> {
        self.ingest_file_with_cancel(path, &CancelFlag::new())
    }

    /// Load a file and ingest it, abandoning the work once `cancel` is raised.
    pub fn ingest_file_with_cancel(
        &self,
        path: impl AsRef<Path>,
        cancel: &CancelFlag,
    ) -> Result<IngestReport> {
        let (table, source) = self.loader.load_file(path)?;
        let classification = self.classify(&table, cancel)?;
        let entries = self.materialize(&table, &classification, cancel)?;

        let data_rows = table.len().saturating_sub(classification.header_row + 1);
        Ok(IngestReport {
            source,
            skipped_rows: data_rows - entries.len(),
            classification,
            entries,
        })
    }

    /// Load a file without ingesting it.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<(RawTable, SourceMetadata)> {
        Ok(self.loader.load_file(path)?)
    }

    /// Data rows of every sheet keyed by that sheet's own header row.
    ///
    /// The header is located per sheet, so workbooks whose sheets carry
    /// different banners or column layouts keep their own keys.
    pub fn file_records(&self, path: impl AsRef<Path>) -> Result<Vec<IndexMap<String, Cell>>> {
        let mut records = Vec::new();
        for (name, sheet) in self.loader.load_sheets(path)? {
            let header_row = self.locator.locate(&sheet);
            debug!(sheet = %name, header_row, "sheet header located");
            records.extend(sheet.records(header_row));
        }
        Ok(records)
    }

    fn classify(&self, table: &RawTable, cancel: &CancelFlag) -> Result<Classification> {
        if table.is_empty() {
            return Err(InputError::EmptyTable("table has no rows".to_string()).into());
        }
        if table.column_count() == 0 {
            return Err(InputError::EmptyTable("table has no columns".to_string()).into());
        }

        let header_row = self.locator.locate(table);
        let preview = Preview::from_table(table, header_row, self.config.preview_rows);

        let mut delegated_error = None;
        if let Some(delegated) = &self.delegated {
            if cancel.is_cancelled() {
                return Err(PipelineError::Cancelled);
            }
            match delegated.classify(&preview) {
                Ok(mapping) => {
                    return Ok(Classification {
                        header_row,
                        mapping,
                        classifier: delegated.name().to_string(),
                        delegated_error: None,
                    });
                }
                Err(e) => {
                    warn!(error = %e, "delegated classification failed, falling back to heuristic");
                    delegated_error = Some(e.to_string());
                }
            }
        }

        let mapping = self.heuristic.classify(&preview)?;
        Ok(Classification {
            header_row,
            mapping,
            classifier: self.heuristic.name().to_string(),
            delegated_error,
        })
    }

    fn materialize(
        &self,
        table: &RawTable,
        classification: &Classification,
        cancel: &CancelFlag,
    ) -> Result<Vec<CanonicalEntry>> {
        let materializer = RowMaterializer::new(self.stamp());
        let entries = materializer
            .materialize_cancellable(table, classification.header_row, &classification.mapping, cancel)
            .ok_or(PipelineError::Cancelled)?;

        info!(
            header_row = classification.header_row,
            classifier = %classification.classifier,
            entries = entries.len(),
            "ingestion complete"
        );
        Ok(entries)
    }

    fn stamp(&self) -> EntryStamp {
        let date = self
            .config
            .ingestion_date
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        EntryStamp {
            date: format_date(date, &self.config.date_format),
            supplier: self.config.supplier.clone(),
            default_unit: self.config.default_unit.clone(),
        }
    }
}

/// Format `date`, falling back to `DEFAULT_DATE_FORMAT` when `format` is invalid
/// or asks for fields a plain date lacks (time, offset).
fn format_date(date: NaiveDate, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(format)).is_ok() {
        return out;
    }
    warn!(format, "unusable date format, using {}", DEFAULT_DATE_FORMAT);
    date.format(DEFAULT_DATE_FORMAT).to_string()
}

impl Default for IngestionPipeline {
    fn default() -> Self {
        Self::new()
    }
}
