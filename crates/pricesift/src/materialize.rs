//! Turns classified rows into canonical line items.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::cancel::CancelFlag;
use crate::inference::ColumnMapping;
use crate::input::RawTable;
use crate::normalize::{cell_amount, is_placeholder, round_money, PRICE_DEFAULT, QUANTITY_DEFAULT};

/// Supplier label stamped on imported entries.
pub const DEFAULT_SUPPLIER: &str = "Импортированные данные";

/// Unit used when a row has none.
pub const DEFAULT_UNIT: &str = "шт";

/// Distinguishes materialization runs that start within the same millisecond.
static RUN_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// One normalized price-list line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEntry {
    /// Unique within one materialization run.
    pub id: String,
    /// Ingestion date stamp.
    pub date: String,
    pub supplier: String,
    pub product: String,
    pub quantity: f64,
    pub price: f64,
    /// `price * quantity` rounded to two decimals.
    pub total: f64,
    pub unit: String,
}

/// Constant fields stamped on every entry of a run.
#[derive(Debug, Clone)]
pub struct EntryStamp {
    pub date: String,
    pub supplier: String,
    pub default_unit: String,
}

impl Default for EntryStamp {
    fn default() -> Self {
        Self {
            date: chrono::Local::now().format("%d.%m.%Y").to_string(),
            supplier: DEFAULT_SUPPLIER.to_string(),
            default_unit: DEFAULT_UNIT.to_string(),
        }
    }
}

/// Emits one [`CanonicalEntry`] per usable data row.
#[derive(Debug, Clone, Default)]
pub struct RowMaterializer {
    stamp: EntryStamp,
}

impl RowMaterializer {
    /// Create a materializer stamping entries with `stamp`.
    pub fn new(stamp: EntryStamp) -> Self {
        Self { stamp }
    }

    /// Materialize every row after `header_idx`.
    ///
    /// Rows without a usable product name are skipped; other unreadable cells
    /// fall back to defaults. Output keeps source order.
    pub fn materialize(
        &self,
        table: &RawTable,
        header_idx: usize,
        mapping: &ColumnMapping,
    ) -> Vec<CanonicalEntry> {
        self.run(table, header_idx, mapping, None).unwrap_or_default()
    }

    /// Like [`materialize`](Self::materialize) but checks `cancel` between rows.
    ///
    /// Returns `None` when cancelled; partial output is discarded.
    pub fn materialize_cancellable(
        &self,
        table: &RawTable,
        header_idx: usize,
        mapping: &ColumnMapping,
        cancel: &CancelFlag,
    ) -> Option<Vec<CanonicalEntry>> {
        self.run(table, header_idx, mapping, Some(cancel))
    }

    fn run(
        &self,
        table: &RawTable,
        header_idx: usize,
        mapping: &ColumnMapping,
        cancel: Option<&CancelFlag>,
    ) -> Option<Vec<CanonicalEntry>> {
        let run_id = next_run_id();
        let mut entries = Vec::new();

        for row_idx in header_idx.saturating_add(1)..table.len() {
            if cancel.is_some_and(CancelFlag::is_cancelled) {
                return None;
            }
            match self.entry_for_row(table, row_idx, mapping, &run_id) {
                Some(entry) => entries.push(entry),
                None => trace!(row = row_idx, "skipped row without product name"),
            }
        }

        Some(entries)
    }

    fn entry_for_row(
        &self,
        table: &RawTable,
        row_idx: usize,
        mapping: &ColumnMapping,
        run_id: &str,
    ) -> Option<CanonicalEntry> {
        let product = table
            .cell(row_idx, mapping.name_idx)?
            .as_text()
            .trim()
            .to_string();
        if is_placeholder(&product) {
            return None;
        }

        let price = amount(table, row_idx, mapping.price_idx, PRICE_DEFAULT);
        let quantity = amount(table, row_idx, mapping.quantity_idx, QUANTITY_DEFAULT);

        let unit = mapping
            .unit_idx
            .and_then(|col| table.cell(row_idx, col))
            .map(|cell| cell.as_text().trim().to_string())
            .filter(|unit| !is_placeholder(unit))
            .unwrap_or_else(|| self.stamp.default_unit.clone());

        Some(CanonicalEntry {
            id: format!("{}-{}", run_id, row_idx),
            date: self.stamp.date.clone(),
            supplier: self.stamp.supplier.clone(),
            product,
            quantity,
            price,
            total: round_money(price * quantity),
            unit,
        })
    }
}

/// Amount in `col` of `row`, or `default` when absent, unreadable or negative.
fn amount(table: &RawTable, row: usize, col: Option<usize>, default: f64) -> f64 {
    let value = col
        .and_then(|c| table.cell(row, c))
        .map(|cell| cell_amount(cell, default))
        .unwrap_or(default);
    if value < 0.0 { default } else { value }
}

fn next_run_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let seq = RUN_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", millis, seq)
}
