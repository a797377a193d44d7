//! Ragged cell matrix loaded from a price-list file.

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// A single cell value as delivered by a loader.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Build a text cell, collapsing whitespace-only input to [`Cell::Empty`].
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }

    /// True for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Number(_) => false,
            Cell::Text(s) => s.trim().is_empty(),
        }
    }

    /// Textual rendering of the cell. Whole numbers print without a fractional part.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Cell::Empty => Cow::Borrowed(""),
            Cell::Text(s) => Cow::Borrowed(s.as_str()),
            Cell::Number(n) => Cow::Owned(format_number(*n)),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::text(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Empty => serializer.serialize_str(""),
            Cell::Number(n) => serializer.serialize_f64(*n),
            Cell::Text(s) => serializer.serialize_str(s),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Ordered, possibly ragged rows of cells.
///
/// The column count is the length of the longest row; shorter rows read as if
/// padded with empty cells. The table is never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    rows: Vec<Vec<Cell>>,
    column_count: usize,
}

impl RawTable {
    /// Create a table from loaded rows.
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self { rows, column_count }
    }

    /// Create a table of text cells, mainly for tests and in-memory callers.
    pub fn from_strings<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(|s| Cell::text(s)).collect())
                .collect(),
        )
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of the widest row.
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// All rows in source order.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// A row as stored, without padding.
    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// A cell, or `None` when the row is shorter than `col`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// A row padded with empty cells up to the column count.
    pub fn padded_row(&self, index: usize) -> Option<Vec<Cell>> {
        let row = self.rows.get(index)?;
        let mut padded = row.clone();
        padded.resize(self.column_count, Cell::Empty);
        Some(padded)
    }

    /// Take the rows out of the table.
    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        self.rows
    }

    /// Data rows after `header_idx`, keyed by the header cell text.
    ///
    /// Blank or repeated header cells are renamed `column_<n>` (1-based) so that
    /// no value is dropped.
    pub fn records(&self, header_idx: usize) -> Vec<IndexMap<String, Cell>> {
        let Some(header) = self.padded_row(header_idx) else {
            return Vec::new();
        };

        let mut names: Vec<String> = Vec::with_capacity(header.len());
        for (i, cell) in header.iter().enumerate() {
            let text = cell.as_text().trim().to_string();
            if text.is_empty() || names.contains(&text) {
                names.push(format!("column_{}", i + 1));
            } else {
                names.push(text);
            }
        }

        (header_idx + 1..self.rows.len())
            .filter_map(|i| self.padded_row(i))
            .map(|row| names.iter().cloned().zip(row).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_count_is_widest_row() {
        let table = RawTable::from_strings(vec![vec!["a"], vec!["a", "b", "c"], vec!["a", "b"]]);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_short_rows_pad_with_empty() {
        let table = RawTable::from_strings(vec![vec!["a", "b", "c"], vec!["x"]]);
        assert_eq!(table.cell(1, 2), None);
        let padded = table.padded_row(1).unwrap();
        assert_eq!(padded, vec![Cell::text("x"), Cell::Empty, Cell::Empty]);
    }

    #[test]
    fn test_number_rendering() {
        assert_eq!(Cell::Number(150.0).as_text(), "150");
        assert_eq!(Cell::Number(12.5).as_text(), "12.5");
        assert_eq!(Cell::text("   "), Cell::Empty);
    }

    #[test]
    fn test_records_keyed_by_header() {
        let table = RawTable::from_strings(vec![
            vec!["Прайс-лист", "", ""],
            vec!["Наименование", "Цена", ""],
            vec!["Молоток", "150", "акция"],
        ]);
        let records = table.records(1);
        assert_eq!(records.len(), 1);
        let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Наименование", "Цена", "column_3"]);
        assert_eq!(records[0]["Наименование"], Cell::text("Молоток"));
    }
}
