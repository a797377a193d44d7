//! Header row detection.

use tracing::debug;

use super::keywords::is_header_term;
use crate::input::RawTable;

/// Rows scanned for a header before giving up and assuming row 0.
pub const DEFAULT_SCAN_ROWS: usize = 20;

/// Finds the first row that looks like column labels.
#[derive(Debug, Clone, Copy)]
pub struct HeaderLocator {
    scan_rows: usize,
}

impl HeaderLocator {
    /// Create a locator scanning the default window.
    pub fn new() -> Self {
        Self {
            scan_rows: DEFAULT_SCAN_ROWS,
        }
    }

    /// Create a locator scanning at most `scan_rows` rows.
    pub fn with_scan_rows(scan_rows: usize) -> Self {
        Self { scan_rows }
    }

    /// Index of the first row with a cell containing a header keyword, or 0.
    pub fn locate(&self, table: &RawTable) -> usize {
        let found = table
            .rows()
            .iter()
            .take(self.scan_rows)
            .position(|row| {
                row.iter()
                    .any(|cell| is_header_term(&cell.as_text().to_lowercase()))
            });

        match found {
            Some(index) => {
                debug!(header_row = index, "header row located");
                index
            }
            None => {
                debug!(scan_rows = self.scan_rows, "no header keywords found, using row 0");
                0
            }
        }
    }
}

impl Default for HeaderLocator {
    fn default() -> Self {
        Self::new()
    }
}
