//! Column-role classification contract.

use serde::{Deserialize, Serialize};

use super::keywords::Role;
use crate::error::ClassificationError;
use crate::input::{Cell, RawTable};

/// Data rows following the header that classifiers get to see.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Column index for each role. `name_idx` is always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub name_idx: usize,
    pub price_idx: Option<usize>,
    pub quantity_idx: Option<usize>,
    pub unit_idx: Option<usize>,
}

impl ColumnMapping {
    /// Mapping with only a name column.
    pub fn name_only(name_idx: usize) -> Self {
        Self {
            name_idx,
            price_idx: None,
            quantity_idx: None,
            unit_idx: None,
        }
    }

    /// Build a mapping from wire indices where `-1` means absent.
    ///
    /// Fails when the name index is absent, any index is below `-1`, or any index
    /// does not fit in `columns`.
    pub fn from_signed(
        name_idx: i64,
        price_idx: i64,
        quantity_idx: i64,
        unit_idx: i64,
        columns: usize,
    ) -> Result<Self, ClassificationError> {
        if name_idx < 0 {
            return Err(ClassificationError::NoNameColumn(format!(
                "classifier returned name_idx {}",
                name_idx
            )));
        }

        Ok(Self {
            name_idx: checked_index(Role::Name, name_idx, columns)?
                .ok_or_else(|| ClassificationError::NoNameColumn("name_idx absent".to_string()))?,
            price_idx: checked_index(Role::Price, price_idx, columns)?,
            quantity_idx: checked_index(Role::Quantity, quantity_idx, columns)?,
            unit_idx: checked_index(Role::Unit, unit_idx, columns)?,
        })
    }

    /// Index assigned to `role`, if any.
    pub fn index_of(&self, role: Role) -> Option<usize> {
        match role {
            Role::Name => Some(self.name_idx),
            Role::Price => self.price_idx,
            Role::Quantity => self.quantity_idx,
            Role::Unit => self.unit_idx,
        }
    }
}

fn checked_index(role: Role, index: i64, columns: usize) -> Result<Option<usize>, ClassificationError> {
    match index {
        -1 => Ok(None),
        i if i >= 0 && (i as u64) < columns as u64 => Ok(Some(i as usize)),
        i => Err(ClassificationError::IndexOutOfRange {
            role: role.as_str(),
            index: i,
            columns,
        }),
    }
}

/// The header row plus the first few data rows, padded to the table width.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    rows: Vec<Vec<Cell>>,
    width: usize,
}

impl Preview {
    /// Take the header row at `header_idx` and up to `data_rows` rows after it.
    pub fn from_table(table: &RawTable, header_idx: usize, data_rows: usize) -> Self {
        let end = header_idx
            .saturating_add(1)
            .saturating_add(data_rows)
            .min(table.len());
        let rows = (header_idx..end)
            .filter_map(|i| table.padded_row(i))
            .collect();

        Self {
            rows,
            width: table.column_count(),
        }
    }

    /// The header row, empty when the preview has no rows.
    pub fn header(&self) -> &[Cell] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// All preview rows, header first.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Column count of the source table.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Tab-separated rendering, one line per row. Tabs and newlines inside
    /// cells are replaced by spaces.
    pub fn to_tsv(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.as_text().replace(['\t', '\n', '\r'], " "))
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Maps a table preview to column roles.
///
/// Implementations must be thread-safe (Send + Sync) so one instance can serve
/// concurrent ingestions.
pub trait ColumnClassifier: Send + Sync {
    /// Resolve column roles for the previewed table.
    fn classify(&self, preview: &Preview) -> Result<ColumnMapping, ClassificationError>;

    /// Short name for logs and reports.
    fn name(&self) -> &str;
}
