//! Keyword-based column classifier.

use tracing::debug;

use super::classifier::{ColumnClassifier, ColumnMapping, Preview};
use super::keywords::Role;
use crate::error::ClassificationError;

/// Assigns roles by matching header cells against keyword families.
///
/// Each header cell is claimed by at most one role, and the first column claimed
/// for a role wins. Pure and deterministic; always available as the fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier;

impl HeuristicClassifier {
    /// Create a heuristic classifier.
    pub fn new() -> Self {
        Self
    }
}

impl ColumnClassifier for HeuristicClassifier {
    fn classify(&self, preview: &Preview) -> Result<ColumnMapping, ClassificationError> {
        let mut name_idx = None;
        let mut price_idx = None;
        let mut quantity_idx = None;
        let mut unit_idx = None;

        for (col, cell) in preview.header().iter().enumerate() {
            let lowered = cell.as_text().to_lowercase();
            let slot = match Role::classify_header(&lowered) {
                Some(Role::Name) => &mut name_idx,
                Some(Role::Price) => &mut price_idx,
                Some(Role::Quantity) => &mut quantity_idx,
                Some(Role::Unit) => &mut unit_idx,
                None => continue,
            };
            if slot.is_none() {
                *slot = Some(col);
            }
        }

        let Some(name_idx) = name_idx else {
            let header: Vec<String> = preview
                .header()
                .iter()
                .map(|c| c.as_text().into_owned())
                .collect();
            return Err(ClassificationError::NoNameColumn(format!(
                "no name-like header among {:?}",
                header
            )));
        };

        let mapping = ColumnMapping {
            name_idx,
            price_idx,
            quantity_idx,
            unit_idx,
        };
        debug!(?mapping, "heuristic mapping");
        Ok(mapping)
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}
