//! Column classification delegated to an LLM.

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use super::classifier::{ColumnClassifier, ColumnMapping, Preview};
use crate::error::ClassificationError;
use crate::llm::{column_roles_prompt, LlmProvider};

/// Asks an external model for the column roles of a preview.
///
/// One request per call, bounded by the provider's timeout. Every failure mode
/// (transport, timeout, unparseable reply, invalid index) becomes a
/// [`ClassificationError`].
pub struct DelegatedClassifier {
    provider: Arc<dyn LlmProvider>,
}

impl DelegatedClassifier {
    /// Create a classifier backed by a shared provider.
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// The provider this classifier calls.
    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }
}

impl ColumnClassifier for DelegatedClassifier {
    fn classify(&self, preview: &Preview) -> Result<ColumnMapping, ClassificationError> {
        let prompt = column_roles_prompt(&preview.to_tsv());
        debug!(provider = self.provider.name(), "requesting column roles");

        let response = self.provider.complete(&prompt)?;
        let mapping = parse_mapping_response(&response, preview.width())?;

        debug!(?mapping, provider = self.provider.name(), "delegated mapping");
        Ok(mapping)
    }

    fn name(&self) -> &str {
        "delegated"
    }
}

/// Reply object; `-1` or a missing field means the role is absent.
#[derive(Debug, Deserialize)]
struct RoleIndexes {
    #[serde(default)]
    name_idx: Option<i64>,
    #[serde(default)]
    price_idx: Option<i64>,
    #[serde(default)]
    unit_idx: Option<i64>,
    #[serde(default)]
    qty_idx: Option<i64>,
}

/// Turn a model reply into a mapping for a table `columns` wide.
pub fn parse_mapping_response(
    response: &str,
    columns: usize,
) -> Result<ColumnMapping, ClassificationError> {
    let json = extract_json_object(response).ok_or_else(|| {
        ClassificationError::MalformedResponse(format!("no JSON object in {:?}", excerpt(response)))
    })?;

    let indexes: RoleIndexes = serde_json::from_str(json).map_err(|e| {
        ClassificationError::MalformedResponse(format!("{} in {:?}", e, excerpt(json)))
    })?;

    let name_idx = indexes.name_idx.ok_or_else(|| {
        ClassificationError::NoNameColumn("name_idx missing from response".to_string())
    })?;

    ColumnMapping::from_signed(
        name_idx,
        indexes.price_idx.unwrap_or(-1),
        indexes.qty_idx.unwrap_or(-1),
        indexes.unit_idx.unwrap_or(-1),
        columns,
    )
}

/// Locate the JSON object in a reply.
///
/// A fenced block holding an object wins; otherwise the first balanced `{...}`
/// anywhere in the reply is taken, so a fenced note after bare JSON is ignored.
pub fn extract_json_object(response: &str) -> Option<&str> {
    let fenced = response
        .split("```")
        .skip(1)
        .step_by(2)
        .map(|body| body.strip_prefix("json").unwrap_or(body));

    fenced
        .filter_map(balanced_object)
        .next()
        .or_else(|| balanced_object(response))
}

fn balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

fn excerpt(text: &str) -> String {
    text.chars().take(200).collect()
}
