//! Header detection and column-role classification.

mod classifier;
mod delegated;
mod header;
mod heuristic;
mod keywords;

pub use classifier::{ColumnClassifier, ColumnMapping, Preview, DEFAULT_PREVIEW_ROWS};
pub use delegated::{extract_json_object, parse_mapping_response, DelegatedClassifier};
pub use header::{HeaderLocator, DEFAULT_SCAN_ROWS};
pub use heuristic::HeuristicClassifier;
pub use keywords::{is_header_term, Role, HEADER_KEYWORDS};
