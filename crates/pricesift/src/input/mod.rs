//! Input loading and the raw table model.

mod loader;
mod source;
mod table;

pub use loader::{Loader, LoaderConfig};
pub use source::SourceMetadata;
pub use table::{Cell, RawTable};
