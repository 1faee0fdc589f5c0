//! Narration annotations: the raw table as stored on disk and the typed
//! per-row view the frame extractor works from.

mod narration;
mod table;

pub use narration::{earliest, Narration};
pub use table::AnnotationTable;
