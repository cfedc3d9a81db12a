//! Keyword annotation services.
//!
//! The annotator owns the process-wide keyword table; the other modules
//! build it, watch its source, and render its query results for an editor
//! host.

mod actions;
mod annotator;
mod keyword_table;
pub mod loader;
pub mod watcher;

pub use actions::{
    CODE_LENS_TITLE, CodeLens, DocAction, EditorActions, Hover, OPEN_DOC_COMMAND, Selection,
    not_found_message,
};
pub use annotator::{DocumentScan, KeywordAnnotator, global_annotator};
pub use keyword_table::KeywordTable;
pub use watcher::{SourceState, SourceWatcher, detect_change};
