//! Data models for kwdoc.

mod keyword;
mod source_events;

pub use keyword::{DocumentMatch, KeywordEntry, KeywordMatch, Span, normalize_keyword};
pub use source_events::{LoadOutcome, SourceEvent, TableEvent};
