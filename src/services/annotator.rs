//! Keyword annotator: the process-wide keyword table and its queries.
//!
//! The annotator holds the current [`KeywordTable`] behind an `Arc`. Every
//! query clones the `Arc` and works on that snapshot, so a concurrent
//! reload can never be observed half-applied. Reloads build the new table
//! completely before swapping it in.
//!
//! # Lifecycle
//!
//! | Operation | Effect on the table |
//! |-----------|---------------------|
//! | [`KeywordAnnotator::new`] | starts empty |
//! | [`KeywordAnnotator::reload`] | replaced with the parsed source, or empty on failure |
//! | [`KeywordAnnotator::clear`] | reset to empty |
//! | [`KeywordAnnotator::apply`] | `Changed`/`Created` reload, `Deleted` clears |

use crate::models::{
    DocumentMatch, KeywordEntry, KeywordMatch, LoadOutcome, SourceEvent, Span, TableEvent,
};
use crate::observability::EventBus;
use crate::services::KeywordTable;
use crate::services::loader::{load_table, parse_table};
use std::path::Path;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Holds the current keyword table and answers editor queries against it.
pub struct KeywordAnnotator {
    table: RwLock<Arc<KeywordTable>>,
    events: EventBus,
}

impl KeywordAnnotator {
    /// Creates an annotator with an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_event_bus(EventBus::default())
    }

    /// Creates an annotator that publishes lifecycle events on `events`.
    #[must_use]
    pub fn with_event_bus(events: EventBus) -> Self {
        Self {
            table: RwLock::new(Arc::new(KeywordTable::empty())),
            events,
        }
    }

    /// Creates an annotator preloaded with `table`.
    #[must_use]
    pub fn with_table(table: KeywordTable) -> Self {
        let annotator = Self::new();
        annotator.install(table);
        annotator
    }

    /// Returns the event bus lifecycle events are published on.
    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    /// Returns the current table snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<KeywordTable> {
        Arc::clone(&self.table.read().unwrap_or_else(PoisonError::into_inner))
    }

    #[allow(clippy::cast_precision_loss)]
    fn install(&self, table: KeywordTable) {
        let keywords = table.len();
        let table = Arc::new(table);
        *self.table.write().unwrap_or_else(PoisonError::into_inner) = table;
        metrics::gauge!("kwdoc_table_keywords").set(keywords as f64);
    }

    fn finish_reload(&self, table: KeywordTable, outcome: LoadOutcome) -> LoadOutcome {
        self.install(table);
        metrics::counter!("kwdoc_table_reloads_total", "outcome" => outcome.label()).increment(1);
        self.events.publish(TableEvent::reloaded(outcome.clone()));
        outcome
    }

    /// Replaces the table with the dictionary at `path`.
    ///
    /// Never fails: a missing or malformed source installs an empty table
    /// and the returned outcome says why.
    pub fn reload(&self, path: &Path) -> LoadOutcome {
        let (table, outcome) = load_table(path);
        tracing::info!(
            path = %path.display(),
            outcome = outcome.label(),
            keywords = table.len(),
            "Keyword table reloaded"
        );
        self.finish_reload(table, outcome)
    }

    /// Replaces the table with a dictionary given as JSON text.
    pub fn load_str(&self, source: &str) -> LoadOutcome {
        let (table, outcome) = parse_table(source);
        tracing::info!(
            outcome = outcome.label(),
            keywords = table.len(),
            "Keyword table loaded"
        );
        self.finish_reload(table, outcome)
    }

    /// Resets the table to empty.
    pub fn clear(&self) {
        self.install(KeywordTable::empty());
        metrics::counter!("kwdoc_table_clears_total").increment(1);
        tracing::info!("Keyword table cleared");
        self.events.publish(TableEvent::cleared());
    }

    /// Reacts to a change of the dictionary source at `path`.
    ///
    /// Returns the load outcome for `Changed`/`Created`, `None` for
    /// `Deleted`.
    pub fn apply(&self, event: SourceEvent, path: &Path) -> Option<LoadOutcome> {
        tracing::info!(event = %event, path = %path.display(), "Keyword source event");
        match event {
            SourceEvent::Changed | SourceEvent::Created => Some(self.reload(path)),
            SourceEvent::Deleted => {
                self.clear();
                None
            },
        }
    }

    /// Finds the keyword at `cursor` in `line`, preferring the longest
    /// match.
    ///
    /// `cursor` is a character offset; a cursor at either edge of a keyword
    /// still selects it.
    #[must_use]
    pub fn resolve_at(&self, line: &str, cursor: usize) -> Option<KeywordMatch> {
        let found = self.snapshot().best_at(line, cursor);
        tracing::debug!(cursor, keyword = ?found.as_ref().map(|m| &m.keyword), "resolve_at");
        found
    }

    /// Returns the span of the keyword [`resolve_at`](Self::resolve_at)
    /// would return for the same input.
    #[must_use]
    pub fn range_at(&self, line: &str, cursor: usize) -> Option<Span> {
        self.resolve_at(line, cursor).map(|m| m.span)
    }

    /// Lazily scans every line of a document for keyword occurrences.
    ///
    /// Overlapping occurrences of different keywords are all reported.
    /// The scan uses the table as of this call; each call starts afresh.
    pub fn scan_all<I>(&self, lines: I) -> DocumentScan<I::IntoIter>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        DocumentScan::new(self.snapshot(), lines)
    }

    /// Scans a whole text, splitting it on `\n` and `\r\n`.
    pub fn scan_text<'a>(&self, text: &'a str) -> DocumentScan<std::str::Lines<'a>> {
        self.scan_all(text.lines())
    }

    /// Returns the documentation URL for a keyword.
    ///
    /// Lookup is exact up to case and whitespace layout; an entry with an
    /// empty URL counts as absent.
    #[must_use]
    pub fn resolve_url(&self, keyword: &str) -> Option<String> {
        let url = self
            .snapshot()
            .get(keyword)
            .and_then(KeywordEntry::url)
            .map(str::to_string);
        metrics::counter!("kwdoc_lookups_total", "hit" => if url.is_some() { "true" } else { "false" })
            .increment(1);
        url
    }

    /// Returns the entry for a keyword.
    #[must_use]
    pub fn entry(&self, keyword: &str) -> Option<KeywordEntry> {
        self.snapshot().get(keyword).cloned()
    }

    /// Returns true if the keyword is in the table.
    #[must_use]
    pub fn contains(&self, keyword: &str) -> bool {
        self.snapshot().get(keyword).is_some()
    }

    /// Returns the table keyword equal to a whole selection, if any.
    ///
    /// This is an equality test, not a positional scan: `"select"` matches
    /// `SELECT` but `"select *"` matches nothing.
    #[must_use]
    pub fn match_selection(&self, selection: &str) -> Option<String> {
        self.snapshot()
            .lookup(selection)
            .map(|(keyword, _)| keyword.to_string())
    }

    /// Number of keywords in the current table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Returns true if the current table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

impl Default for KeywordAnnotator {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy iterator over the keyword occurrences of a document.
///
/// Produced by [`KeywordAnnotator::scan_all`]. Lines are visited in order;
/// within a line matches are ordered by start offset, longer spans first.
pub struct DocumentScan<L> {
    table: Arc<KeywordTable>,
    lines: std::iter::Enumerate<L>,
    pending: std::vec::IntoIter<DocumentMatch>,
}

impl<L: Iterator> DocumentScan<L> {
    /// Scans `lines` against a fixed table snapshot.
    pub fn new<I>(table: Arc<KeywordTable>, lines: I) -> Self
    where
        I: IntoIterator<IntoIter = L>,
    {
        Self {
            table,
            lines: lines.into_iter().enumerate(),
            pending: Vec::new().into_iter(),
        }
    }

    /// Returns the snapshot this scan reads.
    #[must_use]
    pub const fn table(&self) -> &Arc<KeywordTable> {
        &self.table
    }
}

impl<L> Iterator for DocumentScan<L>
where
    L: Iterator,
    L::Item: AsRef<str>,
{
    type Item = DocumentMatch;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(found) = self.pending.next() {
                return Some(found);
            }
            if self.table.is_empty() {
                return None;
            }
            let (index, line) = self.lines.next()?;
            self.pending = self.table.scan_line(index, line.as_ref()).into_iter();
        }
    }
}

static GLOBAL_ANNOTATOR: OnceLock<KeywordAnnotator> = OnceLock::new();

/// Returns the process-wide annotator, initializing it empty on first use.
#[must_use]
pub fn global_annotator() -> &'static KeywordAnnotator {
    GLOBAL_ANNOTATOR.get_or_init(KeywordAnnotator::new)
}
