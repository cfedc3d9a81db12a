//! Editor-facing actions built on the annotator queries.
//!
//! These turn raw matches into what an editor host renders: hover text,
//! "view documentation" code lenses, and the outcome of the open-doc
//! command.

use crate::models::{KeywordEntry, Span};
use crate::services::{DocumentScan, KeywordAnnotator, KeywordTable};
use serde::Serialize;
use std::sync::Arc;

/// Command identifier attached to documentation code lenses.
pub const OPEN_DOC_COMMAND: &str = "kwdoc.openDoc";

/// Title shown on documentation code lenses.
pub const CODE_LENS_TITLE: &str = "📖 View documentation";

/// Hover content for a keyword under the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hover {
    /// The matched keyword.
    pub keyword: String,
    /// Where the keyword sits in the line.
    pub span: Span,
    /// Markdown body: bold keyword, blank line, description.
    pub markdown: String,
    /// Documentation URL from the same table the keyword was found in.
    pub url: Option<String>,
}

/// A clickable "view documentation" link above a keyword occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeLens {
    /// Zero-based line index.
    pub line: usize,
    /// Where the keyword sits in the line.
    pub span: Span,
    /// Link title.
    pub title: &'static str,
    /// Command run when the link is clicked.
    pub command: &'static str,
    /// Keyword passed to the command.
    pub keyword: String,
}

/// What the host should do for an open-documentation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DocAction {
    /// Open `url` in an external viewer.
    Open {
        /// Keyword the URL belongs to.
        keyword: String,
        /// Documentation URL.
        url: String,
    },
    /// Show an informational notice; no documentation link exists.
    NotFound {
        /// Notice text for the user.
        message: String,
    },
}

/// A text selection reported by the editor host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<'a> {
    /// Selected text; empty for a bare cursor.
    pub text: &'a str,
}

impl<'a> Selection<'a> {
    /// Creates a selection over `text`.
    #[must_use]
    pub const fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Returns true if nothing is selected.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Host-facing actions over a [`KeywordAnnotator`].
pub struct EditorActions<'a> {
    annotator: &'a KeywordAnnotator,
    language_id: String,
}

impl<'a> EditorActions<'a> {
    /// Creates actions for documents of `language_id`.
    #[must_use]
    pub fn new(annotator: &'a KeywordAnnotator, language_id: impl Into<String>) -> Self {
        Self {
            annotator,
            language_id: language_id.into(),
        }
    }

    /// Returns the language these actions apply to.
    #[must_use]
    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    /// Builds hover content for the keyword at `cursor`.
    ///
    /// Keywords without a description produce no hover.
    #[must_use]
    pub fn hover(&self, line: &str, cursor: usize) -> Option<Hover> {
        hover_in(&self.annotator.snapshot(), line, cursor)
    }

    /// Builds a documentation link for every keyword occurrence that has a
    /// URL.
    #[must_use]
    pub fn code_lenses<I>(&self, lines: I) -> Vec<CodeLens>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        lenses_in(self.annotator.snapshot(), lines)
    }

    /// Resolves the open-documentation command for `keyword`.
    #[must_use]
    pub fn open_doc(&self, keyword: &str) -> DocAction {
        doc_action(keyword, self.annotator.resolve_url(keyword))
    }

    /// Handles a selection change: a single non-empty selection equal to a
    /// keyword, in a document of the configured language, opens its
    /// documentation.
    #[must_use]
    pub fn on_selection(
        &self,
        language_id: &str,
        selections: &[Selection<'_>],
    ) -> Option<DocAction> {
        if language_id != self.language_id {
            return None;
        }
        let [selection] = selections else {
            return None;
        };
        if selection.is_empty() {
            return None;
        }
        let table = self.annotator.snapshot();
        let (keyword, entry) = table.lookup(selection.text)?;
        Some(doc_action(keyword, entry.url().map(str::to_string)))
    }
}

fn hover_in(table: &KeywordTable, line: &str, cursor: usize) -> Option<Hover> {
    let found = table.best_at(line, cursor)?;
    let entry = table.get(&found.keyword)?;
    let description = entry.description()?;
    Some(Hover {
        markdown: format!("**{}**\n\n{description}", found.keyword),
        url: entry.url().map(str::to_string),
        keyword: found.keyword,
        span: found.span,
    })
}

fn lenses_in<I>(table: Arc<KeywordTable>, lines: I) -> Vec<CodeLens>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let scan = DocumentScan::new(table, lines);
    let table = Arc::clone(scan.table());
    scan.filter(|m| table.get(&m.keyword).and_then(KeywordEntry::url).is_some())
        .map(|m| CodeLens {
            line: m.line,
            span: m.span,
            title: CODE_LENS_TITLE,
            command: OPEN_DOC_COMMAND,
            keyword: m.keyword,
        })
        .collect()
}

fn doc_action(keyword: &str, url: Option<String>) -> DocAction {
    match url {
        Some(url) => {
            tracing::debug!(keyword, url = %url, "Opening keyword documentation");
            DocAction::Open {
                keyword: keyword.to_string(),
                url,
            }
        },
        None => DocAction::NotFound {
            message: not_found_message(keyword),
        },
    }
}

/// Notice shown when a keyword has no documentation link.
#[must_use]
pub fn not_found_message(keyword: &str) -> String {
    format!("No documentation link found for keyword [{keyword}].")
}
