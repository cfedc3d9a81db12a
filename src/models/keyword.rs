//! Keyword dictionary entries and match types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Documentation attached to a keyword.
///
/// Missing fields in the dictionary source deserialize to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    /// Short description shown on hover.
    #[serde(default)]
    pub description: String,
    /// Documentation URL opened by the "open documentation" action.
    #[serde(default)]
    pub url: String,
}

impl KeywordEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(description: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            url: url.into(),
        }
    }

    /// Returns the URL, or `None` when it is empty.
    ///
    /// Only the empty string is absent; whitespace is returned as given.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        if self.url.is_empty() {
            None
        } else {
            Some(&self.url)
        }
    }

    /// Returns the description, or `None` when it is empty.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        if self.description.is_empty() {
            None
        } else {
            Some(&self.description)
        }
    }
}

/// Normalizes keyword text for table keys and lookups.
///
/// Uppercases, trims, and collapses every internal whitespace run to a
/// single space, so `"create   materialized\tview"` becomes
/// `"CREATE MATERIALIZED VIEW"`.
///
/// # Examples
///
/// ```
/// use kwdoc::models::normalize_keyword;
///
/// assert_eq!(normalize_keyword("  alter\t table "), "ALTER TABLE");
/// assert_eq!(normalize_keyword(""), "");
/// ```
#[must_use]
pub fn normalize_keyword(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A half-open character range `[start, end)` within a single line.
///
/// Offsets count Unicode scalar values, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length of the span in characters.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span covers no characters.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `offset` lies in `[start, end]`, both ends inclusive.
    ///
    /// A cursor sitting directly before or after a keyword still touches it.
    #[must_use]
    pub const fn touches(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A keyword occurrence found at a cursor position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordMatch {
    /// The normalized table keyword.
    pub keyword: String,
    /// Where the keyword occurs in the line.
    pub span: Span,
}

/// A keyword occurrence found by a whole-document scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentMatch {
    /// Zero-based line index.
    pub line: usize,
    /// Where the keyword occurs in the line.
    pub span: Span,
    /// The normalized table keyword.
    pub keyword: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("select", "SELECT"; "lowercase")]
    #[test_case("Alter Table", "ALTER TABLE"; "mixed case multi word")]
    #[test_case("CREATE \t MATERIALIZED\n VIEW", "CREATE MATERIALIZED VIEW"; "mixed whitespace")]
    #[test_case("  GROUP BY  ", "GROUP BY"; "surrounding whitespace")]
    #[test_case("   ", ""; "whitespace only")]
    fn test_normalize_keyword(input: &str, expected: &str) {
        assert_eq!(normalize_keyword(input), expected);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_keyword("order  by");
        assert_eq!(normalize_keyword(&once), once);
    }

    #[test]
    fn test_span_touches_inclusive_bounds() {
        let span = Span::new(4, 10);
        assert!(!span.touches(3));
        assert!(span.touches(4));
        assert!(span.touches(7));
        assert!(span.touches(10));
        assert!(!span.touches(11));
        assert_eq!(span.len(), 6);
        assert_eq!(span.to_string(), "4..10");
    }

    #[test]
    fn test_entry_empty_fields_are_absent() {
        let entry = KeywordEntry::new("", "");
        assert_eq!(entry.url(), None);
        assert_eq!(entry.description(), None);

        let entry = KeywordEntry::new(" ", "   ");
        assert_eq!(entry.url(), Some("   "));
        assert_eq!(entry.description(), Some(" "));

        let entry = KeywordEntry::new("fetch rows", "https://x/select");
        assert_eq!(entry.url(), Some("https://x/select"));
        assert_eq!(entry.description(), Some("fetch rows"));
    }

    #[test]
    fn test_entry_missing_fields_default() {
        let entry: KeywordEntry = serde_json::from_str(r#"{"url": "https://x"}"#)
            .unwrap_or_else(|_| KeywordEntry::default());
        assert_eq!(entry.description, "");
        assert_eq!(entry.url, "https://x");
    }
}
