//! Compiled keyword dictionary.
//!
//! A [`KeywordTable`] is built once from a dictionary source and never
//! mutated afterwards. Each keyword carries a word-bounded, case-insensitive
//! pattern in which internal spaces match any run of whitespace, so the
//! table entry `CREATE MATERIALIZED VIEW` matches
//! `create  materialized\tview` in a line of text.
//!
//! Word boundaries are ASCII: only `[0-9A-Za-z_]` counts as a word
//! character, so a keyword written directly against CJK or accented text
//! (`查询SELECT语句`) still matches.

use crate::models::{DocumentMatch, KeywordEntry, KeywordMatch, Span, normalize_keyword};
use crate::{Error, Result};
use regex::Regex;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// A keyword with its entry and compiled pattern.
#[derive(Debug)]
struct CompiledKeyword {
    keyword: String,
    entry: KeywordEntry,
    /// `None` if the pattern failed to compile; the keyword stays
    /// resolvable by exact lookup but never matches text.
    pattern: Option<Regex>,
}

/// Immutable mapping from normalized keyword to documentation entry.
///
/// Iteration order is the order in which keywords first appeared in the
/// source. That order breaks ties between equally long matches.
#[derive(Debug, Default)]
pub struct KeywordTable {
    keywords: Vec<CompiledKeyword>,
    index: HashMap<String, usize>,
}

impl KeywordTable {
    /// Creates an empty table.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a table from `(keyword, entry)` pairs.
    ///
    /// Keys are normalized; when two keys normalize to the same keyword the
    /// later entry wins but keeps the position of the first. Blank keys are
    /// skipped.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, KeywordEntry)>,
        K: AsRef<str>,
    {
        let mut table = Self::default();
        for (key, entry) in entries {
            let keyword = normalize_keyword(key.as_ref());
            if keyword.is_empty() {
                tracing::debug!(raw_key = key.as_ref(), "Skipping blank keyword");
                continue;
            }
            if let Some(&idx) = table.index.get(&keyword) {
                table.keywords[idx].entry = entry;
                continue;
            }
            let pattern = compile_pattern(&keyword);
            table.index.insert(keyword.clone(), table.keywords.len());
            table.keywords.push(CompiledKeyword {
                keyword,
                entry,
                pattern,
            });
        }
        table
    }

    /// Parses a JSON dictionary of the form
    /// `{ "KEYWORD": { "description": "...", "url": "..." }, ... }`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDictionary`] if the source is not valid JSON,
    /// the top-level value is not an object, or an entry is not an object.
    pub fn from_json(source: &str) -> Result<Self> {
        let entries: OrderedEntries =
            serde_json::from_str(source).map_err(|e| Error::InvalidDictionary(e.to_string()))?;
        Ok(Self::from_entries(entries.0))
    }

    /// Number of keywords.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Returns true if the table has no keywords.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Looks up a keyword exactly, ignoring case and whitespace layout.
    #[must_use]
    pub fn get(&self, keyword: &str) -> Option<&KeywordEntry> {
        self.lookup(keyword).map(|(_, entry)| entry)
    }

    /// Like [`get`](Self::get), but also returns the table's spelling of
    /// the keyword.
    #[must_use]
    pub fn lookup(&self, keyword: &str) -> Option<(&str, &KeywordEntry)> {
        let idx = *self.index.get(&normalize_keyword(keyword))?;
        let compiled = &self.keywords[idx];
        Some((compiled.keyword.as_str(), &compiled.entry))
    }

    /// Iterates `(keyword, entry)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeywordEntry)> {
        self.keywords.iter().map(|k| (k.keyword.as_str(), &k.entry))
    }

    /// Finds the longest keyword occurrence touching `cursor`.
    ///
    /// `cursor` is a character offset; an occurrence `[s, e)` is a
    /// candidate when `s <= cursor <= e`. A later candidate only replaces
    /// the current best if it is strictly longer.
    #[must_use]
    pub fn best_at(&self, line: &str, cursor: usize) -> Option<KeywordMatch> {
        let offsets = CharOffsets::new(line);
        let mut best: Option<(usize, Span)> = None;

        for (idx, compiled) in self.keywords.iter().enumerate() {
            let Some(pattern) = &compiled.pattern else {
                continue;
            };
            for m in pattern.find_iter(line) {
                let span = offsets.span(m.start(), m.end());
                if !span.touches(cursor) {
                    continue;
                }
                if best.is_none_or(|(_, current)| span.len() > current.len()) {
                    best = Some((idx, span));
                }
            }
        }

        best.map(|(idx, span)| KeywordMatch {
            keyword: self.keywords[idx].keyword.clone(),
            span,
        })
    }

    /// Finds every keyword occurrence in a line, overlaps included.
    ///
    /// Results are ordered by start offset, then longer spans first, then
    /// table order.
    #[must_use]
    pub fn scan_line(&self, line_index: usize, line: &str) -> Vec<DocumentMatch> {
        let offsets = CharOffsets::new(line);
        let mut found: Vec<(Span, usize)> = Vec::new();

        for (idx, compiled) in self.keywords.iter().enumerate() {
            let Some(pattern) = &compiled.pattern else {
                continue;
            };
            found.extend(
                pattern
                    .find_iter(line)
                    .map(|m| (offsets.span(m.start(), m.end()), idx)),
            );
        }

        found.sort_by(|(a, a_idx), (b, b_idx)| {
            a.start
                .cmp(&b.start)
                .then_with(|| b.end.cmp(&a.end))
                .then_with(|| a_idx.cmp(b_idx))
        });

        found
            .into_iter()
            .map(|(span, idx)| DocumentMatch {
                line: line_index,
                span,
                keyword: self.keywords[idx].keyword.clone(),
            })
            .collect()
    }
}

/// Builds the matching pattern for a normalized keyword.
fn compile_pattern(keyword: &str) -> Option<Regex> {
    let body = keyword
        .split(' ')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    match Regex::new(&format!(r"(?i)(?-u:\b){body}(?-u:\b)")) {
        Ok(pattern) => Some(pattern),
        Err(e) => {
            tracing::warn!(keyword, error = %e, "Keyword pattern failed to compile");
            None
        },
    }
}

/// Converts byte offsets within a line to character offsets.
struct CharOffsets<'a> {
    line: &'a str,
    ascii: bool,
}

impl<'a> CharOffsets<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            line,
            ascii: line.is_ascii(),
        }
    }

    fn char_offset(&self, byte: usize) -> usize {
        if self.ascii {
            byte
        } else {
            self.line[..byte].chars().count()
        }
    }

    fn span(&self, start: usize, end: usize) -> Span {
        let start_char = self.char_offset(start);
        let len = if self.ascii {
            end - start
        } else {
            self.line[start..end].chars().count()
        };
        Span::new(start_char, start_char + len)
    }
}

/// Dictionary entries in source order, duplicates preserved.
///
/// `serde_json::Map` sorts its keys, which would lose the document order
/// that decides duplicate resolution and tie-breaking.
struct OrderedEntries(Vec<(String, KeywordEntry)>);

impl<'de> Deserialize<'de> for OrderedEntries {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = OrderedEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping keywords to {description, url}")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, entry)) = map.next_entry::<String, KeywordEntry>()? {
                    entries.push((key, entry));
                }
                Ok(OrderedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
