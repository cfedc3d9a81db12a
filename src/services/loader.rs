//! Fail-soft dictionary loading.
//!
//! Loading never returns an error to the caller. A missing source or a
//! malformed one yields an empty table together with a [`LoadOutcome`]
//! describing what happened, so the host can decide whether to surface a
//! diagnostic.

use crate::models::LoadOutcome;
use crate::services::KeywordTable;
use std::io::ErrorKind;
use std::path::Path;

/// Parses a dictionary source, falling back to an empty table.
#[must_use]
pub fn parse_table(source: &str) -> (KeywordTable, LoadOutcome) {
    match KeywordTable::from_json(source) {
        Ok(table) => {
            let keywords = table.len();
            (table, LoadOutcome::Loaded { keywords })
        },
        Err(e) => {
            tracing::warn!(error = %e, "Keyword dictionary is malformed, using empty table");
            (
                KeywordTable::empty(),
                LoadOutcome::Invalid {
                    cause: e.to_string(),
                },
            )
        },
    }
}

/// Reads and parses the dictionary at `path`, falling back to an empty
/// table.
#[must_use]
pub fn load_table(path: &Path) -> (KeywordTable, LoadOutcome) {
    match std::fs::read_to_string(path) {
        Ok(source) => parse_table(&source),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Keyword dictionary not found");
            (KeywordTable::empty(), LoadOutcome::Missing)
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Keyword dictionary is unreadable, using empty table"
            );
            (
                KeywordTable::empty(),
                LoadOutcome::Invalid {
                    cause: format!("{}: {e}", path.display()),
                },
            )
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_parse_valid() {
        let (table, outcome) =
            parse_table(r#"{"SELECT": {"description": "fetch rows", "url": "https://x/select"}}"#);
        assert_eq!(outcome, LoadOutcome::Loaded { keywords: 1 });
        assert!(table.get("select").is_some());
    }

    #[test]
    fn test_parse_invalid_is_empty() {
        let (table, outcome) = parse_table(r#"{"SELECT": {"description": "#);
        assert!(table.is_empty());
        assert_eq!(outcome.label(), "invalid");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().expect("temp dir");
        let (table, outcome) = load_table(&dir.path().join("keywords.json"));
        assert!(table.is_empty());
        assert_eq!(outcome, LoadOutcome::Missing);
    }

    #[test]
    fn test_load_directory_is_invalid() {
        let dir = TempDir::new().expect("temp dir");
        let (table, outcome) = load_table(dir.path());
        assert!(table.is_empty());
        assert!(!outcome.is_loaded());
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"ALTER TABLE": {{"description": "change a table", "url": "https://x/alter"}}}}"#
        )
        .expect("write dictionary");
        let (table, outcome) = load_table(file.path());
        assert!(outcome.is_loaded());
        assert_eq!(
            table.get("alter table").map(|e| e.url.as_str()),
            Some("https://x/alter")
        );
    }
}
