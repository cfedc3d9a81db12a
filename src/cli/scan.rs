//! CLI command listing keyword occurrences in a file.

use super::{OutputFormat, read_document};
use crate::models::DocumentMatch;
use crate::services::{CodeLens, EditorActions, KeywordAnnotator};
use std::io::{self, Write};
use std::path::Path;

/// Writes scan matches, one per line as `line:start-end KEYWORD` (1-based).
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_matches<W: Write>(
    writer: &mut W,
    matches: &[DocumentMatch],
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => writeln!(writer, "{}", serde_json::to_string_pretty(matches)?)?,
        OutputFormat::Text => {
            for m in matches {
                write_location(writer, m.line, m.span.start, m.span.end)?;
                writeln!(writer, " {}", m.keyword)?;
            }
        },
    }
    Ok(())
}

/// Writes code lenses, one per line as `line:start-end KEYWORD title`.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_lenses<W: Write>(
    writer: &mut W,
    lenses: &[CodeLens],
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => writeln!(writer, "{}", serde_json::to_string_pretty(lenses)?)?,
        OutputFormat::Text => {
            for lens in lenses {
                write_location(writer, lens.line, lens.span.start, lens.span.end)?;
                writeln!(writer, " {} {}", lens.keyword, lens.title)?;
            }
        },
    }
    Ok(())
}

fn write_location<W: Write>(writer: &mut W, line: usize, start: usize, end: usize) -> io::Result<()> {
    write!(writer, "{}:{}-{}", line + 1, start + 1, end + 1)
}

/// Executes the scan command against a file.
///
/// With `lenses`, only occurrences of keywords that have a documentation
/// URL are listed.
///
/// # Errors
///
/// Returns an error if the file cannot be read or output fails.
pub fn cmd_scan<W: Write>(
    writer: &mut W,
    annotator: &KeywordAnnotator,
    actions: &EditorActions<'_>,
    file: &Path,
    lenses: bool,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let document = read_document(file)?;

    if lenses {
        let found = actions.code_lenses(document.lines());
        tracing::debug!(file = %file.display(), lenses = found.len(), "Scanned document");
        write_lenses(writer, &found, format)
    } else {
        let found: Vec<DocumentMatch> = annotator.scan_text(&document).collect();
        tracing::debug!(file = %file.display(), matches = found.len(), "Scanned document");
        write_matches(writer, &found, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, std::path::PathBuf, KeywordAnnotator) {
        let dir = TempDir::new().expect("temp dir");
        let file = dir.path().join("query.sql");
        std::fs::write(&file, "select a\r\nfrom t\nwhere a > 1\n").expect("write sql");
        let annotator = KeywordAnnotator::new();
        annotator.load_str(
            r#"{"SELECT": {"description": "fetch rows", "url": "https://x/select"},
                "FROM": {"description": "source", "url": ""},
                "WHERE": {"description": "filter", "url": "https://x/where"}}"#,
        );
        (dir, file, annotator)
    }

    #[test]
    fn test_scan_text() {
        let (_dir, file, annotator) = setup();
        let actions = EditorActions::new(&annotator, "sql");
        let mut out = Vec::new();
        cmd_scan(&mut out, &annotator, &actions, &file, false, OutputFormat::Text)
            .expect("scan");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "1:1-7 SELECT\n2:1-5 FROM\n3:1-6 WHERE\n"
        );
    }

    #[test]
    fn test_scan_lenses() {
        let (_dir, file, annotator) = setup();
        let actions = EditorActions::new(&annotator, "sql");
        let mut out = Vec::new();
        cmd_scan(&mut out, &annotator, &actions, &file, true, OutputFormat::Text)
            .expect("scan");
        let text = String::from_utf8(out).expect("utf8");
        let keywords: Vec<&str> = text
            .lines()
            .filter_map(|l| l.split_whitespace().nth(1))
            .collect();
        assert_eq!(keywords, vec!["SELECT", "WHERE"]);
    }

    #[test]
    fn test_scan_json() {
        let (_dir, file, annotator) = setup();
        let actions = EditorActions::new(&annotator, "sql");
        let mut out = Vec::new();
        cmd_scan(&mut out, &annotator, &actions, &file, false, OutputFormat::Json)
            .expect("scan");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(value[1]["line"], 1);
        assert_eq!(value[1]["keyword"], "FROM");
    }

    #[test]
    fn test_scan_missing_file() {
        let (dir, _file, annotator) = setup();
        let actions = EditorActions::new(&annotator, "sql");
        let mut out = Vec::new();
        let result = cmd_scan(
            &mut out,
            &annotator,
            &actions,
            &dir.path().join("absent.sql"),
            false,
            OutputFormat::Text,
        );
        assert!(result.is_err());
    }
}
