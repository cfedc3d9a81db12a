//! CLI command showing the keyword under a cursor position.

use super::{OutputFormat, read_document};
use crate::services::{EditorActions, Hover};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// A 1-based line/column position, as editors display it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverPosition {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, in characters.
    pub column: usize,
}

impl HoverPosition {
    /// Returns the 0-based `(line index, character offset)`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidInput`] if either value is zero.
    pub fn to_zero_based(self) -> crate::Result<(usize, usize)> {
        match (self.line.checked_sub(1), self.column.checked_sub(1)) {
            (Some(line), Some(column)) => Ok((line, column)),
            _ => Err(crate::Error::InvalidInput(
                "line and column are 1-based".to_string(),
            )),
        }
    }
}

#[derive(Serialize)]
struct HoverOutput<'a> {
    line: usize,
    #[serde(flatten)]
    hover: Option<&'a Hover>,
}

/// Writes hover content for one position.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_hover<W: Write>(
    writer: &mut W,
    hover: Option<&Hover>,
    position: HoverPosition,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            let out = HoverOutput {
                line: position.line,
                hover,
            };
            writeln!(writer, "{}", serde_json::to_string_pretty(&out)?)?;
        },
        OutputFormat::Text => match hover {
            Some(hover) => {
                writeln!(
                    writer,
                    "{}:{}-{} {}",
                    position.line,
                    hover.span.start + 1,
                    hover.span.end + 1,
                    hover.keyword
                )?;
                writeln!(writer)?;
                writeln!(writer, "{}", hover.markdown)?;
                if let Some(url) = &hover.url {
                    writeln!(writer)?;
                    writeln!(writer, "{url}")?;
                }
            },
            None => {
                writeln!(
                    writer,
                    "No keyword at {}:{}",
                    position.line, position.column
                )?;
            },
        },
    }
    Ok(())
}

/// Executes the hover command against a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the position is outside
/// the file, or output fails.
pub fn cmd_hover<W: Write>(
    writer: &mut W,
    actions: &EditorActions<'_>,
    file: &Path,
    position: HoverPosition,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let (line_index, cursor) = position.to_zero_based()?;
    let document = read_document(file)?;
    let line = document.lines().nth(line_index).ok_or_else(|| {
        crate::Error::InvalidInput(format!(
            "{} has no line {}",
            file.display(),
            position.line
        ))
    })?;

    let hover = actions.hover(line, cursor);
    write_hover(writer, hover.as_ref(), position, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::KeywordAnnotator;
    use tempfile::TempDir;

    fn setup() -> (TempDir, std::path::PathBuf, KeywordAnnotator) {
        let dir = TempDir::new().expect("temp dir");
        let file = dir.path().join("query.sql");
        std::fs::write(&file, "-- report\nCREATE MATERIALIZED VIEW mv AS\nSELECT 1;\n")
            .expect("write sql");
        let annotator = KeywordAnnotator::new();
        annotator.load_str(
            r#"{"CREATE": {"description": "create an object", "url": "https://x/create"},
                "CREATE MATERIALIZED VIEW": {"description": "precomputed view", "url": "https://x/mv"}}"#,
        );
        (dir, file, annotator)
    }

    #[test]
    fn test_hover_text() {
        let (_dir, file, annotator) = setup();
        let actions = EditorActions::new(&annotator, "sql");
        let mut out = Vec::new();
        cmd_hover(
            &mut out,
            &actions,
            &file,
            HoverPosition { line: 2, column: 10 },
            OutputFormat::Text,
        )
        .expect("hover");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with("2:1-25 CREATE MATERIALIZED VIEW"));
        assert!(text.contains("**CREATE MATERIALIZED VIEW**\n\nprecomputed view"));
        assert!(text.trim_end().ends_with("https://x/mv"));
    }

    #[test]
    fn test_hover_miss() {
        let (_dir, file, annotator) = setup();
        let actions = EditorActions::new(&annotator, "sql");
        let mut out = Vec::new();
        cmd_hover(
            &mut out,
            &actions,
            &file,
            HoverPosition { line: 3, column: 2 },
            OutputFormat::Text,
        )
        .expect("hover");
        assert_eq!(String::from_utf8(out).expect("utf8"), "No keyword at 3:2\n");
    }

    #[test]
    fn test_hover_out_of_range() {
        let (_dir, file, annotator) = setup();
        let actions = EditorActions::new(&annotator, "sql");
        let mut out = Vec::new();
        let result = cmd_hover(
            &mut out,
            &actions,
            &file,
            HoverPosition { line: 9, column: 1 },
            OutputFormat::Text,
        );
        assert!(result.is_err());
        assert!(HoverPosition { line: 0, column: 1 }.to_zero_based().is_err());
    }

    #[test]
    fn test_hover_json() {
        let (_dir, file, annotator) = setup();
        let actions = EditorActions::new(&annotator, "sql");
        let mut out = Vec::new();
        cmd_hover(
            &mut out,
            &actions,
            &file,
            HoverPosition { line: 2, column: 1 },
            OutputFormat::Json,
        )
        .expect("hover");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(value["keyword"], "CREATE MATERIALIZED VIEW");
        assert_eq!(value["span"]["start"], 0);
        assert_eq!(value["url"], "https://x/mv");
    }
}
