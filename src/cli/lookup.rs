//! CLI commands resolving keyword documentation links.

use super::OutputFormat;
use crate::services::{DocAction, EditorActions, KeywordAnnotator, not_found_message};
use std::io::Write;

/// Writes an open-documentation action.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_action<W: Write>(
    writer: &mut W,
    action: &DocAction,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => writeln!(writer, "{}", serde_json::to_string_pretty(action)?)?,
        OutputFormat::Text => match action {
            DocAction::Open { keyword, url } => writeln!(writer, "open {url} ({keyword})")?,
            DocAction::NotFound { message } => writeln!(writer, "{message}")?,
        },
    }
    Ok(())
}

/// Executes the lookup command: prints the URL, or the not-found notice.
///
/// A missing keyword is informational and does not fail the command.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn cmd_lookup<W: Write>(
    writer: &mut W,
    annotator: &KeywordAnnotator,
    keyword: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    match annotator.resolve_url(keyword) {
        Some(url) => writeln!(writer, "{url}")?,
        None => writeln!(writer, "{}", not_found_message(keyword))?,
    }
    Ok(())
}

/// Executes the open command: resolves and prints the action a host would
/// take.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn cmd_open<W: Write>(
    writer: &mut W,
    actions: &EditorActions<'_>,
    keyword: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let action = actions.open_doc(keyword);
    write_action(writer, &action, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotator() -> KeywordAnnotator {
        let annotator = KeywordAnnotator::new();
        annotator.load_str(r#"{"SELECT": {"description": "fetch rows", "url": "https://x/select"}}"#);
        annotator
    }

    #[test]
    fn test_lookup_hit_and_miss() {
        let annotator = annotator();
        let mut out = Vec::new();
        cmd_lookup(&mut out, &annotator, "select").expect("lookup");
        cmd_lookup(&mut out, &annotator, "UPSERT").expect("lookup");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "https://x/select\nNo documentation link found for keyword [UPSERT].\n"
        );
    }

    #[test]
    fn test_open_text_and_json() {
        let annotator = annotator();
        let actions = EditorActions::new(&annotator, "sql");

        let mut out = Vec::new();
        cmd_open(&mut out, &actions, "SELECT", OutputFormat::Text).expect("open");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "open https://x/select (SELECT)\n"
        );

        let mut out = Vec::new();
        cmd_open(&mut out, &actions, "nope", OutputFormat::Json).expect("open");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(value["action"], "not_found");
    }
}
