//! CLI command for listing the loaded keyword dictionary.

use super::OutputFormat;
use crate::services::KeywordAnnotator;
use serde::Serialize;
use std::io::{self, Write};

/// A dictionary row for display.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordInfo {
    /// Normalized keyword.
    pub keyword: String,
    /// Description, possibly empty.
    pub description: String,
    /// Documentation URL, possibly empty.
    pub url: String,
}

/// Returns the current table as display rows, in table order.
#[must_use]
pub fn keyword_infos(annotator: &KeywordAnnotator) -> Vec<KeywordInfo> {
    annotator
        .snapshot()
        .iter()
        .map(|(keyword, entry)| KeywordInfo {
            keyword: keyword.to_string(),
            description: entry.description.clone(),
            url: entry.url.clone(),
        })
        .collect()
}

/// Writes keywords as a table to the given writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_table<W: Write>(
    writer: &mut W,
    keywords: &[KeywordInfo],
    verbose: bool,
) -> io::Result<()> {
    let width = keywords
        .iter()
        .map(|k| k.keyword.chars().count())
        .max()
        .unwrap_or(0)
        .max("KEYWORD".len())
        + 2;

    if verbose {
        writeln!(writer, "{:<width$}{:<40}URL", "KEYWORD", "DESCRIPTION")?;
        for k in keywords {
            writeln!(writer, "{:<width$}{:<40}{}", k.keyword, k.description, k.url)?;
        }
    } else {
        writeln!(writer, "{:<width$}URL", "KEYWORD")?;
        for k in keywords {
            writeln!(writer, "{:<width$}{}", k.keyword, k.url)?;
        }
    }
    Ok(())
}

/// Writes keywords as JSON to the given writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write>(
    writer: &mut W,
    keywords: &[KeywordInfo],
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(keywords)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Executes the keywords command.
///
/// # Errors
///
/// Returns an error if serialization or output fails.
pub fn cmd_keywords<W: Write>(
    writer: &mut W,
    annotator: &KeywordAnnotator,
    format: OutputFormat,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let keywords = keyword_infos(annotator);

    match format {
        OutputFormat::Text => {
            write_table(writer, &keywords, verbose)?;
            Ok(())
        },
        OutputFormat::Json => write_json(writer, &keywords),
    }
}
