//! CLI command implementations.
//!
//! The `kwdoc` binary acts as a minimal editor host: it feeds files and
//! cursor positions to the annotator and prints what an editor would show.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `hover` | Show the keyword and hover text at a line/column |
//! | `scan` | List every keyword occurrence in a file |
//! | `lookup` | Print the documentation URL for a keyword |
//! | `open` | Resolve the open-documentation action for a keyword |
//! | `keywords` | List the loaded dictionary |
//! | `watch` | Hot-reload the dictionary as it changes |
//!
//! # Example Usage
//!
//! ```bash
//! # What is under line 3, column 8?
//! kwdoc hover query.sql --line 3 --column 8
//!
//! # Every keyword with a documentation link
//! kwdoc scan query.sql --lenses
//!
//! # Documentation URL for a keyword
//! kwdoc lookup "create materialized view"
//! ```

mod hover;
mod keywords;
mod lookup;
mod scan;
mod watch;

pub use hover::{HoverPosition, cmd_hover, write_hover};
pub use keywords::{KeywordInfo, cmd_keywords, keyword_infos};
pub use lookup::{cmd_lookup, cmd_open, write_action};
pub use scan::{cmd_scan, write_lenses, write_matches};
pub use watch::cmd_watch;

use std::str::FromStr;

/// Output format shared by the commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text (default).
    #[default]
    Text,
    /// JSON.
    Json,
}

impl FromStr for OutputFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown output format '{other}' (expected text or json)"
            ))),
        }
    }
}

/// Reads a SQL document for the commands that take a file.
fn read_document(path: &std::path::Path) -> crate::Result<String> {
    std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
        operation: "read_document".to_string(),
        cause: format!("{}: {e}", path.display()),
    })
}
