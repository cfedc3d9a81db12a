//! # kwdoc
//!
//! SQL keyword documentation for editors.
//!
//! kwdoc loads a JSON dictionary mapping SQL keywords (including
//! multi-word keywords such as `CREATE MATERIALIZED VIEW`) to a description
//! and a documentation URL, and answers the questions an editor host asks:
//!
//! - which keyword is under the cursor, and where does it start and end
//! - where are all keywords in a document
//! - which URL documents a keyword
//!
//! The dictionary can be replaced at runtime when its file changes; readers
//! always see either the old table or the new one, never a mix.
//!
//! ## Example
//!
//! ```rust
//! use kwdoc::KeywordAnnotator;
//!
//! let annotator = KeywordAnnotator::new();
//! annotator.load_str(r#"{
//!     "SELECT": {"description": "fetch rows", "url": "https://x/select"},
//!     "CREATE MATERIALIZED VIEW": {"description": "create a view", "url": "https://x/mv"}
//! }"#);
//!
//! let found = annotator.resolve_at("SELECT * FROM t", 2).map(|m| m.keyword);
//! assert_eq!(found.as_deref(), Some("SELECT"));
//! assert_eq!(annotator.resolve_url("select").as_deref(), Some("https://x/select"));
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod cli;
pub mod config;
pub mod models;
pub mod observability;
pub mod services;

pub use config::KwdocConfig;
pub use models::{DocumentMatch, KeywordEntry, KeywordMatch, LoadOutcome, SourceEvent, Span};
pub use services::{DocAction, EditorActions, KeywordAnnotator, KeywordTable};

/// Error type for kwdoc operations.
///
/// Query operations never fail; errors come from configuration, logging
/// setup, and file access in the CLI.
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Bad CLI arguments, unknown config values |
/// | `OperationFailed` | I/O errors, logging already initialized |
/// | `InvalidDictionary` | Dictionary source is not a JSON object of entries |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// The keyword dictionary could not be parsed.
    ///
    /// The loader recovers from this by installing an empty table; it only
    /// surfaces from [`KeywordTable::from_json`].
    #[error("invalid keyword dictionary: {0}")]
    InvalidDictionary(String),
}

/// Result type alias for kwdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the current Unix timestamp in seconds.
///
/// Falls back to 0 if the system clock is before the Unix epoch.
#[must_use]
pub fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
