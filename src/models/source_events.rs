//! Dictionary source and table lifecycle events.

use crate::current_timestamp;
use std::fmt;

/// A change to the dictionary source, as reported by the editor host or
/// the polling watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceEvent {
    /// The source file was modified.
    Changed,
    /// The source file appeared.
    Created,
    /// The source file was removed.
    Deleted,
}

impl SourceEvent {
    /// Returns the event name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Changed => "changed",
            Self::Created => "created",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for SourceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of loading a dictionary source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The source was parsed and installed.
    Loaded {
        /// Number of keywords in the new table.
        keywords: usize,
    },
    /// The source does not exist; the table is empty.
    Missing,
    /// The source could not be read or parsed; the table is empty.
    Invalid {
        /// Why loading failed.
        cause: String,
    },
}

impl LoadOutcome {
    /// Returns a short label for logs and metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Loaded { .. } => "loaded",
            Self::Missing => "missing",
            Self::Invalid { .. } => "invalid",
        }
    }

    /// Returns true if a table was installed from the source.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Events broadcast when the keyword table is replaced.
#[derive(Debug, Clone)]
pub enum TableEvent {
    /// A new table was installed by a reload.
    Reloaded {
        /// How the reload went.
        outcome: LoadOutcome,
        /// Unix timestamp in seconds.
        timestamp: u64,
    },
    /// The table was reset to empty.
    Cleared {
        /// Unix timestamp in seconds.
        timestamp: u64,
    },
}

impl TableEvent {
    /// Creates a reload event stamped with the current time.
    #[must_use]
    pub fn reloaded(outcome: LoadOutcome) -> Self {
        Self::Reloaded {
            outcome,
            timestamp: current_timestamp(),
        }
    }

    /// Creates a clear event stamped with the current time.
    #[must_use]
    pub fn cleared() -> Self {
        Self::Cleared {
            timestamp: current_timestamp(),
        }
    }

    /// Returns the event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Reloaded { .. } => "reloaded",
            Self::Cleared { .. } => "cleared",
        }
    }
}
