//! Polling watcher for the keyword dictionary file.
//!
//! The watcher compares successive observations of the file (existence,
//! modification time, length) and turns differences into
//! [`SourceEvent`]s. Detection is a pure function of two observations, so
//! the reaction to a change does not depend on timing.

use crate::models::SourceEvent;
use crate::services::KeywordAnnotator;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Default poll interval in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// One observation of the dictionary file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceState {
    /// Whether the file exists.
    pub exists: bool,
    /// Last modification time, when the platform reports it.
    pub modified: Option<SystemTime>,
    /// File length in bytes.
    pub len: u64,
}

impl SourceState {
    /// State of a file that does not exist.
    #[must_use]
    pub const fn absent() -> Self {
        Self {
            exists: false,
            modified: None,
            len: 0,
        }
    }

    /// Observes the file at `path`. Any metadata error counts as absent.
    pub async fn observe(path: &Path) -> Self {
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => Self {
                exists: true,
                modified: meta.modified().ok(),
                len: meta.len(),
            },
            _ => Self::absent(),
        }
    }
}

/// Derives the source event between two observations, if any.
#[must_use]
pub fn detect_change(previous: &SourceState, current: &SourceState) -> Option<SourceEvent> {
    match (previous.exists, current.exists) {
        (false, true) => Some(SourceEvent::Created),
        (true, false) => Some(SourceEvent::Deleted),
        (true, true) if previous != current => Some(SourceEvent::Changed),
        _ => None,
    }
}

/// Polls a dictionary file and emits change events.
#[derive(Debug, Clone)]
pub struct SourceWatcher {
    path: PathBuf,
    interval: Duration,
}

impl SourceWatcher {
    /// Creates a watcher for `path` with the default interval.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Sets the poll interval.
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Returns the watched path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Starts polling on the tokio runtime.
    ///
    /// The file's state when the task starts is the baseline and produces
    /// no event. The task ends when the returned receiver is dropped.
    #[must_use]
    pub fn spawn(&self) -> (mpsc::Receiver<SourceEvent>, JoinHandle<()>) {
        self.start(None)
    }

    /// Starts polling against a baseline observed by the caller.
    ///
    /// Observe the baseline before loading the file: any change made after
    /// that observation is then reported on the first poll.
    #[must_use]
    pub fn spawn_from(
        &self,
        baseline: SourceState,
    ) -> (mpsc::Receiver<SourceEvent>, JoinHandle<()>) {
        self.start(Some(baseline))
    }

    fn start(
        &self,
        baseline: Option<SourceState>,
    ) -> (mpsc::Receiver<SourceEvent>, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let path = self.path.clone();
        let period = self.interval.max(Duration::from_millis(1));

        let handle = tokio::spawn(async move {
            let mut previous = match baseline {
                Some(state) => state,
                None => SourceState::observe(&path).await,
            };
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let current = SourceState::observe(&path).await;
                if let Some(event) = detect_change(&previous, &current) {
                    tracing::debug!(event = %event, path = %path.display(), "Keyword source changed");
                    if sender.send(event).await.is_err() {
                        break;
                    }
                }
                previous = current;
            }
        });

        (receiver, handle)
    }
}

/// Applies events to `annotator` until the channel closes.
///
/// Returns the number of events applied.
pub async fn drive(
    annotator: &KeywordAnnotator,
    path: &Path,
    mut events: mpsc::Receiver<SourceEvent>,
) -> usize {
    let mut applied = 0;
    while let Some(event) = events.recv().await {
        annotator.apply(event, path);
        applied += 1;
    }
    applied
}
