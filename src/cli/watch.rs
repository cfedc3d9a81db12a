//! CLI command that keeps the dictionary hot-reloaded.

use crate::models::{LoadOutcome, TableEvent};
use crate::services::watcher::drive;
use crate::services::{KeywordAnnotator, SourceState, SourceWatcher};
use std::future::Future;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Formats a table event for the console.
fn describe(event: &TableEvent) -> String {
    match event {
        TableEvent::Reloaded {
            outcome: LoadOutcome::Loaded { keywords },
            ..
        } => format!("reloaded: {keywords} keywords"),
        TableEvent::Reloaded {
            outcome: LoadOutcome::Missing,
            ..
        } => "reloaded: dictionary missing, table empty".to_string(),
        TableEvent::Reloaded {
            outcome: LoadOutcome::Invalid { cause },
            ..
        } => format!("reloaded: dictionary invalid ({cause}), table empty"),
        TableEvent::Cleared { .. } => "cleared: dictionary deleted".to_string(),
    }
}

/// Executes the watch command.
///
/// Loads the dictionary, then polls it and applies changes until
/// `shutdown` resolves. Each table change is printed to `writer`.
///
/// # Errors
///
/// Returns an error if writing fails.
pub async fn cmd_watch<W, S>(
    writer: &mut W,
    annotator: &KeywordAnnotator,
    path: &Path,
    interval: Duration,
    shutdown: S,
) -> Result<(), Box<dyn std::error::Error>>
where
    W: Write,
    S: Future<Output = ()>,
{
    let mut table_events = annotator.events().subscribe();
    let baseline = SourceState::observe(path).await;
    let initial = annotator.reload(path);
    writeln!(writer, "watching {}", path.display())?;
    writeln!(writer, "{}", describe(&TableEvent::reloaded(initial)))?;
    // The initial reload was already reported above.
    let _ = table_events.try_recv();

    let watcher = SourceWatcher::new(path).with_interval(interval);
    let (source_events, handle) = watcher.spawn_from(baseline);
    let applying = drive(annotator, path, source_events);
    tokio::pin!(applying);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            applied = &mut applying => {
                tracing::warn!(applied, "Keyword watcher stopped");
                break;
            },
            event = table_events.recv() => match event {
                Ok(event) => writeln!(writer, "{}", describe(&event))?,
                Err(e) => tracing::debug!(error = %e, "Table event stream interrupted"),
            },
        }
    }

    handle.abort();
    writeln!(writer, "stopped")?;
    Ok(())
}
