//! Result presentation.

use std::time::Duration;

use crate::fetch::Todo;
use crate::operation::{BatchResult, Outcome};

/// Shorten `s` to `max` characters, appending "..." when truncated.
pub fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((end, _)) => format!("{}...", &s[..end]),
        None => s.to_string(),
    }
}

/// Round to whole milliseconds for display.
pub fn round_millis(elapsed: Duration) -> Duration {
    Duration::from_millis(elapsed.as_millis() as u64)
}

/// One line of the batch listing.
pub fn todo_line(todo: &Todo, title_width: usize) -> String {
    format!(
        "- ID: {:2} | Status: {:<9} | Title: {}",
        todo.id,
        todo.status(),
        truncate(&todo.title, title_width)
    )
}

pub fn report_single(outcome: &Outcome<Todo>, elapsed: Duration) {
    let elapsed = round_millis(elapsed);
    match outcome {
        Ok(todo) => tracing::info!("Successfully fetched todo after {:?}: {:?}", elapsed, todo),
        Err(e) => tracing::info!(kind = ?e.kind(), "Error after {:?}: {}", elapsed, e),
    }
}

pub fn report_batch(batch: &BatchResult<Todo>, elapsed: Duration, title_width: usize) {
    tracing::info!("Completed in {:?}", round_millis(elapsed));
    tracing::info!(
        "Successfully fetched {}/{} todos:",
        batch.records.len(),
        batch.dispatched
    );
    for todo in &batch.records {
        tracing::info!("{}", todo_line(todo, title_width));
    }

    if !batch.pending.is_empty() {
        tracing::info!(pending = ?batch.pending, "Still outstanding at the deadline");
    }
    if let Some(failure) = batch.failure() {
        tracing::info!("Note: Some requests failed: {}", failure);
    }
}

/// Separator printed between scenarios.
pub fn separator() -> String {
    "-".repeat(80)
}
