// Snapshot serialization for the persisted task list

use crate::models::Task;
use eyre::{Context, Result};
use tracing::{info, warn};

/// Serialize the task list to its persisted form: a JSON array of task
/// records in storage order.
pub fn encode(tasks: &[Task]) -> Result<String> {
    serde_json::to_string(tasks).context("Failed to serialize task list")
}

/// Parse a persisted slot value back into a task list.
///
/// The slot holds one JSON document; a value that does not parse as a task
/// array is discarded wholesale and yields an empty list, never an error.
pub fn decode(value: &str) -> Vec<Task> {
    match serde_json::from_str::<Vec<Task>>(value) {
        Ok(tasks) => {
            info!(count = tasks.len(), "Loaded tasks from snapshot");
            tasks
        }
        Err(e) => {
            warn!(error = ?e, "Failed to parse task snapshot, starting empty");
            Vec::new()
        }
    }
}
