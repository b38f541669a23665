//! taskrank-ingest: load task snapshots (CSV exports, markdown task lists) into typed tasks.

pub mod parsers;
pub mod types;

use anyhow::{Result, bail};
use std::path::Path;
use taskrank_core::Task;

pub use parsers::csv_tasks::{load_tasks_csv, parse_tasks_csv};
pub use parsers::markdown::{load_tasks_md, parse_tasks_md};
pub use types::SnapshotFormat;

/// Load a snapshot, picking the parser from the file extension.
pub fn load_tasks(path: impl AsRef<Path>) -> Result<Vec<Task>> {
    let path = path.as_ref();
    let Some(format) = SnapshotFormat::from_path(path) else {
        bail!(
            "unsupported task file: {} (expected .csv or .md)",
            path.display()
        );
    };

    let tasks = match format {
        SnapshotFormat::Csv => load_tasks_csv(path)?,
        SnapshotFormat::Markdown => load_tasks_md(path)?,
    };
    tracing::debug!(path = %path.display(), ?format, tasks = tasks.len(), "loaded snapshot");
    Ok(tasks)
}

/// Keep only tasks that are still open; ranking assumes every input is eligible.
pub fn pending(tasks: Vec<Task>) -> Vec<Task> {
    tasks.into_iter().filter(|t| !t.is_completed).collect()
}
