//! JSON export of the `{projects, tasks}` pair.
//!
//! The document carries only the two collections, indented, with the same
//! record shape the store writes. There is no import counterpart.

use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::lock;
use crate::model::{Project, Task, WorkingSet};

#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub projects: &'a [Project],
    pub tasks: &'a [Task],
}

impl<'a> From<&'a WorkingSet> for ExportDocument<'a> {
    fn from(set: &'a WorkingSet) -> Self {
        Self {
            projects: &set.projects,
            tasks: &set.tasks,
        }
    }
}

pub fn to_json(set: &WorkingSet) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ExportDocument::from(set))?)
}

/// Write the export document to `path`, replacing any existing file.
pub fn write(set: &WorkingSet, path: &Path) -> Result<u64> {
    let json = to_json(set)?;
    lock::write_atomic(path, json.as_bytes())?;
    tracing::info!(path = %path.display(), bytes = json.len(), "exported working set");
    Ok(json.len() as u64)
}
