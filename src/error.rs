use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the chart engine and its persistence layer.
///
/// Bad task data never ends up here: the normalizer repairs it and flags
/// the task as invalid instead.
#[derive(Debug, Error)]
pub enum GanttError {
    #[error("invalid option '{field}': {reason}")]
    InvalidOption { field: &'static str, reason: String },

    #[error("unknown view mode '{0}'")]
    UnknownViewMode(String),

    #[error("unknown language '{0}'")]
    UnknownLanguage(String),

    #[error("io error at {path}: {source}")]
    IoPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is missing required columns (found headers: {found:?}); need at least a task name column")]
    MissingColumns { found: Vec<String> },

    #[error("CSV file is empty or has no data rows")]
    EmptyCsv,
}

pub type Result<T> = std::result::Result<T, GanttError>;
