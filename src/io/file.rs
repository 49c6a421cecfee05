use std::path::Path;

use tracing::info;

use crate::error::{GanttError, Result};
use crate::model::Project;

/// Save a project to a JSON file.
pub fn save_project(project: &Project, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(project).map_err(|source| GanttError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| GanttError::IoPath {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), tasks = project.tasks.len(), "project saved");
    Ok(())
}

/// Load a project from a JSON file.
pub fn load_project(path: &Path) -> Result<Project> {
    let json = std::fs::read_to_string(path).map_err(|source| GanttError::IoPath {
        path: path.to_path_buf(),
        source,
    })?;
    let project: Project = serde_json::from_str(&json).map_err(|source| GanttError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), tasks = project.tasks.len(), "project loaded");
    Ok(project)
}
