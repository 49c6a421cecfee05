use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::model::{DateInput, DependencyInput, Task};

pub const HEADERS: [&str; 7] = [
    "ID",
    "Name",
    "Start",
    "End",
    "Progress",
    "Dependencies",
    "Class",
];

fn date_text(input: Option<&DateInput>) -> String {
    match input {
        Some(DateInput::Text(s)) => s.clone(),
        Some(DateInput::Instant(t)) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => String::new(),
    }
}

/// Export tasks to a comma-delimited CSV file that [`import_csv`] reads
/// back to the same tasks. Dates the input never supplied are left empty.
/// Returns the number of tasks written.
///
/// [`import_csv`]: super::csv_import::import_csv
pub fn export_csv(tasks: &[Task], path: &Path) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b',')
        .from_path(path)?;

    wtr.write_record(HEADERS)?;

    for task in tasks {
        let raw = task.to_raw();
        let dependencies = match &raw.dependencies {
            Some(DependencyInput::List(list)) => list.join(","),
            Some(DependencyInput::Text(text)) => text.clone(),
            None => String::new(),
        };
        let start = date_text(raw.start.as_ref());
        let end = date_text(raw.end.as_ref());
        let progress = raw.progress.unwrap_or(0).to_string();
        wtr.write_record([
            raw.id.as_deref().unwrap_or_default(),
            raw.name.as_str(),
            start.as_str(),
            end.as_str(),
            progress.as_str(),
            dependencies.as_str(),
            raw.custom_class.as_deref().unwrap_or_default(),
        ])?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    info!(path = %path.display(), tasks = tasks.len(), "csv exported");
    Ok(tasks.len())
}
