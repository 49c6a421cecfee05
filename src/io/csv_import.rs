use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::{GanttError, Result};
use crate::model::calendar;
use crate::model::{DateInput, DependencyInput, RawTask};

/// Day-first and US layouts accepted besides the native `YYYY-MM-DD`.
const ALTERNATE_DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d", "%m-%d-%Y",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    Name,
    Start,
    End,
    Progress,
    Dependencies,
    Class,
}

/// Map a status word to a progress percentage.
fn status_to_progress(status: &str) -> Option<u32> {
    match status.trim().to_lowercase().as_str() {
        "finished" | "done" | "complete" | "completed" => Some(100),
        "in progress" | "in-progress" | "active" | "started" => Some(50),
        "released" | "planned" => Some(25),
        "firm planned" | "firm-planned" | "not started" | "not-started" | "new" => Some(0),
        _ => None,
    }
}

/// A number, optionally with a `%` sign, or a status word.
fn parse_progress(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let numeric = s.trim_end_matches('%').trim();
    if let Ok(value) = numeric.parse::<f64>() {
        if value.is_finite() && value >= 0.0 {
            return Some(value.min(100.0).trunc() as u32);
        }
    }
    status_to_progress(s)
}

/// Keep native date text as is and rewrite other common layouts to
/// `YYYY-MM-DD`. Text no layout accepts is passed through so the
/// normalizer flags the task.
fn date_input(s: &str) -> Option<DateInput> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if calendar::parse(s).is_some() {
        return Some(DateInput::Text(s.to_string()));
    }
    let rewritten = ALTERNATE_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .map(|d| d.format("%Y-%m-%d").to_string());
    Some(DateInput::Text(rewritten.unwrap_or_else(|| s.to_string())))
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

/// Normalize a header string to a canonical column key.
fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_'], "")
}

fn header_to_column(normalized: &str) -> Option<Column> {
    match normalized {
        "id" | "taskid" | "key" | "uid" => Some(Column::Id),

        "name" | "task" | "tasklabel" | "taskname" | "label" | "title" | "activity" => {
            Some(Column::Name)
        }

        "start" | "startdate" | "from" | "begin" | "begindate" => Some(Column::Start),

        "end" | "enddate" | "to" | "finish" | "finishdate" | "due" | "duedate" => {
            Some(Column::End)
        }

        "progress" | "status" | "state" | "complete" | "percentcomplete" | "stage" => {
            Some(Column::Progress)
        }

        "dependencies" | "dependency" | "dependson" | "predecessors" | "after" => {
            Some(Column::Dependencies)
        }

        "class" | "customclass" | "css" | "style" => Some(Column::Class),

        _ => None,
    }
}

/// Import task records from a CSV file.
///
/// Auto-detects the delimiter (comma, semicolon, tab) and matches column
/// headers flexibly ("Task Label", "Start Date", ...). Only a name column
/// is required; rows without a name are skipped. Dates are kept as text
/// for the normalizer to judge.
/// Returns `(tasks, skipped_count)`.
pub fn import_csv(path: &Path) -> Result<(Vec<RawTask>, usize)> {
    let content = std::fs::read_to_string(path).map_err(|source| GanttError::IoPath {
        path: path.to_path_buf(),
        source,
    })?;
    let (tasks, skipped) = import_csv_str(&content)?;
    info!(path = %path.display(), tasks = tasks.len(), skipped, "csv imported");
    Ok((tasks, skipped))
}

pub fn import_csv_str(content: &str) -> Result<(Vec<RawTask>, usize)> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let columns: Vec<Option<Column>> = headers
        .iter()
        .map(|h| header_to_column(&normalize_header(h)))
        .collect();

    if !columns.contains(&Some(Column::Name)) {
        return Err(GanttError::MissingColumns {
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    let mut tasks: Vec<RawTask> = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(row = i + 2, error = %e, "skipping unreadable csv row");
                skipped += 1;
                continue;
            }
        };

        let mut raw = RawTask::default();
        for (field, column) in record.iter().zip(&columns) {
            let field = field.trim();
            match column {
                Some(Column::Id) if !field.is_empty() => raw.id = Some(field.to_string()),
                Some(Column::Name) => raw.name = field.to_string(),
                Some(Column::Start) => raw.start = date_input(field),
                Some(Column::End) => raw.end = date_input(field),
                Some(Column::Progress) => raw.progress = parse_progress(field),
                Some(Column::Dependencies) if !field.is_empty() => {
                    raw.dependencies = Some(DependencyInput::Text(field.to_string()));
                }
                Some(Column::Class) if !field.is_empty() => {
                    raw.custom_class = Some(field.to_string());
                }
                _ => {}
            }
        }

        if raw.name.is_empty() {
            skipped += 1;
            continue;
        }
        tasks.push(raw);
    }

    if tasks.is_empty() {
        return Err(GanttError::EmptyCsv);
    }
    Ok((tasks, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_semicolon_delimiter_and_aliases() {
        let csv = "Task Label;Start Date;End Date;Status\n\
                   Design;2024-01-01;2024-01-05;In Progress\n\
                   Build;02/01/2024;10/01/2024;done\n";
        let (tasks, skipped) = import_csv_str(csv).unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].name, "Design");
        assert_eq!(tasks[0].progress, Some(50));
        assert_eq!(tasks[1].start, Some(DateInput::Text("2024-01-02".into())));
        assert_eq!(tasks[1].end, Some(DateInput::Text("2024-01-10".into())));
        assert_eq!(tasks[1].progress, Some(100));
    }

    #[test]
    fn test_reads_ids_dependencies_and_numeric_progress() {
        let csv = "id,name,start,end,progress,dependencies,class\n\
                   a,Plan,2024-03-01,2024-03-02,40%,,milestone\n\
                   b,Do,2024-03-03 09:00,2024-03-04,,\"a, x\",\n";
        let (tasks, _) = import_csv_str(csv).unwrap();
        assert_eq!(tasks[0].id.as_deref(), Some("a"));
        assert_eq!(tasks[0].progress, Some(40));
        assert_eq!(tasks[0].custom_class.as_deref(), Some("milestone"));
        assert_eq!(tasks[0].dependencies, None);
        assert_eq!(
            tasks[1].dependencies,
            Some(DependencyInput::Text("a, x".into()))
        );
        assert_eq!(tasks[1].progress, None);
    }

    #[test]
    fn test_rows_without_name_are_skipped() {
        let csv = "name,start\n,2024-01-01\nKeep,2024-01-02\n";
        let (tasks, skipped) = import_csv_str(csv).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(skipped, 1);
    }

    #[test]
    fn test_missing_name_column_is_an_error() {
        let err = import_csv_str("start,end\n2024-01-01,2024-01-02\n").unwrap_err();
        assert!(matches!(err, GanttError::MissingColumns { .. }));
    }

    #[test]
    fn test_header_only_file_is_empty() {
        assert!(matches!(
            import_csv_str("name,start,end\n"),
            Err(GanttError::EmptyCsv)
        ));
    }

    #[test]
    fn test_unknown_date_text_is_passed_through() {
        assert_eq!(date_input("next week"), Some(DateInput::Text("next week".into())));
        assert_eq!(date_input("  "), None);
    }
}
