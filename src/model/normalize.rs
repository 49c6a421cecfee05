//! Turns raw task records into canonical [`Task`]s.
//!
//! Missing or broken dates are never an error here: defaults are
//! synthesized and the task is flagged `invalid`, which keeps it on the
//! chart but out of drag editing.

use chrono::NaiveDateTime;
use tracing::warn;
use uuid::Uuid;

use super::calendar::{self, TimeUnit};
use super::task::{DateInput, DependencyInput, RawTask, Task};

/// Spans longer than this many (flat, 360-day) years drop their end date.
pub const MAX_SPAN_YEARS: i64 = 10;
/// Days added to or subtracted from a known date when the other is missing.
pub const DEFAULT_SPAN_DAYS: i64 = 2;
pub const GENERATED_ID_SUFFIX_LEN: usize = 10;

/// Normalize every record in order; the row index is the output position.
pub fn normalize_tasks(raw: &[RawTask], today: NaiveDateTime) -> Vec<Task> {
    raw.iter()
        .enumerate()
        .map(|(index, r)| normalize_task(r, index, today))
        .collect()
}

pub fn normalize_task(raw: &RawTask, index: usize, today: NaiveDateTime) -> Task {
    let start = resolve(raw.start.as_ref());
    let mut end = resolve(raw.end.as_ref());

    if let (Some(s), Some(e)) = (start, end) {
        if calendar::diff(e, s, TimeUnit::Year) > MAX_SPAN_YEARS {
            warn!(task = %raw.name, "span exceeds {MAX_SPAN_YEARS} years, discarding end date");
            end = None;
        }
    }

    let start_supplied = start.is_some();
    let mut end_supplied = end.is_some();

    let (start_at, mut end_at) = match (start, end) {
        (None, None) => (today, calendar::add(today, DEFAULT_SPAN_DAYS, TimeUnit::Day)),
        (Some(s), None) => (s, calendar::add(s, DEFAULT_SPAN_DAYS, TimeUnit::Day)),
        (None, Some(e)) => (calendar::add(e, -DEFAULT_SPAN_DAYS, TimeUnit::Day), e),
        (Some(s), Some(e)) => (s, e),
    };

    // A bare end date covers that whole day.
    if end_supplied && !calendar::has_time_of_day(end_at) {
        end_at = calendar::add(end_at, 24, TimeUnit::Hour);
    }

    if end_at <= start_at {
        warn!(task = %raw.name, "end is not after start, synthesizing a default span");
        end_at = calendar::add(start_at, DEFAULT_SPAN_DAYS, TimeUnit::Day);
        end_supplied = false;
    }

    let invalid = !start_supplied || !end_supplied;

    let id = raw
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| generate_id(&raw.name));

    let dependencies = unique_dependencies(&id, parse_dependencies(raw.dependencies.as_ref()));

    Task {
        id,
        name: raw.name.clone(),
        start: start_at,
        end: end_at,
        progress: raw.progress.unwrap_or(0).min(100),
        dependencies,
        index,
        invalid,
        custom_class: raw.custom_class.clone(),
        start_supplied,
        end_supplied,
    }
}

fn resolve(input: Option<&DateInput>) -> Option<NaiveDateTime> {
    input.filter(|d| d.is_present()).and_then(DateInput::resolve)
}

/// Split a comma-separated list, or pass a list through.
pub fn parse_dependencies(input: Option<&DependencyInput>) -> Vec<String> {
    match input {
        None => Vec::new(),
        Some(DependencyInput::Text(text)) => text
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .collect(),
        Some(DependencyInput::List(list)) => list.clone(),
    }
}

fn unique_dependencies(id: &str, deps: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(deps.len());
    for dep in deps {
        if dep == id {
            warn!(task = %id, "dropping self-dependency");
        } else if !unique.contains(&dep) {
            unique.push(dep);
        }
    }
    unique
}

/// Task name followed by a random 10-character suffix. Not deduplicated.
pub fn generate_id(name: &str) -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(GENERATED_ID_SUFFIX_LEN)
        .collect();
    format!("{name}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn today() -> NaiveDateTime {
        day(2024, 6, 1)
    }

    fn raw(start: Option<&str>, end: Option<&str>) -> RawTask {
        RawTask {
            id: Some("t".into()),
            name: "Task".into(),
            start: start.map(DateInput::from),
            end: end.map(DateInput::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_end_defaults_to_two_days_and_is_invalid() {
        let task = normalize_task(&raw(Some("2024-01-01"), None), 0, today());
        assert_eq!(task.start, day(2024, 1, 1));
        assert_eq!(task.end, day(2024, 1, 3));
        assert!(task.invalid);
    }

    #[test]
    fn test_missing_both_defaults_to_today() {
        let task = normalize_task(&raw(None, None), 0, today());
        assert_eq!(task.start, today());
        assert_eq!(task.end, day(2024, 6, 3));
        assert!(task.invalid);
    }

    #[test]
    fn test_missing_start_derives_from_end() {
        let task = normalize_task(&raw(None, Some("2024-01-10")), 0, today());
        assert_eq!(task.start, day(2024, 1, 8));
        assert_eq!(task.end, day(2024, 1, 11));
        assert!(task.invalid);
    }

    #[test]
    fn test_bare_end_date_covers_the_whole_day() {
        let task = normalize_task(&raw(Some("2024-01-01"), Some("2024-01-05")), 0, today());
        assert_eq!(task.end, day(2024, 1, 6));
        assert!(!task.invalid);
    }

    #[test]
    fn test_end_with_time_is_kept() {
        let task = normalize_task(
            &raw(Some("2024-01-01 08:00"), Some("2024-01-01 17:30")),
            0,
            today(),
        );
        assert_eq!(task.end, calendar::parse("2024-01-01 17:30").unwrap());
        assert!(!task.invalid);
    }

    #[test]
    fn test_span_over_ten_years_discards_end() {
        let task = normalize_task(&raw(Some("2000-01-01"), Some("2020-01-01")), 0, today());
        assert_eq!(task.end, day(2000, 1, 3));
        assert!(task.invalid);
    }

    #[test]
    fn test_unparseable_dates_are_treated_as_missing() {
        let task = normalize_task(&raw(Some("soon"), Some("2024-02-01")), 0, today());
        assert_eq!(task.start, day(2024, 1, 30));
        assert!(task.invalid);
    }

    #[test]
    fn test_end_before_start_is_repaired_and_flagged() {
        let task = normalize_task(&raw(Some("2024-03-10"), Some("2024-03-01")), 0, today());
        assert_eq!(task.start, day(2024, 3, 10));
        assert_eq!(task.end, day(2024, 3, 12));
        assert!(task.invalid);
    }

    #[test]
    fn test_dependency_string_is_split_and_trimmed() {
        let mut r = raw(Some("2024-01-01"), Some("2024-01-02"));
        r.dependencies = Some(DependencyInput::Text(" a, b ,,c ".into()));
        let task = normalize_task(&r, 0, today());
        assert_eq!(task.dependencies, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_dependencies_drop_self_and_duplicates() {
        let mut r = raw(Some("2024-01-01"), Some("2024-01-02"));
        r.dependencies = Some(DependencyInput::List(vec![
            "a".into(),
            "t".into(),
            "a".into(),
            "b".into(),
        ]));
        let task = normalize_task(&r, 0, today());
        assert_eq!(task.dependencies, vec!["a", "b"]);
    }

    #[test]
    fn test_generated_id_is_name_plus_suffix() {
        let mut r = raw(Some("2024-01-01"), Some("2024-01-02"));
        r.id = None;
        r.name = "Design".into();
        let task = normalize_task(&r, 0, today());
        assert!(task.id.starts_with("Design"));
        assert_eq!(task.id.len(), "Design".len() + GENERATED_ID_SUFFIX_LEN);
    }

    #[test]
    fn test_progress_is_clamped_and_rows_follow_input_order() {
        let tasks = normalize_tasks(
            &[
                raw(Some("2024-01-01"), Some("2024-01-02")).with_progress(250),
                raw(Some("2024-01-01"), Some("2024-01-02")).with_progress(40),
            ],
            today(),
        );
        assert_eq!(tasks[0].progress, 100);
        assert_eq!(tasks[1].progress, 40);
        assert_eq!(tasks[0].index, 0);
        assert_eq!(tasks[1].index, 1);
    }

    #[test]
    fn test_to_raw_renormalizes_to_the_same_task() {
        let inputs = [
            raw(Some("2024-01-01"), Some("2024-01-05")),
            raw(Some("2024-01-01 09:00"), Some("2024-01-02 17:15")),
            raw(None, Some("2024-01-05")),
        ];
        for input in inputs {
            let first = normalize_task(&input, 0, today());
            let second = normalize_task(&first.to_raw(), 0, today());
            assert_eq!(first.start, second.start);
            assert_eq!(first.end, second.end);
            assert_eq!(first.invalid, second.invalid);
        }
    }
}
