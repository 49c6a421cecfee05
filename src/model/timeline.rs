use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::calendar::{self, TimeUnit};
use super::task::Task;
use crate::error::GanttError;

/// Controls what one grid column of the timeline represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewScale {
    Hour,
    #[serde(rename = "Quarter Day", alias = "QuarterDay")]
    QuarterDay,
    #[serde(rename = "Half Day", alias = "HalfDay")]
    HalfDay,
    #[default]
    Day,
    Week,
    Month,
    Year,
}

impl ViewScale {
    pub const ALL: [ViewScale; 7] = [
        ViewScale::Hour,
        ViewScale::QuarterDay,
        ViewScale::HalfDay,
        ViewScale::Day,
        ViewScale::Week,
        ViewScale::Month,
        ViewScale::Year,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ViewScale::Hour => "Hour",
            ViewScale::QuarterDay => "Quarter Day",
            ViewScale::HalfDay => "Half Day",
            ViewScale::Day => "Day",
            ViewScale::Week => "Week",
            ViewScale::Month => "Month",
            ViewScale::Year => "Year",
        }
    }

    /// Hours covered by one column.
    pub fn step(self) -> f64 {
        match self {
            ViewScale::Hour => 1.0,
            ViewScale::QuarterDay => 6.0,
            ViewScale::HalfDay => 12.0,
            ViewScale::Day => 24.0,
            ViewScale::Week => 24.0 * 7.0,
            ViewScale::Month => 24.0 * 30.0,
            ViewScale::Year => 24.0 * 365.0,
        }
    }

    /// Pixel width of one column.
    pub fn column_width(self) -> f64 {
        match self {
            ViewScale::Hour | ViewScale::QuarterDay | ViewScale::HalfDay | ViewScale::Day => 38.0,
            ViewScale::Week => 140.0,
            ViewScale::Month | ViewScale::Year => 120.0,
        }
    }

    /// Widen the day-truncated task bounds into the visible range.
    fn pad(self, start: NaiveDateTime, end: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        match self {
            ViewScale::Hour | ViewScale::QuarterDay | ViewScale::HalfDay => (
                calendar::add(start, -7, TimeUnit::Day),
                calendar::add(end, 7, TimeUnit::Day),
            ),
            ViewScale::Month => (
                calendar::start_of(start, TimeUnit::Year),
                calendar::add(end, 1, TimeUnit::Year),
            ),
            ViewScale::Year => (
                calendar::add(start, -2, TimeUnit::Year),
                calendar::add(end, 2, TimeUnit::Year),
            ),
            ViewScale::Day | ViewScale::Week => (
                calendar::add(start, -1, TimeUnit::Month),
                calendar::add(end, 1, TimeUnit::Month),
            ),
        }
    }

    /// The instant one column after `t`.
    fn next_tick(self, t: NaiveDateTime, step: f64) -> NaiveDateTime {
        match self {
            ViewScale::Year => calendar::add(t, 1, TimeUnit::Year),
            ViewScale::Month => calendar::add(t, 1, TimeUnit::Month),
            _ => calendar::add_hours(t, step),
        }
    }
}

impl fmt::Display for ViewScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ViewScale {
    type Err = GanttError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        ViewScale::ALL
            .into_iter()
            .find(|scale| {
                scale
                    .label()
                    .replace(' ', "")
                    .eq_ignore_ascii_case(&wanted)
            })
            .ok_or_else(|| GanttError::UnknownViewMode(s.to_string()))
    }
}

/// The visible date range and its column ticks for one scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub scale: ViewScale,
    /// The leftmost date, x = 0.
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// One instant per column, starting at `start`; the last one reaches or
    /// passes `end`.
    pub ticks: Vec<NaiveDateTime>,
}

impl Timeline {
    /// Compute the padded range and ticks. With no tasks the range is
    /// anchored on `today`.
    pub fn build(tasks: &[Task], scale: ViewScale, step: f64, today: NaiveDateTime) -> Self {
        let (first, last) = task_bounds(tasks).unwrap_or((today, today));
        let (start, end) = scale.pad(
            calendar::start_of(first, TimeUnit::Day),
            calendar::start_of(last, TimeUnit::Day),
        );

        let mut ticks = vec![start];
        let mut current = start;
        while current < end {
            let next = scale.next_tick(current, step);
            if next <= current {
                break;
            }
            ticks.push(next);
            current = next;
        }

        Self {
            scale,
            start,
            end,
            ticks,
        }
    }

    pub fn column_count(&self) -> usize {
        self.ticks.len()
    }
}

/// Earliest start and latest end across `tasks`.
pub fn task_bounds(tasks: &[Task]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = tasks.iter().map(|t| t.start).min()?;
    let end = tasks.iter().map(|t| t.end).max()?;
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::normalize::normalize_tasks;
    use crate::model::task::RawTask;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    /// A task whose exclusive end is 2024-03-05 00:00.
    fn march_tasks() -> Vec<Task> {
        normalize_tasks(
            &[RawTask::new("a", "2024-03-01", "2024-03-04")],
            day(2024, 1, 1),
        )
    }

    fn build(scale: ViewScale) -> Timeline {
        Timeline::build(&march_tasks(), scale, scale.step(), day(2024, 1, 1))
    }

    #[test]
    fn test_day_scale_pads_by_one_month() {
        let tl = build(ViewScale::Day);
        assert_eq!(tl.start, day(2024, 2, 1));
        assert_eq!(tl.end, day(2024, 4, 5));
        assert_eq!(tl.ticks.first(), Some(&day(2024, 2, 1)));
        assert_eq!(tl.ticks.last(), Some(&day(2024, 4, 5)));
        assert_eq!(tl.column_count(), 65);
    }

    #[test]
    fn test_hour_scales_pad_by_one_week() {
        for scale in [ViewScale::Hour, ViewScale::QuarterDay, ViewScale::HalfDay] {
            let tl = build(scale);
            assert_eq!(tl.start, day(2024, 2, 23));
            assert_eq!(tl.end, day(2024, 3, 12));
        }
        let quarter = build(ViewScale::QuarterDay);
        assert_eq!(quarter.ticks[1], calendar::parse("2024-02-23 06:00").unwrap());
    }

    #[test]
    fn test_month_scale_starts_at_year_boundary() {
        let tl = build(ViewScale::Month);
        assert_eq!(tl.start, day(2024, 1, 1));
        assert_eq!(tl.end, day(2025, 3, 5));
        assert_eq!(tl.ticks[1], day(2024, 2, 1));
        assert_eq!(tl.ticks.last(), Some(&day(2025, 4, 1)));
    }

    #[test]
    fn test_year_scale_pads_two_years() {
        let tl = build(ViewScale::Year);
        assert_eq!(tl.start, day(2022, 3, 1));
        assert_eq!(tl.end, day(2026, 3, 5));
        assert_eq!(tl.ticks.len(), 6);
    }

    #[test]
    fn test_week_ticks_step_seven_days() {
        let tl = build(ViewScale::Week);
        assert_eq!(tl.ticks[1], day(2024, 2, 8));
        assert!(tl.ticks.last().unwrap() >= &tl.end);
    }

    #[test]
    fn test_empty_task_set_anchors_on_today() {
        let tl = Timeline::build(&[], ViewScale::Day, 24.0, day(2024, 5, 10));
        assert_eq!(tl.start, day(2024, 4, 10));
        assert_eq!(tl.end, day(2024, 6, 10));
    }

    #[test]
    fn test_view_scale_parses_labels() {
        assert_eq!("Quarter Day".parse::<ViewScale>().unwrap(), ViewScale::QuarterDay);
        assert_eq!("halfday".parse::<ViewScale>().unwrap(), ViewScale::HalfDay);
        assert_eq!("Week".parse::<ViewScale>().unwrap(), ViewScale::Week);
        assert!("Fortnight".parse::<ViewScale>().is_err());
    }

    #[test]
    fn test_view_scale_serde_uses_labels() {
        let json = serde_json::to_string(&ViewScale::HalfDay).unwrap();
        assert_eq!(json, "\"Half Day\"");
    }
}
