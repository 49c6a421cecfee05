use chrono::{Datelike, NaiveDateTime};

use super::surface::HeaderLabel;
use crate::model::calendar::{self, TimeUnit};
use crate::model::{Language, ViewScale};

/// Vertical distance between the lower and upper header rows.
pub const UPPER_ROW_OFFSET: f64 = 25.0;

/// The header texts for one column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnLabels {
    pub lower: Option<HeaderLabel>,
    pub upper: Option<HeaderLabel>,
}

/// Lower and upper header labels for every tick. A label is only produced
/// when its text is non-empty, which for the upper row means the column
/// starts a new day, month or year depending on the scale.
pub fn column_labels(
    ticks: &[NaiveDateTime],
    scale: ViewScale,
    column_width: f64,
    header_height: f64,
    language: Language,
) -> Vec<ColumnLabels> {
    let (lower_dx, upper_dx) = offsets(scale, column_width);
    let mut previous: Option<NaiveDateTime> = None;

    ticks
        .iter()
        .enumerate()
        .map(|(i, &date)| {
            let last = previous.unwrap_or_else(|| calendar::add(date, 1, TimeUnit::Year));
            previous = Some(date);

            let (lower, upper) = texts(date, last, scale, language);
            let x = i as f64 * column_width;
            ColumnLabels {
                lower: (!lower.is_empty()).then(|| HeaderLabel {
                    text: lower,
                    x: x + lower_dx,
                    y: header_height,
                }),
                upper: (!upper.is_empty()).then(|| HeaderLabel {
                    text: upper,
                    x: x + upper_dx,
                    y: header_height - UPPER_ROW_OFFSET,
                }),
            }
        })
        .collect()
}

fn texts(
    date: NaiveDateTime,
    last: NaiveDateTime,
    scale: ViewScale,
    language: Language,
) -> (String, String) {
    let fmt = |pattern: &str| calendar::format(date, pattern, language);
    let new_day = date.day() != last.day();
    let new_month = date.month() != last.month();
    let new_year = date.year() != last.year();
    let when = |cond: bool, pattern: &str| if cond { fmt(pattern) } else { String::new() };

    match scale {
        ViewScale::Hour | ViewScale::QuarterDay => (fmt("HH"), when(new_day, "D MMM")),
        ViewScale::HalfDay => {
            let upper = match (new_day, new_month) {
                (false, _) => String::new(),
                (true, true) => fmt("D MMM"),
                (true, false) => fmt("D"),
            };
            (fmt("HH"), upper)
        }
        ViewScale::Day => (when(new_day, "D"), when(new_month, "MMMM")),
        ViewScale::Week => {
            let lower = if new_month { fmt("D MMM") } else { fmt("D") };
            (lower, when(new_month, "MMMM"))
        }
        ViewScale::Month => (fmt("MMMM"), when(new_year, "YYYY")),
        ViewScale::Year => (fmt("YYYY"), when(new_year, "YYYY")),
    }
}

/// Horizontal offsets of the lower and upper label within a column.
fn offsets(scale: ViewScale, cw: f64) -> (f64, f64) {
    match scale {
        ViewScale::Hour => (0.0, cw * 24.0 / 2.0),
        ViewScale::QuarterDay => (cw * 4.0 / 2.0, 0.0),
        ViewScale::HalfDay => (cw * 2.0 / 2.0, 0.0),
        ViewScale::Day => (cw / 2.0, cw * 30.0 / 2.0),
        ViewScale::Week => (0.0, cw * 4.0 / 2.0),
        ViewScale::Month => (cw / 2.0, cw * 12.0 / 2.0),
        ViewScale::Year => (cw / 2.0, cw * 30.0 / 2.0),
    }
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

    fn texts_of(labels: &[ColumnLabels]) -> Vec<(Option<&str>, Option<&str>)> {
        labels
            .iter()
            .map(|l| {
                (
                    l.lower.as_ref().map(|h| h.text.as_str()),
                    l.upper.as_ref().map(|h| h.text.as_str()),
                )
            })
            .collect()
    }

    #[test]
    fn test_day_scale_labels_days_and_months() {
        let ticks = [day(2024, 2, 28), day(2024, 2, 29), day(2024, 3, 1)];
        let labels = column_labels(&ticks, ViewScale::Day, 38.0, 50.0, Language::En);
        assert_eq!(
            texts_of(&labels),
            vec![(None, None), (Some("29"), None), (Some("1"), Some("March"))]
        );
        let lower = labels[1].lower.as_ref().unwrap();
        assert_eq!((lower.x, lower.y), (38.0 + 19.0, 50.0));
        let upper = labels[2].upper.as_ref().unwrap();
        assert_eq!((upper.x, upper.y), (76.0 + 570.0, 25.0));
    }

    #[test]
    fn test_month_scale_marks_years() {
        let ticks = [day(2024, 11, 1), day(2024, 12, 1), day(2025, 1, 1)];
        let labels = column_labels(&ticks, ViewScale::Month, 120.0, 50.0, Language::En);
        assert_eq!(
            texts_of(&labels),
            vec![
                (Some("November"), Some("2024")),
                (Some("December"), None),
                (Some("January"), Some("2025")),
            ]
        );
    }

    #[test]
    fn test_week_scale_names_month_on_change() {
        let ticks = [day(2024, 1, 22), day(2024, 1, 29), day(2024, 2, 5)];
        let labels = column_labels(&ticks, ViewScale::Week, 140.0, 50.0, Language::Es);
        assert_eq!(
            texts_of(&labels),
            vec![
                (Some("22"), None),
                (Some("29"), None),
                (Some("5 Febrero"), Some("Febrero")),
            ]
        );
    }

    #[test]
    fn test_hour_scales_show_hours() {
        let ticks = [
            calendar::parse("2024-01-01 12:00").unwrap(),
            day(2024, 1, 2),
            calendar::parse("2024-01-02 12:00").unwrap(),
        ];
        let labels = column_labels(&ticks, ViewScale::HalfDay, 38.0, 50.0, Language::En);
        assert_eq!(
            texts_of(&labels),
            vec![(Some("12"), None), (Some("00"), Some("2")), (Some("12"), None)]
        );
    }
}
