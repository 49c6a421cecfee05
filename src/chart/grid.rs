use chrono::{Datelike, NaiveDateTime};

use super::header::column_labels;
use super::surface::{GridTick, GridView, Highlight, RowBand};
use crate::config::GanttOptions;
use crate::model::calendar::{self, TimeUnit};
use crate::model::{Timeline, ViewScale};

/// Lay out the grid behind `rows` task rows. Upper header labels whose
/// measured text would run past the grid are dropped.
pub fn build_grid(
    timeline: &Timeline,
    options: &GanttOptions,
    rows: usize,
    today: NaiveDateTime,
    measure: impl Fn(&str) -> f64,
) -> GridView {
    let cw = options.column_width;
    let row_height = options.bar_height + options.padding;
    let width = timeline.column_count() as f64 * cw;
    let body_height = row_height * rows as f64;

    let first_row_y = options.header_height + options.padding / 2.0;
    let row_bands = (0..rows)
        .map(|i| RowBand {
            y: first_row_y + i as f64 * row_height,
            height: row_height,
        })
        .collect();

    let mut ticks = Vec::with_capacity(timeline.ticks.len());
    let mut x = 0.0;
    for &date in &timeline.ticks {
        ticks.push(GridTick {
            x,
            y: first_row_y,
            height: body_height,
            thick: is_thick(timeline.scale, date),
        });
        x += match timeline.scale {
            ViewScale::Month => f64::from(calendar::days_in_month(date)) * cw / 30.0,
            _ => cw,
        };
    }

    let today = (timeline.scale == ViewScale::Day).then(|| Highlight {
        x: calendar::diff(today, timeline.start, TimeUnit::Hour) as f64 / options.step * cw,
        y: 0.0,
        width: cw,
        height: body_height + options.header_height + options.padding / 2.0,
    });

    let mut lower_labels = Vec::new();
    let mut upper_labels = Vec::new();
    for labels in column_labels(
        &timeline.ticks,
        timeline.scale,
        cw,
        options.header_height,
        options.language,
    ) {
        lower_labels.extend(labels.lower);
        if let Some(upper) = labels.upper {
            if upper.x + measure(&upper.text) <= width {
                upper_labels.push(upper);
            }
        }
    }

    GridView {
        width,
        height: options.header_height + options.padding + body_height,
        header_height: options.header_height,
        rows: row_bands,
        ticks,
        today,
        lower_labels,
        upper_labels,
    }
}

fn is_thick(scale: ViewScale, date: NaiveDateTime) -> bool {
    match scale {
        ViewScale::Day => date.day() == 1,
        ViewScale::Week => date.day() < 8,
        ViewScale::Month => date.month() % 3 == 0,
        _ => false,
    }
}
