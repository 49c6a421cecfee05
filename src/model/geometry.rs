use chrono::NaiveDateTime;

use super::calendar::{self, TimeUnit};
use super::task::Task;
use super::timeline::{Timeline, ViewScale};
use crate::config::GanttOptions;

/// Pixel rectangle of one task bar.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BarGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub progress_width: f64,
}

impl BarGeometry {
    pub fn end_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn progress_end_x(&self) -> f64 {
        self.x + self.progress_width
    }

    /// Progress width for `progress` percent of the current width.
    pub fn progress_width_for(&self, progress: u32) -> f64 {
        self.width * f64::from(progress) / 100.0
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.end_x() && py >= self.y && py <= self.y + self.height
    }
}

/// Converts between instants and pixel positions for one timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryMapper {
    pub gantt_start: NaiveDateTime,
    pub scale: ViewScale,
    pub step: f64,
    pub column_width: f64,
    pub header_height: f64,
    pub bar_height: f64,
    pub padding: f64,
}

impl GeometryMapper {
    pub fn new(timeline: &Timeline, options: &GanttOptions) -> Self {
        Self {
            gantt_start: timeline.start,
            scale: timeline.scale,
            step: options.step,
            column_width: options.column_width,
            header_height: options.header_height,
            bar_height: options.bar_height,
            padding: options.padding,
        }
    }

    /// Horizontal offset of `t`. Month scale counts whole days as
    /// thirtieths of a column.
    pub fn date_to_x(&self, t: NaiveDateTime) -> f64 {
        match self.scale {
            ViewScale::Month => {
                calendar::diff(t, self.gantt_start, TimeUnit::Day) as f64 / 30.0
                    * self.column_width
            }
            _ => calendar::hours_between(t, self.gantt_start) / self.step * self.column_width,
        }
    }

    pub fn x_to_date(&self, x: f64) -> NaiveDateTime {
        calendar::add_hours(self.gantt_start, x / self.column_width * self.step)
    }

    pub fn row_to_y(&self, index: usize) -> f64 {
        self.header_height + self.padding + index as f64 * (self.bar_height + self.padding)
    }

    /// Width of a span of `hours`.
    pub fn width_for_hours(&self, hours: f64) -> f64 {
        self.column_width * hours / self.step
    }

    pub fn bar_for(&self, task: &Task) -> BarGeometry {
        let width = self.width_for_hours(task.duration_hours());
        BarGeometry {
            x: self.date_to_x(task.start),
            y: self.row_to_y(task.index),
            width,
            height: self.bar_height,
            progress_width: width * f64::from(task.progress) / 100.0,
        }
    }

    /// Start and exclusive end covered by `bar`.
    pub fn dates_for(&self, bar: &BarGeometry) -> (NaiveDateTime, NaiveDateTime) {
        (self.x_to_date(bar.x), self.x_to_date(bar.end_x()))
    }

    /// Vertical extent of the chart body.
    pub fn grid_height(&self, rows: usize) -> f64 {
        self.header_height + self.padding + rows as f64 * (self.bar_height + self.padding)
    }
}
