//! The drawing side of the chart. The engine describes what to draw with
//! plain view structs and a host toolkit turns them into pixels.

use crate::model::BarGeometry;

/// One horizontal row band behind a task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBand {
    pub y: f64,
    pub height: f64,
}

/// A vertical column separator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridTick {
    pub x: f64,
    pub y: f64,
    pub height: f64,
    /// Marks a month, first-week or quarter boundary.
    pub thick: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Everything behind the bars: background, rows, ticks, header and dates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridView {
    pub width: f64,
    pub height: f64,
    pub header_height: f64,
    pub rows: Vec<RowBand>,
    pub ticks: Vec<GridTick>,
    pub today: Option<Highlight>,
    pub lower_labels: Vec<HeaderLabel>,
    pub upper_labels: Vec<HeaderLabel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarView {
    pub task_id: String,
    pub label: String,
    pub geometry: BarGeometry,
    pub corner_radius: f64,
    pub label_x: f64,
    pub label_y: f64,
    /// The label is centred inside the bar; otherwise it follows the bar end.
    pub label_inside: bool,
    pub invalid: bool,
    pub custom_class: Option<String>,
    /// Resize handles are drawn. Never set for invalid tasks.
    pub resize_handles: bool,
    pub progress_handle: bool,
    pub active: bool,
}

/// A dependency arrow as a polyline; the head sits on the last point.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowView {
    pub from_id: String,
    pub to_id: String,
    pub points: Vec<(f64, f64)>,
}

/// A retained drawing target. `clear` starts a new frame, which is then
/// described by the grid, the arrows and the bars in that order.
pub trait RenderSurface {
    fn clear(&mut self);

    fn draw_grid(&mut self, grid: &GridView);

    fn draw_bar(&mut self, bar: &BarView);

    fn draw_arrow(&mut self, arrow: &ArrowView);

    /// Rendered width of `text` in the label font.
    fn measure_text(&self, text: &str) -> f64;

    fn set_active(&mut self, task_id: &str, active: bool);

    /// Bring horizontal offset `x` into view.
    fn scroll_to(&mut self, _x: f64) {}
}
