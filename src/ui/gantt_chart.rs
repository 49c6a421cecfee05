use std::time::Instant;

use egui::{Align2, Color32, Pos2, Rect, Rounding, Sense, Shape, Stroke, Ui, Vec2};
use gantt::chart::interaction::{
    HANDLE_INSET, HANDLE_WIDTH, PROGRESS_HANDLE_HALF_WIDTH, PROGRESS_HANDLE_HEIGHT,
};
use gantt::chart::{ArrowView, BarView, Gantt, GestureKind, GridView, RenderSurface};

use crate::ui::theme;

/// Label width estimate used before egui has loaded its fonts.
const AVG_CHAR_WIDTH: f64 = 6.5;
/// Room below the last row so the final bar is never flush with the edge.
const BOTTOM_MARGIN: f32 = 40.0;

/// Retained copy of the last frame the chart described. Painted every egui
/// frame until the chart redraws.
pub struct SceneSurface {
    ctx: egui::Context,
    fonts_ready: bool,
    grid: GridView,
    bars: Vec<BarView>,
    arrows: Vec<ArrowView>,
    pending_scroll: Option<f32>,
}

impl SceneSurface {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            fonts_ready: false,
            grid: GridView::default(),
            bars: Vec::new(),
            arrows: Vec::new(),
            pending_scroll: None,
        }
    }

    /// Switch from estimated to measured label widths. Fonts exist once the
    /// first frame has run.
    pub fn set_fonts_ready(&mut self) {
        self.fonts_ready = true;
    }

    pub fn fonts_ready(&self) -> bool {
        self.fonts_ready
    }

    fn take_scroll(&mut self) -> Option<f32> {
        self.pending_scroll.take()
    }
}

impl RenderSurface for SceneSurface {
    fn clear(&mut self) {
        self.grid = GridView::default();
        self.bars.clear();
        self.arrows.clear();
    }

    fn draw_grid(&mut self, grid: &GridView) {
        self.grid = grid.clone();
    }

    fn draw_bar(&mut self, bar: &BarView) {
        self.bars.push(bar.clone());
    }

    fn draw_arrow(&mut self, arrow: &ArrowView) {
        self.arrows.push(arrow.clone());
    }

    fn measure_text(&self, text: &str) -> f64 {
        if !self.fonts_ready {
            return text.chars().count() as f64 * AVG_CHAR_WIDTH;
        }
        let galley = self.ctx.fonts(|fonts| {
            fonts.layout_no_wrap(text.to_owned(), theme::font_bar(), Color32::WHITE)
        });
        f64::from(galley.size().x)
    }

    fn set_active(&mut self, task_id: &str, active: bool) {
        for bar in self.bars.iter_mut().filter(|b| b.task_id == task_id) {
            bar.active = active;
        }
        self.ctx.request_repaint();
    }

    fn scroll_to(&mut self, x: f64) {
        self.pending_scroll = Some(x.max(0.0) as f32);
    }
}

/// Render the chart area and route pointer input into the chart.
pub fn show_gantt_chart(chart: &mut Gantt<SceneSurface>, ui: &mut Ui) {
    let available = ui.available_size();
    let mut area = egui::ScrollArea::both().auto_shrink([false, false]);
    if let Some(x) = chart.surface_mut().take_scroll() {
        area = area.horizontal_scroll_offset(x);
    }

    area.show(ui, |ui| {
        let grid = &chart.surface().grid;
        let size = Vec2::new(
            (grid.width as f32).max(available.x),
            (grid.height as f32 + BOTTOM_MARGIN).max(available.y),
        );
        let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
        let origin = response.rect.min;
        let to_local = |p: Pos2| (f64::from(p.x - origin.x), f64::from(p.y - origin.y));
        let hover = response.hover_pos().map(to_local);

        painter.rect_filled(response.rect, 0.0, theme::BG_DARK);
        let scene = chart.surface();
        draw_grid(&painter, origin, &scene.grid);
        for arrow in &scene.arrows {
            draw_arrow(&painter, origin, arrow);
        }
        for bar in &scene.bars {
            let hovered = hover.is_some_and(|(x, y)| bar.geometry.contains(x, y));
            draw_bar(&painter, origin, bar, hovered);
        }

        let now = Instant::now();
        if response.drag_started() {
            if let Some(press) = ui.input(|i| i.pointer.press_origin()) {
                let (x, y) = to_local(press);
                chart.pointer_down(x, y);
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                chart.pointer_move(to_local(pos).0);
            }
        }
        if response.drag_stopped() {
            chart.pointer_up(now);
        }

        if response.double_clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let (x, y) = to_local(pos);
                chart.double_click(x, y, now);
            }
        } else if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let (x, y) = to_local(pos);
                chart.click(x, y, now);
            }
        }

        if let Some((x, y)) = hover {
            if !chart.is_dragging() && ui.input(|i| i.pointer.delta() != Vec2::ZERO) {
                chart.hover(x, y, now);
            }
            let cursor = match chart.hit_test(x, y).map(|hit| hit.kind) {
                Some(GestureKind::ResizeLeft | GestureKind::ResizeRight) => {
                    egui::CursorIcon::ResizeHorizontal
                }
                Some(GestureKind::Progress) => egui::CursorIcon::ResizeColumn,
                Some(GestureKind::Move) => egui::CursorIcon::Grab,
                None => egui::CursorIcon::Default,
            };
            if chart.is_dragging() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
            } else {
                ui.ctx().set_cursor_icon(cursor);
            }
        }

        if let Some(popup) = chart.popup() {
            crate::ui::popup::show_popup(ui.ctx(), origin, popup);
        }
    });
}

fn at(origin: Pos2, x: f64, y: f64) -> Pos2 {
    Pos2::new(origin.x + x as f32, origin.y + y as f32)
}

fn draw_grid(painter: &egui::Painter, origin: Pos2, grid: &GridView) {
    let width = grid.width as f32;

    for (i, row) in grid.rows.iter().enumerate() {
        let rect = Rect::from_min_size(at(origin, 0.0, row.y), Vec2::new(width, row.height as f32));
        if i % 2 == 0 {
            painter.rect_filled(rect, 0.0, theme::BG_ROW_EVEN);
        }
        painter.line_segment(
            [rect.left_bottom(), rect.right_bottom()],
            Stroke::new(1.0, theme::GRID_LINE),
        );
    }

    if let Some(today) = grid.today {
        painter.rect_filled(
            Rect::from_min_size(
                at(origin, today.x, today.y),
                Vec2::new(today.width as f32, today.height as f32),
            ),
            0.0,
            theme::TODAY_FILL,
        );
    }

    let header = Rect::from_min_size(origin, Vec2::new(width, grid.header_height as f32));
    painter.rect_filled(header, 0.0, theme::BG_HEADER);
    painter.line_segment(
        [header.left_bottom(), header.right_bottom()],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    for tick in &grid.ticks {
        let color = if tick.thick {
            theme::GRID_LINE_THICK
        } else {
            theme::GRID_LINE
        };
        painter.line_segment(
            [at(origin, tick.x, tick.y), at(origin, tick.x, tick.y + tick.height)],
            Stroke::new(if tick.thick { 1.5 } else { 1.0 }, color),
        );
    }

    for label in &grid.lower_labels {
        painter.text(
            at(origin, label.x, label.y),
            Align2::CENTER_BOTTOM,
            &label.text,
            theme::font_sub(),
            theme::TEXT_SECONDARY,
        );
    }
    for label in &grid.upper_labels {
        painter.text(
            at(origin, label.x, label.y),
            Align2::CENTER_BOTTOM,
            &label.text,
            theme::font_header(),
            theme::TEXT_PRIMARY,
        );
    }
}

fn draw_arrow(painter: &egui::Painter, origin: Pos2, arrow: &ArrowView) {
    let points: Vec<Pos2> = arrow.points.iter().map(|&(x, y)| at(origin, x, y)).collect();
    let Some(&tip) = points.last() else {
        return;
    };
    painter.add(Shape::line(points, Stroke::new(1.4, theme::ARROW_COLOR)));

    let head = theme::ARROW_HEAD;
    painter.add(Shape::convex_polygon(
        vec![
            tip,
            tip + Vec2::new(-head, -head),
            tip + Vec2::new(-head, head),
        ],
        theme::ARROW_COLOR,
        Stroke::NONE,
    ));
}

fn draw_bar(painter: &egui::Painter, origin: Pos2, bar: &BarView, hovered: bool) {
    let g = bar.geometry;
    let rect = Rect::from_min_size(
        at(origin, g.x, g.y),
        Vec2::new(g.width as f32, g.height as f32),
    );
    let rounding = Rounding::same(bar.corner_radius as f32);

    painter.rect_filled(
        rect.translate(Vec2::new(1.0, 2.0)),
        rounding,
        Color32::from_black_alpha(35),
    );
    painter.rect_filled(
        rect,
        rounding,
        theme::bar_color(bar.custom_class.as_deref(), bar.invalid),
    );
    if g.progress_width > 0.0 && !bar.invalid {
        let progress = Rect::from_min_size(rect.min, Vec2::new(g.progress_width as f32, rect.height()));
        painter.rect_filled(progress, rounding, theme::BAR_PROGRESS);
    }

    if bar.active {
        painter.rect_stroke(
            rect.expand(1.5),
            Rounding::same(bar.corner_radius as f32 + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    if bar.label_inside {
        painter.text(
            at(origin, bar.label_x, bar.label_y),
            Align2::CENTER_CENTER,
            &bar.label,
            theme::font_bar(),
            theme::TEXT_ON_BAR,
        );
    } else {
        painter.text(
            at(origin, bar.label_x, bar.label_y),
            Align2::LEFT_CENTER,
            &bar.label,
            theme::font_bar(),
            theme::TEXT_SECONDARY,
        );
    }

    if !(hovered || bar.active) {
        return;
    }
    if bar.resize_handles {
        let handle = Vec2::new(HANDLE_WIDTH as f32, rect.height() - 4.0);
        let left = Rect::from_min_size(at(origin, g.x + HANDLE_INSET, g.y + 2.0), handle);
        let right = Rect::from_min_size(
            at(origin, g.end_x() - HANDLE_INSET - HANDLE_WIDTH, g.y + 2.0),
            handle,
        );
        let fill = Color32::from_white_alpha(90);
        painter.rect_filled(left, Rounding::same(2.0), fill);
        painter.rect_filled(right, Rounding::same(2.0), fill);
    }
    if bar.progress_handle {
        let bottom = g.y + g.height;
        painter.add(Shape::convex_polygon(
            vec![
                at(origin, g.progress_end_x() - PROGRESS_HANDLE_HALF_WIDTH, bottom),
                at(origin, g.progress_end_x() + PROGRESS_HANDLE_HALF_WIDTH, bottom),
                at(origin, g.progress_end_x(), bottom - PROGRESS_HANDLE_HEIGHT),
            ],
            theme::HANDLE_COLOR,
            Stroke::NONE,
        ));
    }
}
