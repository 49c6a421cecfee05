//! The chart facade: owns the tasks, lays them out on a timeline, feeds a
//! [`RenderSurface`] and turns pointer input into task edits.

pub mod events;
pub mod grid;
pub mod header;
pub mod interaction;
pub mod surface;

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use chrono::NaiveDateTime;
use tracing::{debug, warn};

pub use events::{EventHandler, GanttEvent, IgnoreEvents};
pub use interaction::{GestureKind, Hit};
pub use surface::{ArrowView, BarView, GridView, RenderSurface};

use crate::config::{GanttOptions, PopupTrigger};
use crate::error::Result;
use crate::model::calendar::{self, TimeUnit};
use crate::model::normalize::normalize_tasks;
use crate::model::{
    BarGeometry, DependencyGraph, GeometryMapper, RawTask, Task, Timeline, ViewScale,
};
use interaction::{GestureContext, InteractionController};

/// Gap between a bar's end and a label that does not fit inside it.
pub const LABEL_GAP: f64 = 5.0;
/// Gap between a bar's end and its popup.
pub const POPUP_GAP: f64 = 10.0;
const ARROW_NUDGE: f64 = 10.0;
const POPUP_DATE_FORMAT: &str = "MMM D";

/// Details shown for a task next to its bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub task_id: String,
    pub title: String,
    pub subtitle: String,
    pub x: f64,
    pub y: f64,
}

pub struct Gantt<S: RenderSurface> {
    surface: S,
    options: GanttOptions,
    tasks: Vec<Task>,
    rows: HashMap<String, usize>,
    graph: DependencyGraph,
    timeline: Timeline,
    mapper: GeometryMapper,
    bars: Vec<BarGeometry>,
    interaction: InteractionController,
    handler: Box<dyn EventHandler>,
    active: HashSet<String>,
    popup: Option<Popup>,
    fixed_today: Option<NaiveDateTime>,
}

impl<S: RenderSurface> Gantt<S> {
    /// Build a chart and draw it. Raises `ViewChange` for the initial view.
    pub fn new(
        surface: S,
        tasks: &[RawTask],
        options: GanttOptions,
        handler: impl EventHandler + 'static,
    ) -> Result<Self> {
        Self::build(surface, tasks, options, Box::new(handler), None)
    }

    /// Like [`new`](Self::new) with a fixed reference day instead of the
    /// local clock.
    pub fn new_at(
        surface: S,
        tasks: &[RawTask],
        options: GanttOptions,
        handler: impl EventHandler + 'static,
        today: NaiveDateTime,
    ) -> Result<Self> {
        Self::build(surface, tasks, options, Box::new(handler), Some(today))
    }

    fn build(
        surface: S,
        raw: &[RawTask],
        options: GanttOptions,
        handler: Box<dyn EventHandler>,
        fixed_today: Option<NaiveDateTime>,
    ) -> Result<Self> {
        options.validate()?;
        let today = fixed_today.unwrap_or_else(calendar::today);
        let tasks = normalize_tasks(raw, today);
        let timeline = Timeline::build(&tasks, options.view_mode, options.step, today);
        let mapper = GeometryMapper::new(&timeline, &options);
        let scale = options.view_mode;

        let mut gantt = Self {
            surface,
            options,
            rows: HashMap::new(),
            graph: DependencyGraph::default(),
            tasks,
            timeline,
            mapper,
            bars: Vec::new(),
            interaction: InteractionController::new(),
            handler,
            active: HashSet::new(),
            popup: None,
            fixed_today,
        };
        gantt.index_tasks();
        gantt.change_view_mode(scale);
        Ok(gantt)
    }

    /// Replace every task and lay the chart out again.
    pub fn refresh(&mut self, tasks: &[RawTask]) {
        self.tasks = normalize_tasks(tasks, self.today());
        self.interaction.cancel();
        self.active.clear();
        self.popup = None;
        self.index_tasks();
        self.change_view_mode(self.options.view_mode);
    }

    /// Replace the options and lay the chart out again. The column width
    /// and step follow the new view mode.
    pub fn set_options(&mut self, options: GanttOptions) -> Result<()> {
        options.validate()?;
        let scale = options.view_mode;
        self.options = options;
        self.popup = None;
        self.change_view_mode(scale);
        Ok(())
    }

    /// Switch scale, rebuild the timeline and redraw.
    pub fn change_view_mode(&mut self, scale: ViewScale) {
        self.options.apply_scale(scale);
        self.interaction.cancel();
        self.timeline = Timeline::build(&self.tasks, scale, self.options.step, self.today());
        self.mapper = GeometryMapper::new(&self.timeline, &self.options);
        self.layout_bars();
        debug!(
            scale = %scale,
            start = %self.timeline.start,
            end = %self.timeline.end,
            columns = self.timeline.column_count(),
            "chart laid out"
        );

        self.render();
        if let Some(x) = self.scroll_offset() {
            self.surface.scroll_to(x);
        }
        self.handler.handle(&GanttEvent::ViewChange(scale));
    }

    /// Redraw the whole chart from the current state.
    pub fn render(&mut self) {
        self.surface.clear();

        let surface = &self.surface;
        let grid = grid::build_grid(
            &self.timeline,
            &self.options,
            self.tasks.len(),
            self.today(),
            |text| surface.measure_text(text),
        );
        self.surface.draw_grid(&grid);

        for arrow in self.arrows() {
            self.surface.draw_arrow(&arrow);
        }
        for row in 0..self.tasks.len() {
            let view = self.bar_view(row);
            self.surface.draw_bar(&view);
        }
    }

    // -- pointer input --

    pub fn hit_test(&self, x: f64, y: f64) -> Option<Hit> {
        interaction::hit_test(&self.tasks, &self.bars, x, y)
    }

    /// Pointer pressed. Returns `true` when a bar was grabbed.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        let Some(hit) = self.hit_test(x, y) else {
            return false;
        };
        let ctx = GestureContext {
            tasks: &self.tasks,
            graph: &self.graph,
            rows: &self.rows,
        };
        if !self.interaction.arm(hit, x, &ctx, &self.bars) {
            return false;
        }
        let id = self.tasks[hit.index].id.clone();
        self.mark_active(&id, true);
        true
    }

    /// Pointer moved. Returns `true` when a gesture updated the bars.
    pub fn pointer_move(&mut self, x: f64) -> bool {
        let scale = self.options.view_mode;
        let column_width = self.options.column_width;
        if !self
            .interaction
            .drag_to(x, &mut self.bars, scale, column_width)
        {
            return false;
        }
        self.popup = None;
        self.render();
        true
    }

    /// Pointer released anywhere. Commits the gesture, notifies the handler
    /// and returns what was reported.
    pub fn pointer_up(&mut self, now: Instant) -> Vec<GanttEvent> {
        if !self.interaction.is_busy() {
            return Vec::new();
        }
        let was_dragging = self.interaction.is_dragging();
        let rows = self.interaction.affected_rows();
        let events = self
            .interaction
            .release(now, &mut self.tasks, &self.bars, &self.mapper);

        for row in rows {
            if let Some(id) = self.tasks.get(row).map(|t| t.id.clone()) {
                self.mark_active(&id, false);
            }
        }
        if was_dragging {
            self.layout_bars();
            self.render();
        }
        for event in &events {
            self.handler.handle(event);
        }
        events
    }

    /// Click at a point. Opens the popup when the popup trigger is `click`.
    pub fn click(&mut self, x: f64, y: f64, now: Instant) -> Option<&Popup> {
        if self.options.popup_trigger == PopupTrigger::Click {
            self.trigger_popup(x, y, now);
        }
        self.popup.as_ref()
    }

    /// Pointer resting at a point. Opens the popup when the popup trigger is
    /// `mouseover`.
    pub fn hover(&mut self, x: f64, y: f64, now: Instant) -> Option<&Popup> {
        if self.options.popup_trigger == PopupTrigger::MouseOver {
            self.trigger_popup(x, y, now);
        }
        self.popup.as_ref()
    }

    /// Double click. Raises `Click` for an editable bar outside its
    /// cooldown.
    pub fn double_click(&mut self, x: f64, y: f64, now: Instant) -> bool {
        let Some(task) = self.hit_test(x, y).map(|hit| &self.tasks[hit.index]) else {
            return false;
        };
        if task.invalid || self.interaction.in_cooldown(&task.id, now) {
            return false;
        }
        let event = GanttEvent::Click {
            task_id: task.id.clone(),
        };
        self.handler.handle(&event);
        true
    }

    fn trigger_popup(&mut self, x: f64, y: f64, now: Instant) {
        let Some(hit) = self.hit_test(x, y) else {
            self.clear_selection();
            return;
        };
        let task = &self.tasks[hit.index];
        if task.invalid || self.interaction.in_cooldown(&task.id, now) {
            return;
        }
        let id = task.id.clone();
        if let Some(popup) = self.popup_for(&id, now) {
            self.popup = Some(popup);
        }
        self.unmark_all();
        self.mark_active(&id, true);
    }

    /// Popup content for a task, unless a gesture is running or the task
    /// was just edited.
    pub fn popup_for(&self, task_id: &str, now: Instant) -> Option<Popup> {
        if self.interaction.is_busy() || self.interaction.in_cooldown(task_id, now) {
            return None;
        }
        let row = *self.rows.get(task_id)?;
        let task = &self.tasks[row];
        let bar = self.bars.get(row)?;
        let language = self.options.language;
        let start = calendar::format(task.start, POPUP_DATE_FORMAT, language);
        let last = calendar::add(task.end, -1, TimeUnit::Second);
        let end = calendar::format(last, POPUP_DATE_FORMAT, language);
        Some(Popup {
            task_id: task.id.clone(),
            title: task.name.clone(),
            subtitle: format!("{start} - {end}"),
            x: bar.end_x() + POPUP_GAP,
            y: bar.y,
        })
    }

    pub fn hide_popup(&mut self) {
        self.popup = None;
    }

    /// Drop every active marker and the popup.
    pub fn clear_selection(&mut self) {
        self.unmark_all();
        self.popup = None;
    }

    // -- accessors --

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.rows.get(id).map(|&row| &self.tasks[row])
    }

    pub fn bars(&self) -> &[BarGeometry] {
        &self.bars
    }

    pub fn bar(&self, id: &str) -> Option<&BarGeometry> {
        self.rows.get(id).and_then(|&row| self.bars.get(row))
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn mapper(&self) -> &GeometryMapper {
        &self.mapper
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn options(&self) -> &GanttOptions {
        &self.options
    }

    pub fn view_mode(&self) -> ViewScale {
        self.options.view_mode
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn is_active(&self, task_id: &str) -> bool {
        self.active.contains(task_id)
    }

    pub fn is_dragging(&self) -> bool {
        self.interaction.is_dragging()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Horizontal offset that brings the earliest task into view, one
    /// column before it.
    pub fn scroll_offset(&self) -> Option<f64> {
        let oldest = self.tasks.iter().map(|t| t.start).min()?;
        let hours = calendar::diff(oldest, self.timeline.start, TimeUnit::Hour) as f64;
        Some(hours / self.options.step * self.options.column_width - self.options.column_width)
    }

    // -- internals --

    fn today(&self) -> NaiveDateTime {
        self.fixed_today.unwrap_or_else(calendar::today)
    }

    fn index_tasks(&mut self) {
        self.rows.clear();
        for (row, task) in self.tasks.iter().enumerate() {
            if self.rows.contains_key(&task.id) {
                warn!(task = %task.id, "duplicate task id, keeping the first");
            } else {
                self.rows.insert(task.id.clone(), row);
            }
        }
        for task in &self.tasks {
            for dep in task.dependencies.iter().filter(|d| !self.rows.contains_key(*d)) {
                warn!(task = %task.id, dependency = %dep, "unknown prerequisite");
            }
        }
        self.graph = DependencyGraph::build(&self.tasks);
    }

    fn layout_bars(&mut self) {
        self.bars = self.tasks.iter().map(|t| self.mapper.bar_for(t)).collect();
    }

    fn mark_active(&mut self, task_id: &str, active: bool) {
        if active {
            self.active.insert(task_id.to_string());
        } else {
            self.active.remove(task_id);
        }
        self.surface.set_active(task_id, active);
    }

    fn unmark_all(&mut self) {
        for id in std::mem::take(&mut self.active) {
            self.surface.set_active(&id, false);
        }
    }

    fn bar_view(&self, row: usize) -> BarView {
        let task = &self.tasks[row];
        let geometry = self.bars[row];
        let label_width = self.surface.measure_text(&task.name);
        let label_inside = label_width <= geometry.width;
        let label_x = if label_inside {
            geometry.x + geometry.width / 2.0
        } else {
            geometry.end_x() + LABEL_GAP
        };
        BarView {
            task_id: task.id.clone(),
            label: task.name.clone(),
            geometry,
            corner_radius: self.options.bar_corner_radius,
            label_x,
            label_y: geometry.y + geometry.height / 2.0,
            label_inside,
            invalid: task.invalid,
            custom_class: task.custom_class.clone(),
            resize_handles: !task.invalid,
            progress_handle: interaction::has_progress_handle(task),
            active: self.active.contains(&task.id),
        }
    }

    /// One arrow per resolvable dependency, in task order.
    fn arrows(&self) -> Vec<ArrowView> {
        self.tasks
            .iter()
            .enumerate()
            .flat_map(|(to, task)| {
                task.dependencies
                    .iter()
                    .filter_map(|dep| self.rows.get(dep).copied())
                    .map(move |from| (from, to))
            })
            .map(|(from, to)| ArrowView {
                from_id: self.tasks[from].id.clone(),
                to_id: self.tasks[to].id.clone(),
                points: self.arrow_points(from, to),
            })
            .collect()
    }

    /// From the prerequisite's bottom (top when it sits lower) to the
    /// dependent's left middle. A dependent starting before the
    /// prerequisite gets a detour around its left edge.
    fn arrow_points(&self, from: usize, to: usize) -> Vec<(f64, f64)> {
        let a = self.bars[from];
        let b = self.bars[to];
        let padding = self.options.padding;
        let upward = from > to;

        let mut start_x = a.x + a.width / 2.0;
        while b.x < start_x + padding && start_x > a.x + padding {
            start_x -= ARROW_NUDGE;
        }
        let start_y = if upward { a.y } else { a.y + a.height };
        let end_x = b.x - padding / 2.0;
        let end_y = b.y + b.height / 2.0;

        if b.x < a.x + padding {
            let turn_y = if upward {
                start_y - padding / 2.0
            } else {
                start_y + padding / 2.0
            };
            let left = b.x - padding;
            vec![
                (start_x, start_y),
                (start_x, turn_y),
                (left, turn_y),
                (left, end_y),
                (end_x, end_y),
            ]
        } else {
            vec![(start_x, start_y), (start_x, end_y), (end_x, end_y)]
        }
    }
}
