//! Pointer gestures on bars: hit testing, drag state and committing the
//! final geometry back to task dates and progress.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::events::GanttEvent;
use crate::model::calendar::{self, TimeUnit};
use crate::model::snap::snap;
use crate::model::{BarGeometry, DependencyGraph, GeometryMapper, Task, ViewScale};

/// How long a bar ignores clicks after a gesture changed it.
pub const CLICK_COOLDOWN: Duration = Duration::from_secs(1);
pub const HANDLE_WIDTH: f64 = 8.0;
pub const HANDLE_INSET: f64 = 1.0;
pub const PROGRESS_HANDLE_HALF_WIDTH: f64 = 5.0;
pub const PROGRESS_HANDLE_HEIGHT: f64 = 8.66;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Move,
    ResizeLeft,
    ResizeRight,
    Progress,
}

/// The bar (by row) and the part of it under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub index: usize,
    pub kind: GestureKind,
}

/// Whether `task` shows a progress handle.
pub fn has_progress_handle(task: &Task) -> bool {
    !task.invalid && task.progress > 0 && task.progress < 100
}

/// Find the bar part at (`x`, `y`). Handles win over the body, the
/// progress handle over the resize handles. Invalid tasks only report
/// their body.
pub fn hit_test(tasks: &[Task], bars: &[BarGeometry], x: f64, y: f64) -> Option<Hit> {
    tasks
        .iter()
        .zip(bars)
        .enumerate()
        .rev()
        .find_map(|(index, (task, bar))| {
            if !bar.contains(x, y) {
                return None;
            }
            let kind = if task.invalid {
                GestureKind::Move
            } else if has_progress_handle(task) && in_progress_handle(bar, x, y) {
                GestureKind::Progress
            } else if x >= bar.x + HANDLE_INSET && x <= bar.x + HANDLE_INSET + HANDLE_WIDTH {
                GestureKind::ResizeLeft
            } else if x >= bar.end_x() - HANDLE_INSET - HANDLE_WIDTH
                && x <= bar.end_x() - HANDLE_INSET
            {
                GestureKind::ResizeRight
            } else {
                GestureKind::Move
            };
            Some(Hit { index, kind })
        })
}

/// Triangle pointing up from the bar's bottom edge at the progress end.
fn in_progress_handle(bar: &BarGeometry, x: f64, y: f64) -> bool {
    let bottom = bar.y + bar.height;
    let apex = bottom - PROGRESS_HANDLE_HEIGHT;
    if y < apex || y > bottom {
        return false;
    }
    let half = PROGRESS_HANDLE_HALF_WIDTH * (y - apex) / PROGRESS_HANDLE_HEIGHT;
    (x - bar.progress_end_x()).abs() <= half
}

#[derive(Debug, Clone)]
struct Affected {
    index: usize,
    origin: BarGeometry,
    /// Rows of the task's prerequisites.
    prerequisites: Vec<usize>,
    progress: u32,
}

#[derive(Debug, Clone)]
struct Gesture {
    kind: GestureKind,
    parent: usize,
    origin_x: f64,
    /// Grabbed bar and its descendants, prerequisites before dependents.
    affected: Vec<Affected>,
    /// Last snapped delta, or the clamped progress delta.
    delta: f64,
}

#[derive(Debug, Clone, Default)]
enum Phase {
    #[default]
    Idle,
    Armed(Gesture),
    Active(Gesture),
}

/// Read-only state a gesture needs from the chart.
pub struct GestureContext<'a> {
    pub tasks: &'a [Task],
    pub graph: &'a DependencyGraph,
    pub rows: &'a HashMap<String, usize>,
}

#[derive(Debug, Default)]
pub struct InteractionController {
    phase: Phase,
    cooldown_until: HashMap<String, Instant>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bar is grabbed, whether or not the pointer has moved yet.
    pub fn is_busy(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Active(_))
    }

    pub fn kind(&self) -> Option<GestureKind> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Armed(g) | Phase::Active(g) => Some(g.kind),
        }
    }

    /// Rows taking part in the current gesture.
    pub fn affected_rows(&self) -> Vec<usize> {
        match &self.phase {
            Phase::Idle => Vec::new(),
            Phase::Armed(g) | Phase::Active(g) => g.affected.iter().map(|a| a.index).collect(),
        }
    }

    pub fn in_cooldown(&self, task_id: &str, now: Instant) -> bool {
        self.cooldown_until
            .get(task_id)
            .is_some_and(|until| now < *until)
    }

    /// Grab the bar under a pointer press. Returns `false` for invalid or
    /// unknown rows.
    pub fn arm(&mut self, hit: Hit, x: f64, ctx: &GestureContext<'_>, bars: &[BarGeometry]) -> bool {
        let Some(task) = ctx.tasks.get(hit.index) else {
            return false;
        };
        if task.invalid || bars.len() != ctx.tasks.len() {
            return false;
        }

        let members = if hit.kind == GestureKind::Progress {
            vec![hit.index]
        } else {
            let mut members = vec![hit.index];
            for id in ctx.graph.descendants(&task.id) {
                if let Some(&row) = ctx.rows.get(&id) {
                    if !ctx.tasks[row].invalid && !members.contains(&row) {
                        members.push(row);
                    }
                }
            }
            members
        };

        let affected = prerequisite_order(&members, ctx)
            .into_iter()
            .map(|row| Affected {
                index: row,
                origin: bars[row],
                prerequisites: ctx.tasks[row]
                    .dependencies
                    .iter()
                    .filter_map(|dep| ctx.rows.get(dep).copied())
                    .collect(),
                progress: ctx.tasks[row].progress,
            })
            .collect::<Vec<_>>();

        debug!(task = %task.id, kind = ?hit.kind, bars = affected.len(), "gesture armed");
        self.phase = Phase::Armed(Gesture {
            kind: hit.kind,
            parent: hit.index,
            origin_x: x,
            affected,
            delta: 0.0,
        });
        true
    }

    /// Apply a pointer move. Geometry is always derived from the snapshot
    /// taken at [`arm`](Self::arm), so replaying a position is stable.
    /// Returns `true` when a gesture is in progress.
    pub fn drag_to(
        &mut self,
        x: f64,
        bars: &mut [BarGeometry],
        scale: ViewScale,
        column_width: f64,
    ) -> bool {
        let mut gesture = match std::mem::take(&mut self.phase) {
            Phase::Idle => return false,
            Phase::Armed(g) => {
                debug!(kind = ?g.kind, "gesture started");
                g
            }
            Phase::Active(g) => g,
        };
        let raw = x - gesture.origin_x;

        if gesture.kind == GestureKind::Progress {
            if let Some(a) = gesture.affected.first() {
                let min = -a.origin.progress_width;
                let max = a.origin.width - a.origin.progress_width;
                let dx = raw.max(min).min(max);
                bars[a.index].progress_width = a.origin.progress_width + dx;
                gesture.delta = dx;
            }
        } else {
            let delta = snap(raw, scale, column_width);
            gesture.delta = delta;
            for a in &gesture.affected {
                let grabbed = a.index == gesture.parent;
                let (new_x, new_width) = match gesture.kind {
                    GestureKind::Move => (Some(a.origin.x + delta), None),
                    GestureKind::ResizeLeft if grabbed => {
                        (Some(a.origin.x + delta), Some(a.origin.width - delta))
                    }
                    GestureKind::ResizeLeft => (Some(a.origin.x + delta), None),
                    GestureKind::ResizeRight if grabbed => (None, Some(a.origin.width + delta)),
                    GestureKind::ResizeRight | GestureKind::Progress => (None, None),
                };
                apply(a, new_x, new_width, bars, column_width);
            }
        }

        self.phase = Phase::Active(gesture);
        true
    }

    /// End the gesture. Bars whose geometry changed are written back to
    /// their tasks, and every value that actually changed is reported.
    pub fn release(
        &mut self,
        now: Instant,
        tasks: &mut [Task],
        bars: &[BarGeometry],
        mapper: &GeometryMapper,
    ) -> Vec<GanttEvent> {
        self.cooldown_until.retain(|_, until| now < *until);

        let gesture = match std::mem::take(&mut self.phase) {
            Phase::Active(g) => g,
            Phase::Armed(_) | Phase::Idle => return Vec::new(),
        };
        if gesture.delta == 0.0 {
            debug!("gesture ended without movement");
            return Vec::new();
        }

        let mut events = Vec::new();
        for a in &gesture.affected {
            let bar = bars[a.index];
            let task = &mut tasks[a.index];
            self.cooldown_until
                .insert(task.id.clone(), now + CLICK_COOLDOWN);

            if gesture.kind == GestureKind::Progress {
                if bar.progress_width == a.origin.progress_width || bar.width <= 0.0 {
                    continue;
                }
                let progress = ((bar.progress_width / bar.width * 100.0).trunc() as u32).min(100);
                if progress != task.progress {
                    info!(task = %task.id, progress, "progress changed");
                    task.progress = progress;
                    events.push(GanttEvent::ProgressChange {
                        task_id: task.id.clone(),
                        progress,
                    });
                }
                continue;
            }

            if bar.x == a.origin.x && bar.width == a.origin.width {
                continue;
            }
            let (start, end) = mapper.dates_for(&bar);
            if start != task.start || end != task.end {
                info!(task = %task.id, %start, %end, "dates changed");
                task.start = start;
                task.end = end;
                events.push(GanttEvent::DateChange {
                    task_id: task.id.clone(),
                    start,
                    end: calendar::add(end, -1, TimeUnit::Second),
                });
            }
        }
        events
    }

    /// Drop the gesture without committing anything.
    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
    }
}

/// Move and resize one bar. A candidate x left of any prerequisite bar
/// rejects the whole update; a width under one column is ignored.
fn apply(
    a: &Affected,
    x: Option<f64>,
    width: Option<f64>,
    bars: &mut [BarGeometry],
    column_width: f64,
) {
    if let Some(x) = x {
        if a.prerequisites.iter().any(|&p| x < bars[p].x) {
            return;
        }
        bars[a.index].x = x;
    }
    if let Some(width) = width {
        if width >= column_width {
            bars[a.index].width = width;
        }
    }
    let bar = &mut bars[a.index];
    bar.progress_width = bar.progress_width_for(a.progress);
}

/// Order `members` so that a task comes after its prerequisites within the
/// set, keeping discovery order otherwise. Cycles fall back to discovery
/// order.
fn prerequisite_order(members: &[usize], ctx: &GestureContext<'_>) -> Vec<usize> {
    let mut remaining: Vec<usize> = members.to_vec();
    let mut ordered: Vec<usize> = Vec::with_capacity(members.len());

    while !remaining.is_empty() {
        let ready = remaining.iter().position(|&row| {
            ctx.tasks[row].dependencies.iter().all(|dep| {
                ctx.rows
                    .get(dep)
                    .map_or(true, |p| !remaining.contains(p) || *p == row)
            })
        });
        ordered.push(remaining.remove(ready.unwrap_or(0)));
    }
    ordered
}
