use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::{NaiveDate, NaiveDateTime};
use gantt::chart::{ArrowView, BarView, GridView};
use gantt::{Gantt, GanttEvent, GanttOptions, RawTask, RenderSurface, ViewScale};

#[derive(Default)]
struct Recorder {
    frames: usize,
    bars: Vec<BarView>,
    arrows: Vec<ArrowView>,
    active: HashSet<String>,
}

impl RenderSurface for Recorder {
    fn clear(&mut self) {
        self.frames += 1;
        self.bars.clear();
        self.arrows.clear();
    }

    fn draw_grid(&mut self, _grid: &GridView) {}

    fn draw_bar(&mut self, bar: &BarView) {
        self.bars.push(bar.clone());
    }

    fn draw_arrow(&mut self, arrow: &ArrowView) {
        self.arrows.push(arrow.clone());
    }

    fn measure_text(&self, text: &str) -> f64 {
        text.chars().count() as f64 * 7.0
    }

    fn set_active(&mut self, task_id: &str, active: bool) {
        if active {
            self.active.insert(task_id.to_string());
        } else {
            self.active.remove(task_id);
        }
    }
}

type Sink = Rc<RefCell<Vec<GanttEvent>>>;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

fn chart_with(tasks: &[RawTask]) -> (Gantt<Recorder>, Sink) {
    let events: Sink = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let gantt = Gantt::new_at(
        Recorder::default(),
        tasks,
        GanttOptions::default(),
        move |e: &GanttEvent| sink.borrow_mut().push(e.clone()),
        at(2024, 3, 2, 0, 0, 0),
    )
    .unwrap();
    events.borrow_mut().clear();
    (gantt, events)
}

/// `a` (Mar 1-3) feeds `b` (Mar 4-6, 30% done).
fn chain() -> (Gantt<Recorder>, Sink) {
    chart_with(&[
        RawTask::new("Research", "2024-03-01", "2024-03-03").with_id("a"),
        RawTask::new("Write", "2024-03-04", "2024-03-06")
            .with_id("b")
            .with_dependencies("a")
            .with_progress(30),
    ])
}

#[test]
fn test_construction_reports_the_initial_view() {
    let events: Sink = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let mut gantt = Gantt::new_at(
        Recorder::default(),
        &[RawTask::new("Solo", "2024-03-01", "2024-03-02")],
        GanttOptions::for_scale(ViewScale::Week),
        move |e: &GanttEvent| sink.borrow_mut().push(e.clone()),
        at(2024, 3, 2, 0, 0, 0),
    )
    .unwrap();
    assert_eq!(*events.borrow(), vec![GanttEvent::ViewChange(ViewScale::Week)]);

    gantt.refresh(&[]);
    assert_eq!(events.borrow().len(), 2);
    assert!(gantt.surface().bars.is_empty());
}

#[test]
fn test_moving_a_prerequisite_drags_its_dependents() {
    let (mut gantt, events) = chain();
    let a = *gantt.bar("a").unwrap();
    let b = *gantt.bar("b").unwrap();
    let grab = a.x + 40.0;

    assert!(gantt.pointer_down(grab, a.y + 5.0));
    assert!(gantt.is_active("a"));
    assert!(gantt.surface().active.contains("a"));

    assert!(gantt.pointer_move(grab + 40.0));
    assert!(gantt.is_dragging());
    assert_eq!(gantt.bar("a").unwrap().x, a.x + 38.0);
    assert_eq!(gantt.bar("b").unwrap().x, b.x + 38.0);

    let reported = gantt.pointer_up(Instant::now());
    assert_eq!(
        reported,
        vec![
            GanttEvent::DateChange {
                task_id: "a".into(),
                start: at(2024, 3, 2, 0, 0, 0),
                end: at(2024, 3, 4, 23, 59, 59),
            },
            GanttEvent::DateChange {
                task_id: "b".into(),
                start: at(2024, 3, 5, 0, 0, 0),
                end: at(2024, 3, 7, 23, 59, 59),
            },
        ]
    );
    assert_eq!(*events.borrow(), reported);
    assert_eq!(gantt.task("a").unwrap().start, at(2024, 3, 2, 0, 0, 0));
    assert!(!gantt.is_active("a"));
    assert!(!gantt.is_dragging());
}

#[test]
fn test_a_drag_below_half_a_column_changes_nothing() {
    let (mut gantt, events) = chain();
    let a = *gantt.bar("a").unwrap();
    gantt.pointer_down(a.x + 40.0, a.y + 5.0);
    gantt.pointer_move(a.x + 50.0);
    assert_eq!(gantt.bar("a").unwrap().x, a.x);
    assert!(gantt.pointer_up(Instant::now()).is_empty());
    assert!(events.borrow().is_empty());
}

#[test]
fn test_dependents_cannot_start_before_their_prerequisite() {
    let (mut gantt, events) = chain();
    let b = *gantt.bar("b").unwrap();
    let before = gantt.task("b").unwrap().clone();

    gantt.pointer_down(b.x + 50.0, b.y + 5.0);
    gantt.pointer_move(b.x + 50.0 - 150.0);
    assert_eq!(gantt.bar("b").unwrap().x, b.x);

    assert!(gantt.pointer_up(Instant::now()).is_empty());
    assert!(events.borrow().is_empty());
    assert_eq!(gantt.task("b").unwrap(), &before);
}

#[test]
fn test_resizing_never_goes_below_one_column() {
    let (mut gantt, _) = chain();
    let a = *gantt.bar("a").unwrap();
    let grab = a.end_x() - 5.0;

    assert!(gantt.pointer_down(grab, a.y + 5.0));
    gantt.pointer_move(grab - 100.0);
    assert_eq!(gantt.bar("a").unwrap().width, a.width);

    gantt.pointer_move(grab - 76.0);
    assert_eq!(gantt.bar("a").unwrap().width, 38.0);

    let reported = gantt.pointer_up(Instant::now());
    assert_eq!(
        reported,
        vec![GanttEvent::DateChange {
            task_id: "a".into(),
            start: at(2024, 3, 1, 0, 0, 0),
            end: at(2024, 3, 1, 23, 59, 59),
        }]
    );
}

#[test]
fn test_progress_handle_sets_whole_percent() {
    let (mut gantt, _) = chain();
    let b = *gantt.bar("b").unwrap();
    let handle_x = b.progress_end_x();
    let bottom = b.y + b.height - 1.0;

    assert!(gantt.pointer_down(handle_x, bottom));
    gantt.pointer_move(handle_x + 40.0);
    let reported = gantt.pointer_up(Instant::now());
    assert_eq!(
        reported,
        vec![GanttEvent::ProgressChange {
            task_id: "b".into(),
            progress: 65,
        }]
    );
    assert_eq!(gantt.task("b").unwrap().progress, 65);
    assert_eq!(gantt.task("b").unwrap().start, at(2024, 3, 4, 0, 0, 0));
}

#[test]
fn test_recent_edit_suppresses_clicks_and_popup() {
    let (mut gantt, events) = chain();
    let a = *gantt.bar("a").unwrap();
    let released = Instant::now();
    gantt.pointer_down(a.x + 40.0, a.y + 5.0);
    gantt.pointer_move(a.x + 80.0);
    gantt.pointer_up(released);
    events.borrow_mut().clear();

    let a = *gantt.bar("a").unwrap();
    let soon = released + Duration::from_millis(500);
    assert!(!gantt.double_click(a.x + 40.0, a.y + 5.0, soon));
    assert!(gantt.click(a.x + 40.0, a.y + 5.0, soon).is_none());
    assert!(events.borrow().is_empty());

    let later = released + Duration::from_millis(1100);
    assert!(gantt.double_click(a.x + 40.0, a.y + 5.0, later));
    assert_eq!(
        *events.borrow(),
        vec![GanttEvent::Click {
            task_id: "a".into()
        }]
    );
    assert!(gantt.click(a.x + 40.0, a.y + 5.0, later).is_some());
}

#[test]
fn test_invalid_tasks_are_shown_but_not_editable() {
    let (mut gantt, events) = chart_with(&[RawTask::new("Draft", "2024-03-10", "").with_id("d")]);
    let task = gantt.task("d").unwrap();
    assert!(task.invalid);
    let view = &gantt.surface().bars[0];
    assert!(view.invalid);
    assert!(!view.resize_handles);
    assert!(!view.progress_handle);

    let bar = *gantt.bar("d").unwrap();
    assert!(!gantt.pointer_down(bar.x + 2.0, bar.y + 5.0));
    assert!(!gantt.pointer_move(bar.x + 100.0));
    assert!(!gantt.double_click(bar.x + 2.0, bar.y + 5.0, Instant::now()));
    assert!(events.borrow().is_empty());
}

#[test]
fn test_redraws_keep_one_arrow_per_dependency() {
    let (mut gantt, _) = chain();
    let frames = gantt.surface().frames;
    let a = *gantt.bar("a").unwrap();
    gantt.pointer_down(a.x + 40.0, a.y + 5.0);
    gantt.pointer_move(a.x + 80.0);
    assert!(gantt.surface().frames > frames);
    assert_eq!(gantt.surface().arrows.len(), 1);
    assert_eq!(gantt.surface().bars.len(), 2);
    gantt.pointer_up(Instant::now());
    assert_eq!(gantt.surface().arrows.len(), 1);
}
