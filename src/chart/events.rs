use chrono::NaiveDateTime;

use crate::model::ViewScale;

/// Notifications raised by the chart. Delivered synchronously.
#[derive(Debug, Clone, PartialEq)]
pub enum GanttEvent {
    /// A bar was moved or resized. `end` is the last covered second, one
    /// second before the task's exclusive end.
    DateChange {
        task_id: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    ProgressChange {
        task_id: String,
        progress: u32,
    },
    /// Double click on an editable bar.
    Click {
        task_id: String,
    },
    ViewChange(ViewScale),
}

impl GanttEvent {
    pub fn task_id(&self) -> Option<&str> {
        match self {
            GanttEvent::DateChange { task_id, .. }
            | GanttEvent::ProgressChange { task_id, .. }
            | GanttEvent::Click { task_id } => Some(task_id),
            GanttEvent::ViewChange(_) => None,
        }
    }
}

pub trait EventHandler {
    fn handle(&mut self, event: &GanttEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&GanttEvent),
{
    fn handle(&mut self, event: &GanttEvent) {
        self(event)
    }
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreEvents;

impl EventHandler for IgnoreEvents {
    fn handle(&mut self, _event: &GanttEvent) {}
}

/// Forwards events into a channel. A closed receiver is ignored.
impl EventHandler for std::sync::mpsc::Sender<GanttEvent> {
    fn handle(&mut self, event: &GanttEvent) {
        let _ = self.send(event.clone());
    }
}
