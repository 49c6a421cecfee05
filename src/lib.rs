#![forbid(unsafe_code)]
//! Interactive Gantt chart engine: task normalization, timeline layout,
//! date/pixel mapping and drag editing with grid snapping.

pub mod chart;
pub mod config;
pub mod error;
pub mod io;
pub mod model;

pub use chart::{EventHandler, Gantt, GanttEvent, RenderSurface};
pub use config::GanttOptions;
pub use error::{GanttError, Result};
pub use model::{RawTask, Task, ViewScale};
