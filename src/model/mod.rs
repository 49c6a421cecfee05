pub mod calendar;
pub mod dependency;
pub mod geometry;
pub mod locale;
pub mod normalize;
pub mod project;
pub mod snap;
pub mod task;
pub mod timeline;

pub use dependency::DependencyGraph;
pub use geometry::{BarGeometry, GeometryMapper};
pub use locale::Language;
pub use project::Project;
pub use task::{DateInput, DependencyInput, RawTask, Task};
pub use timeline::{Timeline, ViewScale};
