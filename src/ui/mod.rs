pub mod gantt_chart;
pub mod popup;
pub mod task_table;
pub mod theme;
pub mod toolbar;
