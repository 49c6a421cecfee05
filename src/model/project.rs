use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task::{RawTask, Task};

/// A saved chart: task records as the user supplied them, plus metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<RawTask>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            name: "Untitled Project".to_string(),
            tasks: Vec::new(),
            created: Utc::now(),
            modified: Utc::now(),
        }
    }
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Replace the stored records with the current state of the chart.
    pub fn sync_from(&mut self, tasks: &[Task]) {
        self.tasks = tasks.iter().map(Task::to_raw).collect();
        self.touch();
    }

    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }
}
