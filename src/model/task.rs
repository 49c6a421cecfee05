use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::calendar::{self, TimeUnit};

/// A date as it arrives from the outside: either an already-built instant
/// or text to be parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateInput {
    Instant(NaiveDateTime),
    Text(String),
}

impl DateInput {
    /// Resolve to an instant. Blank or malformed text resolves to `None`.
    pub fn resolve(&self) -> Option<NaiveDateTime> {
        match self {
            DateInput::Instant(t) => Some(*t),
            DateInput::Text(s) => calendar::parse(s),
        }
    }

    /// `true` unless this is blank text, which counts as "not supplied".
    pub fn is_present(&self) -> bool {
        match self {
            DateInput::Instant(_) => true,
            DateInput::Text(s) => !s.trim().is_empty(),
        }
    }
}

impl From<&str> for DateInput {
    fn from(s: &str) -> Self {
        DateInput::Text(s.to_string())
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(t: NaiveDateTime) -> Self {
        DateInput::Instant(t)
    }
}

/// Dependencies as supplied: a comma-separated string or a list of ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencyInput {
    List(Vec<String>),
    Text(String),
}

/// A task record before normalization. Every field is optional except the
/// name, which may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub start: Option<DateInput>,
    pub end: Option<DateInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<DependencyInput>,
    #[serde(alias = "customClass", skip_serializing_if = "Option::is_none")]
    pub custom_class: Option<String>,
}

impl RawTask {
    /// Create a raw task with a name and textual dates.
    pub fn new(name: impl Into<String>, start: &str, end: &str) -> Self {
        Self {
            name: name.into(),
            start: Some(start.into()),
            end: Some(end.into()),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_progress(mut self, progress: u32) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_dependencies(mut self, deps: &str) -> Self {
        self.dependencies = Some(DependencyInput::Text(deps.to_string()));
        self
    }
}

/// A normalized task, one row of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub start: NaiveDateTime,
    /// Exclusive end.
    pub end: NaiveDateTime,
    /// Percent complete, 0–100.
    pub progress: u32,
    /// Ids of the prerequisite tasks, unique, never containing `id`.
    pub dependencies: Vec<String>,
    /// Row, assigned from input order.
    pub index: usize,
    /// Dates were synthesized or repaired; the task is shown but not editable.
    pub invalid: bool,
    pub custom_class: Option<String>,
    pub(crate) start_supplied: bool,
    pub(crate) end_supplied: bool,
}

impl Task {
    /// Duration in exact hours.
    pub fn duration_hours(&self) -> f64 {
        calendar::hours_between(self.end, self.start)
    }

    pub fn depends_on(&self, id: &str) -> bool {
        self.dependencies.iter().any(|d| d == id)
    }

    /// Convert back into a raw record that normalizes to the same dates.
    ///
    /// A midnight end is written as the last day it covers, because the
    /// normalizer extends bare-date ends by a full day. Dates the input
    /// never supplied are left out so they are synthesized again.
    pub fn to_raw(&self) -> RawTask {
        let start = self.start_supplied.then(|| {
            DateInput::Text(calendar::to_date_string(
                self.start,
                calendar::has_time_of_day(self.start),
            ))
        });
        let end = self.end_supplied.then(|| {
            let text = if calendar::has_time_of_day(self.end) {
                calendar::to_date_string(self.end, true)
            } else {
                calendar::to_date_string(calendar::add(self.end, -1, TimeUnit::Day), false)
            };
            DateInput::Text(text)
        });

        RawTask {
            id: Some(self.id.clone()),
            name: self.name.clone(),
            start,
            end,
            progress: Some(self.progress),
            dependencies: (!self.dependencies.is_empty())
                .then(|| DependencyInput::List(self.dependencies.clone())),
            custom_class: self.custom_class.clone(),
        }
    }
}
