//! Task model: parsed tasks produced from free text, and the store records
//! handed back to the scheduler.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

use crate::error::{Result, TaskflowError};
use crate::time::parse_due_instant;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Detection order. Earlier levels win when a text names several.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn priority(self) -> Priority {
        match self {
            Difficulty::Easy => Priority::Low,
            Difficulty::Medium => Priority::Medium,
            Difficulty::Hard => Priority::High,
        }
    }

    /// Days granted when the text names no deadline at all.
    pub fn fallback_days(self) -> i64 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn weight(self) -> u32 {
        match self {
            Priority::Urgent => 4,
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Optional,
    Normal,
    Important,
    Critical,
    Overdue,
}

impl Importance {
    /// Overdue has no tier of its own in the scorer and weighs like `normal`.
    pub fn weight(self) -> u32 {
        match self {
            Importance::Critical => 4,
            Importance::Important => 3,
            Importance::Normal | Importance::Overdue => 2,
            Importance::Optional => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
    Archived,
}

/// Structured record produced from one raw text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTask {
    pub title: String,
    pub difficulty: Difficulty,
    /// Hours.
    #[serde(rename = "time")]
    pub estimated_hours: f64,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
    pub priority: Priority,
    pub progress: u32,
    pub importance: Importance,
}

/// Store identifiers are either ObjectId strings or plain integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Int(i64),
    Text(String),
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Int(n) => write!(f, "{n}"),
            TaskId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TaskId {
    fn from(n: i64) -> Self {
        TaskId::Int(n)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId::Text(s.to_string())
    }
}

/// A pending task as supplied by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulableTask {
    #[serde(rename = "_id")]
    pub id: TaskId,
    pub title: String,
    pub priority: Priority,
    pub importance: Importance,

    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    #[serde(default)]
    pub due_date: Option<String>,

    /// Hours. Absent, zero, or negative means one hour.
    #[serde(default)]
    pub estimated_time: Option<f64>,

    /// Passed through as stored; the scheduler never reads it, so any JSON
    /// number is accepted.
    #[serde(default = "no_progress")]
    pub progress: Number,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

fn no_progress() -> Number {
    Number::from(0)
}

impl SchedulableTask {
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            priority: Priority::Medium,
            importance: Importance::Normal,
            due_date: None,
            estimated_time: None,
            progress: no_progress(),
            status: None,
        }
    }

    pub fn with_due_date(mut self, due: impl Into<String>) -> Self {
        self.due_date = Some(due.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_importance(mut self, importance: Importance) -> Self {
        self.importance = importance;
        self
    }

    pub fn with_estimate(mut self, hours: f64) -> Self {
        self.estimated_time = Some(hours);
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// The stored estimate, or one hour when it is missing or not positive.
    pub fn estimated_hours(&self) -> f64 {
        match self.estimated_time {
            Some(h) if h > 0.0 => h,
            _ => 1.0,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == Some(TaskStatus::Completed)
    }

    /// Resolve the stored due date to a wall-clock instant.
    pub fn due_instant(&self) -> Result<NaiveDateTime> {
        let raw = self
            .due_date
            .as_deref()
            .ok_or_else(|| TaskflowError::MissingDueDate(self.id.to_string()))?;

        parse_due_instant(raw).ok_or_else(|| TaskflowError::InvalidDueDate {
            id: self.id.to_string(),
            value: raw.to_string(),
        })
    }
}
