//! Daily scheduler: greedy placement of scored tasks into per-day buckets.
//!
//! Each task may only land on its own due date. If that day's remaining
//! capacity is too small the task overflows; it is never moved to an earlier
//! or later day and there is no second pass.

use chrono::NaiveDateTime;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use tracing::debug;

use crate::error::{Result, TaskflowError};
use crate::scoring::score_at;
use crate::task::SchedulableTask;
use crate::time::{clock_label, days_between};

pub const DEFAULT_MAX_HOURS_PER_DAY: f64 = 5.0;
pub const DEFAULT_DAY_START_HOUR: u32 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub max_hours_per_day: f64,
    pub day_start_hour: u32,
}

impl SchedulerConfig {
    /// Capacity must be a positive number of hours and the day must start
    /// at a real hour.
    pub fn validate(&self) -> Result<()> {
        if self.max_hours_per_day.is_nan() || self.max_hours_per_day <= 0.0 {
            return Err(TaskflowError::InvalidSchedulerConfig(format!(
                "max_hours_per_day must be positive, got {}",
                self.max_hours_per_day
            )));
        }
        if self.day_start_hour > 23 {
            return Err(TaskflowError::InvalidSchedulerConfig(format!(
                "day_start_hour must be 0-23, got {}",
                self.day_start_hour
            )));
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_hours_per_day: DEFAULT_MAX_HOURS_PER_DAY,
            day_start_hour: DEFAULT_DAY_START_HOUR,
        }
    }
}

/// A store task plus its score. `estimatedTime` is always filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTask {
    #[serde(flatten)]
    pub task: SchedulableTask,
    pub score: f64,
    #[serde(skip)]
    due: NaiveDateTime,
}

impl ScoredTask {
    pub fn new(task: &SchedulableTask, now: NaiveDateTime) -> Result<Self> {
        let due = task.due_instant()?;
        let mut task = task.clone();
        task.estimated_time = Some(task.estimated_hours());
        Ok(Self {
            score: score_at(&task, due, now),
            task,
            due,
        })
    }

    pub fn hours(&self) -> f64 {
        self.task.estimated_hours()
    }

    /// Bucket key: the calendar day the task is due.
    pub fn day_key(&self) -> String {
        self.due.date().format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntry {
    #[serde(flatten)]
    pub scored: ScoredTask,
    pub time: f64,
    pub start_time: String,
    pub end_time: String,
    pub days_until_deadline: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnscheduledTask {
    #[serde(flatten)]
    pub scored: ScoredTask,
    pub days_until_deadline: i64,
}

/// Day buckets in the order they were first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    order: Vec<String>,
    buckets: HashMap<String, Vec<ScheduleEntry>>,
}

impl Schedule {
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of day buckets, including days whose only task overflowed.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn day(&self, key: &str) -> Option<&[ScheduleEntry]> {
        self.buckets.get(key).map(Vec::as_slice)
    }

    pub fn days(&self) -> impl Iterator<Item = (&str, &[ScheduleEntry])> {
        self.order
            .iter()
            .map(|key| (key.as_str(), self.day(key).unwrap_or_default()))
    }

    fn bucket_mut(&mut self, key: &str) -> &mut Vec<ScheduleEntry> {
        if !self.buckets.contains_key(key) {
            self.order.push(key.to_string());
        }
        self.buckets.entry(key.to_string()).or_default()
    }
}

impl Serialize for Schedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for (key, entries) in self.days() {
            map.serialize_entry(key, entries)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScheduleOutput {
    pub schedule: Schedule,
    pub unscheduled_tasks: Vec<UnscheduledTask>,
}

#[derive(Debug, Clone, Default)]
pub struct DailyScheduler {
    config: SchedulerConfig,
}

impl DailyScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Score, order, and place `tasks`.
    ///
    /// `now` is UTC wall time, the frame store due dates resolve to. Equal
    /// scores keep their input order, so callers should pass tasks sorted by
    /// due date (see [`pending_by_due_date`]). Any task with a missing or
    /// malformed due date fails the whole run, as does an invalid config.
    pub fn schedule(
        &self,
        tasks: &[SchedulableTask],
        now: NaiveDateTime,
    ) -> Result<ScheduleOutput> {
        self.config.validate()?;
        if tasks.is_empty() {
            return Ok(ScheduleOutput::default());
        }

        let mut scored = tasks
            .iter()
            .map(|t| ScoredTask::new(t, now))
            .collect::<Result<Vec<_>>>()?;
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        let mut out = ScheduleOutput::default();

        for task in scored {
            let days_until_deadline = days_between(task.due, now);
            let hours = task.hours();
            let bucket = out.schedule.bucket_mut(&task.day_key());
            let booked: f64 = bucket.iter().map(|e| e.time).sum();

            if booked + hours <= self.config.max_hours_per_day {
                let start = f64::from(self.config.day_start_hour) + booked;
                bucket.push(ScheduleEntry {
                    scored: task,
                    time: hours,
                    start_time: clock_label(start),
                    end_time: clock_label(start + hours),
                    days_until_deadline,
                });
            } else {
                out.unscheduled_tasks.push(UnscheduledTask {
                    scored: task,
                    days_until_deadline,
                });
            }
        }

        debug!(
            days = out.schedule.len(),
            unscheduled = out.unscheduled_tasks.len(),
            "built schedule"
        );
        Ok(out)
    }
}

/// What the store hands the scheduler: everything not completed, earliest
/// due date first. Ties keep their input order.
pub fn pending_by_due_date(tasks: Vec<SchedulableTask>) -> Result<Vec<SchedulableTask>> {
    let mut keyed = tasks
        .into_iter()
        .filter(|t| !t.is_completed())
        .map(|t| t.due_instant().map(|due| (due, t)))
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by_key(|(due, _)| *due);
    Ok(keyed.into_iter().map(|(_, t)| t).collect())
}
