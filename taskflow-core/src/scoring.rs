//! Priority score used to order tasks before they are placed into days.
//!
//! score = priority weight × 10 + importance weight × 5, doubled when the task
//! is due within a day and raised by half when due within three.

use chrono::NaiveDateTime;

use crate::error::Result;
use crate::task::SchedulableTask;
use crate::time::days_between;

pub fn score_task(task: &SchedulableTask, now: NaiveDateTime) -> Result<f64> {
    let due = task.due_instant()?;
    Ok(score_at(task, due, now))
}

/// Score against an already-resolved due instant.
pub(crate) fn score_at(task: &SchedulableTask, due: NaiveDateTime, now: NaiveDateTime) -> f64 {
    // Overdue and due-today share the top multiplier.
    let days_until_due = days_between(due, now).max(0);
    let base = f64::from(task.priority.weight() * 10 + task.importance.weight() * 5);

    match days_until_due {
        d if d <= 1 => base * 2.0,
        d if d <= 3 => base * 1.5,
        _ => base,
    }
}
