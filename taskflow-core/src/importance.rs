//! Importance tier from difficulty and deadline proximity.

use chrono::{NaiveDate, NaiveDateTime};

use crate::task::{Difficulty, Importance};
use crate::time::days_until;

/// Medium is what undetected difficulty defaults to, so it adds nothing.
fn base_level(difficulty: Difficulty) -> i64 {
    match difficulty {
        Difficulty::Hard => 3,
        Difficulty::Easy => 1,
        Difficulty::Medium => 0,
    }
}

fn urgency_bonus(days_until_due: i64) -> i64 {
    match days_until_due {
        d if d < 0 => 5,
        d if d <= 1 => 4,
        d if d <= 3 => 3,
        d if d <= 5 => 2,
        d if d <= 7 => 1,
        _ => 0,
    }
}

/// Raw importance level before it is mapped to a tier.
pub fn importance_level(due: NaiveDate, difficulty: Difficulty, now: NaiveDateTime) -> i64 {
    base_level(difficulty) + urgency_bonus(days_until(due, now))
}

pub fn calculate_importance(
    due: NaiveDate,
    difficulty: Difficulty,
    now: NaiveDateTime,
) -> Importance {
    if days_until(due, now) < 0 {
        return Importance::Overdue;
    }
    match importance_level(due, difficulty, now) {
        l if l >= 4 => Importance::Critical,
        l if l >= 3 => Importance::Important,
        l if l >= 1 => Importance::Normal,
        _ => Importance::Optional,
    }
}
