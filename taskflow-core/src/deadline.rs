//! Due-date resolution from free text.
//!
//! Rules are tried in order and the first one that yields a date wins:
//!
//! 1. shortcuts: "next week", "tomorrow"/"tmr"/"tmrw", "after N days",
//!    "in the next N days" (middle of the window)
//! 2. generic phrases: "due ...", "by ...", "in N days/weeks/months",
//!    "next/this <weekday|month>", "on ...", "5th of March", "March 5"
//! 3. no phrase resolved: an offset chosen by difficulty
//!
//! A generic phrase that matches but does not read as a date falls through to
//! the next rule.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use regex::{Captures, Regex};

use crate::difficulty::extract_difficulty;
use crate::error::{Result, TaskflowError};
use crate::time::{add_days, add_months};

const ORDINAL_DAY: &str = r"\d{1,2}(?:st|nd|rd|th)?";
const WEEKDAYS: &str = concat!(
    "monday|tuesday|wednesday|thursday|friday|saturday|sunday|",
    "mon|tue|wed|thu|fri|sat|sun"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    /// Fixed offset in days from now.
    Offset(i64),
    /// "after N days": N days.
    AfterDays,
    /// "in the next N days": floor(N / 2) days.
    HalfWindow,
    /// Anything else; the matched text is read as a date phrase.
    Phrase,
}

#[derive(Debug, Clone)]
struct DeadlineRule {
    pattern: Regex,
    rule: Rule,
}

#[derive(Debug, Clone)]
pub struct DeadlineExtractor {
    rules: Vec<DeadlineRule>,
    number: Regex,
    unit: Regex,
    leading_keyword: Regex,
    relative: Regex,
    month_first: Regex,
    day_first: Regex,
}

impl DeadlineExtractor {
    pub fn new() -> Result<Self> {
        let shortcuts = [
            (r"\bnext\s+week\b".to_string(), Rule::Offset(7)),
            (r"\b(?:tomorrow|tmr|tmrw)\b".to_string(), Rule::Offset(1)),
            (r"after\s+(\d+)\s+days?".to_string(), Rule::AfterDays),
            (r"in\s+the\s+next\s+(\d+)\s+days?".to_string(), Rule::HalfWindow),
        ];

        let weekdays = WEEKDAYS;
        let phrases = [
            format!(r"due\s+(?:on\s+)?(?:\w+(?:\s+{ORDINAL_DAY})?|{ORDINAL_DAY}\s+\w+)"),
            format!(r"by\s+(?:\w+(?:\s+{ORDINAL_DAY})?|{ORDINAL_DAY}\s+\w+)"),
            r"in\s+(\d+)\s+(?:day|days|week|weeks|month|months)".to_string(),
            format!(r"\bnext\s+(?:month|{weekdays})\b"),
            format!(r"\bthis\s+(?:week|month|{weekdays})\b"),
            format!(r"\bon\s+(?:\w+(?:\s+{ORDINAL_DAY})?|{ORDINAL_DAY}\s+\w+)"),
            format!(r"{ORDINAL_DAY}\s+(?:of\s+)?\w+"),
            format!(r"\w+\s+{ORDINAL_DAY}"),
        ];

        let rules = shortcuts
            .into_iter()
            .chain(phrases.into_iter().map(|p| (p, Rule::Phrase)))
            .map(|(pattern, rule)| -> Result<DeadlineRule> {
                Ok(DeadlineRule {
                    pattern: Regex::new(&format!("(?i){pattern}"))?,
                    rule,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            rules,
            number: Regex::new(r"\d+")?,
            unit: Regex::new(r"(?i)day|week|month")?,
            leading_keyword: Regex::new(r"(?i)^(?:(?:due|by|on)\s+)+")?,
            relative: Regex::new(r"^(next|this)\s+([a-z]+)$")?,
            month_first: Regex::new(r"^([a-z]+)\s+(\d{1,2})(?:st|nd|rd|th)?$")?,
            day_first: Regex::new(r"^(\d{1,2})(?:st|nd|rd|th)?\s+(?:of\s+)?([a-z]+)$")?,
        })
    }

    /// Resolve the due date, falling back to a difficulty-based offset.
    pub fn extract(&self, text: &str, now: NaiveDateTime) -> Result<NaiveDate> {
        match self.explicit(text, now)? {
            Some(date) => Ok(date),
            None => add_days(now, extract_difficulty(text).fallback_days()),
        }
    }

    /// Resolve a date from the text's own phrases only.
    pub fn explicit(&self, text: &str, now: NaiveDateTime) -> Result<Option<NaiveDate>> {
        for DeadlineRule { pattern, rule } in &self.rules {
            let Some(caps) = pattern.captures(text) else {
                continue;
            };
            let resolved = match rule {
                Rule::Offset(days) => Some(add_days(now, *days)?),
                Rule::AfterDays => Some(add_days(now, capture_count(&caps)?)?),
                Rule::HalfWindow => Some(add_days(now, capture_count(&caps)? / 2)?),
                Rule::Phrase => self.resolve_phrase(&caps[0], now)?,
            };
            if resolved.is_some() {
                return Ok(resolved);
            }
        }
        Ok(None)
    }

    fn resolve_phrase(&self, phrase: &str, now: NaiveDateTime) -> Result<Option<NaiveDate>> {
        let lower = phrase.to_lowercase();

        // "in 3 weeks", and any other match that happens to carry "in" plus a count and unit.
        if lower.contains("in") {
            if let (Some(n), Some(unit)) = (self.number.find(&lower), self.unit.find(&lower)) {
                let n = parse_count(n.as_str())?;
                return match unit.as_str() {
                    "day" => add_days(now, n).map(Some),
                    "week" => {
                        let days = n.checked_mul(7).ok_or_else(|| TaskflowError::DateOutOfRange {
                            base: now.to_string(),
                            offset: format!("{n} weeks"),
                        })?;
                        add_days(now, days).map(Some)
                    }
                    _ => {
                        let months = u32::try_from(n)
                            .map_err(|_| TaskflowError::InvalidNumber(n.to_string()))?;
                        add_months(now, months).map(Some)
                    }
                };
            }
        }

        if let Some(caps) = self.relative.captures(&lower) {
            if let Some(date) = resolve_relative(&caps[1], &caps[2], now)? {
                return Ok(Some(date));
            }
        }

        let rest = self.leading_keyword.replace(&lower, "");
        let Some(date) = self.month_and_day(rest.trim(), now.year()) else {
            return Ok(None);
        };

        // A date already behind us means next year's occurrence.
        if date.and_time(NaiveTime::MIN) < now {
            let rolled = date.checked_add_months(Months::new(12)).ok_or_else(|| {
                TaskflowError::DateOutOfRange {
                    base: date.to_string(),
                    offset: "1 year".to_string(),
                }
            })?;
            return Ok(Some(rolled));
        }
        Ok(Some(date))
    }

    /// "march 5", "march 5th", "5th of march", "5 mar".
    fn month_and_day(&self, text: &str, year: i32) -> Option<NaiveDate> {
        let (month, day) = if let Some(caps) = self.month_first.captures(text) {
            (month_number(&caps[1])?, caps[2].parse().ok()?)
        } else if let Some(caps) = self.day_first.captures(text) {
            (month_number(&caps[2])?, caps[1].parse().ok()?)
        } else {
            return None;
        };
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

fn capture_count(caps: &Captures<'_>) -> Result<i64> {
    parse_count(&caps[1])
}

fn parse_count(digits: &str) -> Result<i64> {
    digits
        .parse()
        .map_err(|_| TaskflowError::InvalidNumber(digits.to_string()))
}

/// "next friday" is the first Friday after today; "this friday" may be today.
fn resolve_relative(which: &str, word: &str, now: NaiveDateTime) -> Result<Option<NaiveDate>> {
    if word == "month" {
        return if which == "next" {
            add_months(now, 1).map(Some)
        } else {
            Ok(None)
        };
    }
    let Ok(target) = word.parse::<Weekday>() else {
        return Ok(None);
    };
    let ahead = (target.num_days_from_monday() + 7 - now.weekday().num_days_from_monday()) % 7;
    let ahead = match (which, ahead) {
        ("next", 0) => 7,
        (_, n) => n,
    };
    add_days(now, i64::from(ahead)).map(Some)
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        // Monday
        NaiveDate::from_ymd_opt(2024, 6, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn due(text: &str) -> NaiveDate {
        DeadlineExtractor::new().unwrap().extract(text, now()).unwrap()
    }

    #[test]
    fn test_tomorrow_variants() {
        for text in ["call mom tomorrow", "call mom tmr", "Call mom TMRW please"] {
            assert_eq!(due(text), date(2024, 6, 11), "{text}");
        }
    }

    #[test]
    fn test_next_week_is_seven_days() {
        assert_eq!(due("finish slides next week"), date(2024, 6, 17));
    }

    #[test]
    fn test_shortcut_order() {
        // "next week" is checked before "tomorrow".
        assert_eq!(due("tomorrow or next week"), date(2024, 6, 17));
    }

    #[test]
    fn test_after_and_window() {
        assert_eq!(due("submit form after 5 days"), date(2024, 6, 15));
        assert_eq!(due("read book in the next 10 days"), date(2024, 6, 15));
        assert_eq!(due("read book in the next 3 days"), date(2024, 6, 11));
    }

    #[test]
    fn test_in_n_units() {
        assert_eq!(due("lab report in 3 days"), date(2024, 6, 13));
        assert_eq!(due("lab report in 2 weeks"), date(2024, 6, 24));
        assert_eq!(due("renew passport in 2 months"), date(2024, 8, 10));
        // "due in 3" matches first but has no unit, so the count phrase decides.
        assert_eq!(due("essay due in 3 days"), date(2024, 6, 13));
    }

    #[test]
    fn test_month_and_day() {
        assert_eq!(due("Essay due July 4"), date(2024, 7, 4));
        assert_eq!(due("Essay due on July 4th"), date(2024, 7, 4));
        assert_eq!(due("tax forms by 15th of August"), date(2024, 8, 15));
        assert_eq!(due("dentist Sep 3"), date(2024, 9, 3));
    }

    #[test]
    fn test_past_month_day_rolls_to_next_year() {
        assert_eq!(due("renew lease by March 1"), date(2025, 3, 1));
        // Midnight of today is already behind a 09:00 clock.
        assert_eq!(due("report due June 10"), date(2025, 6, 10));
    }

    #[test]
    fn test_relative_weekdays() {
        assert_eq!(due("gym next friday"), date(2024, 6, 14));
        assert_eq!(due("gym next monday"), date(2024, 6, 17));
        assert_eq!(due("gym this monday"), date(2024, 6, 10));
        assert_eq!(due("budget next month"), date(2024, 7, 10));
    }

    #[test]
    fn test_unreadable_phrase_falls_through_to_difficulty() {
        // "due soon" and "room 12" match generic patterns but are not dates.
        assert_eq!(due("project due soon hard"), date(2024, 6, 13));
        assert_eq!(due("clean room 12 easy"), date(2024, 6, 11));
        assert_eq!(due("plan the week this week"), date(2024, 6, 12));
    }

    #[test]
    fn test_difficulty_fallback() {
        assert_eq!(due("refactor parser hard"), date(2024, 6, 13));
        assert_eq!(due("water plants easy"), date(2024, 6, 11));
        assert_eq!(due("laundry medium"), date(2024, 6, 12));
        assert_eq!(due("laundry"), date(2024, 6, 12));
    }

    #[test]
    fn test_explicit_is_none_without_phrase() {
        let extractor = DeadlineExtractor::new().unwrap();
        assert_eq!(extractor.explicit("laundry", now()).unwrap(), None);
    }

    #[test]
    fn test_oversized_count_is_an_error() {
        let extractor = DeadlineExtractor::new().unwrap();
        assert!(extractor
            .extract("ship after 99999999999999999999 days", now())
            .is_err());
        assert!(matches!(
            extractor.extract("ship after 999999999999 days", now()),
            Err(TaskflowError::DateOutOfRange { .. })
        ));
    }
}
