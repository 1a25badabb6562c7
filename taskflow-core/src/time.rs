//! Time utilities: day arithmetic against an explicit "now", due-date parsing
//! for store records, and clock labels for schedule slots.
//!
//! Text parsing reads "now" as local wall time, since "tomorrow" means the
//! user's tomorrow. Scheduling compares against store due dates, which are
//! absolute, so its "now" is UTC wall time.

use chrono::{DateTime, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, TaskflowError};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Whole days from `now` until `due`, rounded up. Negative once `due` has passed.
pub fn days_between(due: NaiveDateTime, now: NaiveDateTime) -> i64 {
    let ms = (due - now).num_milliseconds();
    (ms + MILLIS_PER_DAY - 1).div_euclid(MILLIS_PER_DAY)
}

/// Like [`days_between`], measuring from the start of `due`.
pub fn days_until(due: NaiveDate, now: NaiveDateTime) -> i64 {
    days_between(due.and_time(NaiveTime::MIN), now)
}

pub fn add_days(now: NaiveDateTime, days: i64) -> Result<NaiveDate> {
    let out_of_range = || TaskflowError::DateOutOfRange {
        base: now.to_string(),
        offset: format!("{days} days"),
    };
    let delta = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        now.checked_add_days(delta)
    } else {
        now.checked_sub_days(delta)
    };
    shifted.map(|dt| dt.date()).ok_or_else(out_of_range)
}

/// Calendar months; day-of-month clamps to the end of shorter months.
pub fn add_months(now: NaiveDateTime, months: u32) -> Result<NaiveDate> {
    now.checked_add_months(Months::new(months))
        .map(|dt| dt.date())
        .ok_or_else(|| TaskflowError::DateOutOfRange {
            base: now.to_string(),
            offset: format!("{months} months"),
        })
}

/// Parse a store due date as UTC wall time: a bare `YYYY-MM-DD` (midnight
/// UTC), an RFC 3339 timestamp, or a naive `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_due_instant(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d.and_time(NaiveTime::MIN));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

/// Parse an IANA zone name like "America/Chicago".
pub fn parse_zone(tz: &str) -> Result<Tz> {
    tz.parse::<Tz>()
        .map_err(|_| TaskflowError::InvalidTimezone(tz.to_string()))
}

/// Current time in `zone`.
pub fn now_in_zone(zone: Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(&zone)
}

/// Parse a caller-supplied reference time. RFC 3339 carries its own offset;
/// a bare date or a local datetime (with or without seconds) is wall time in
/// `zone`. Local times skipped by a DST jump do not parse.
pub fn parse_reference_time(raw: &str, zone: Tz) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&zone));
    }
    let local = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .ok()
        .or_else(|| {
            ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        })?;
    zone.from_local_datetime(&local).earliest()
}

/// Render fractional hours as a clock label: `9:00`, `13:00`, `10:30`.
pub fn clock_label(hours: f64) -> String {
    let minutes = (hours * 60.0).round() as i64;
    let (h, m) = (minutes.div_euclid(60), minutes.rem_euclid(60));
    if m == 0 {
        format!("{h}:00")
    } else {
        format!("{h}:{m:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn date(y: i32, mo: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, mo, d).unwrap()
    }

    #[test]
    fn test_days_until_rounds_up() {
        let now = at(2024, 1, 1, 0, 0);
        assert_eq!(days_until(date(2024, 1, 6), now), 5);
        assert_eq!(days_until(date(2024, 1, 1), now), 0);

        // Part of a day left still counts as a day.
        let afternoon = at(2024, 1, 1, 15, 0);
        assert_eq!(days_until(date(2024, 1, 2), afternoon), 1);
        assert_eq!(days_until(date(2024, 1, 1), afternoon), 0);
        assert_eq!(days_until(date(2023, 12, 31), afternoon), -1);
        assert_eq!(days_until(date(2023, 12, 30), afternoon), -2);
    }

    #[test]
    fn test_add_months_clamps() {
        let now = at(2024, 1, 31, 10, 0);
        assert_eq!(add_months(now, 1).unwrap(), date(2024, 2, 29));
        assert_eq!(add_days(now, 1).unwrap(), date(2024, 2, 1));
        assert_eq!(add_days(now, -31).unwrap(), date(2023, 12, 31));
    }

    #[test]
    fn test_add_days_out_of_range() {
        let err = add_days(at(2024, 1, 1, 0, 0), i64::MAX).unwrap_err();
        assert!(matches!(err, TaskflowError::DateOutOfRange { .. }));
    }

    #[test]
    fn test_parse_due_instant_variants() {
        assert_eq!(parse_due_instant("2024-01-06"), Some(at(2024, 1, 6, 0, 0)));
        assert_eq!(
            parse_due_instant("2024-01-06T00:00:00.000Z"),
            Some(at(2024, 1, 6, 0, 0))
        );
        assert_eq!(
            parse_due_instant("2024-01-06T02:00:00+05:00"),
            Some(at(2024, 1, 5, 21, 0))
        );
        assert_eq!(parse_due_instant("someday"), None);
    }

    #[test]
    fn test_parse_reference_time() {
        let local = |raw: &str| parse_reference_time(raw, Tz::UTC).map(|t| t.naive_local());
        assert_eq!(local("2024-06-10"), Some(at(2024, 6, 10, 0, 0)));
        assert_eq!(local("2024-06-10T08:30"), Some(at(2024, 6, 10, 8, 30)));
        assert_eq!(local("2024-06-10 08:30:15").map(|t| t.second()), Some(15));
        assert_eq!(local("June"), None);
    }

    #[test]
    fn test_reference_time_respects_zone() {
        let chicago = chrono_tz::America::Chicago;

        // January is CST (UTC-6).
        let wall = parse_reference_time("2024-01-03T20:00", chicago).unwrap();
        assert_eq!(wall.naive_utc(), at(2024, 1, 4, 2, 0));

        let instant = parse_reference_time("2024-01-04T02:00:00Z", chicago).unwrap();
        assert_eq!(instant.naive_local(), at(2024, 1, 3, 20, 0));
        assert_eq!(instant, wall);

        // 02:30 does not exist on the spring-forward date.
        assert_eq!(parse_reference_time("2024-03-10T02:30", chicago), None);
    }

    #[test]
    fn test_parse_zone() {
        assert_eq!(parse_zone("America/Chicago").unwrap(), chrono_tz::America::Chicago);
        assert!(matches!(
            parse_zone("Mars/Olympus"),
            Err(TaskflowError::InvalidTimezone(_))
        ));
        let now = now_in_zone(Tz::UTC);
        assert_eq!(now.naive_local(), now.naive_utc());
    }

    #[test]
    fn test_clock_label() {
        assert_eq!(clock_label(9.0), "9:00");
        assert_eq!(clock_label(13.0), "13:00");
        assert_eq!(clock_label(10.5), "10:30");
        assert_eq!(clock_label(11.25), "11:15");
    }
}
