//! Number and date formatting shared by the calculators.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeDelta, Utc};

/// Placeholder for dates the backend did not send or sent unparsable.
pub const NOT_AVAILABLE: &str = "n/a";

const SECONDS_PER_DAY: i64 = 86_400;

// ============================================================================
// Numbers
// ============================================================================

/// Rounds half away from zero at the given number of decimals.
pub fn round_half_away(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Formats a value with fixed decimals after half-away-from-zero rounding.
pub fn fixed(value: f64, decimals: usize) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let rounded = round_half_away(value, decimals as i32);
    // `-0.0` would otherwise render with a sign
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.decimals$}")
}

/// Formats dollars with two decimals (`$12.50`).
pub fn dollars(value: f64) -> String {
    format!("${}", fixed(value, 2))
}

/// Percentage rounded to a whole number, as an integer.
#[allow(clippy::cast_possible_truncation)]
pub fn whole_percent(value: f64) -> i64 {
    round_half_away(value, 0) as i64
}

// ============================================================================
// Dates
// ============================================================================

/// Parses a backend timestamp.
///
/// Accepts RFC 3339 as well as naive `YYYY-MM-DDTHH:MM:SS[.f]`,
/// `YYYY-MM-DD HH:MM:SS` and plain dates, which are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, pattern) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Formats an instant as a local calendar date.
pub fn format_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

/// Describes how far `target` is from `now` in whole days.
pub fn relative_days(target: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (target - now).num_seconds();
    if seconds > 0 {
        let days = (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
        format!("in {}", plural_days(days))
    } else if -seconds < SECONDS_PER_DAY {
        "today".to_string()
    } else {
        format!("{} ago", plural_days(-seconds / SECONDS_PER_DAY))
    }
}

fn plural_days(days: i64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}

/// Renders `<date> (<relative>)` for an optional timestamp.
pub fn date_with_relative(at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match at {
        Some(at) => format!("{} ({})", format_date(at), relative_days(at, now)),
        None => format!("{NOT_AVAILABLE} ({NOT_AVAILABLE})"),
    }
}

/// Next weekly reset: the last reset plus seven days.
pub fn next_reset(last_reset: Option<&str>) -> Option<DateTime<Utc>> {
    last_reset
        .and_then(parse_timestamp)
        .map(|at| at + TimeDelta::days(7))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(fixed(2.5, 0), "3");
        assert_eq!(fixed(-2.5, 0), "-3");
        assert_eq!(fixed(0.125, 2), "0.13");
        assert_eq!(fixed(-0.001, 1), "0.0");
        assert_eq!(whole_percent(49.5), 50);
    }

    #[test]
    fn test_dollars() {
        assert_eq!(dollars(5.0), "$5.00");
        assert_eq!(dollars(12.5), "$12.50");
        assert_eq!(dollars(3.456), "$3.46");
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = at(2026, 3, 1, 12);
        assert_eq!(parse_timestamp("2026-03-01T12:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2026-03-01T14:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2026-03-01T12:00:00.000"), Some(expected));
        assert_eq!(parse_timestamp("2026-03-01 12:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2026-03-01"), Some(at(2026, 3, 1, 0)));
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_relative_days() {
        let now = at(2026, 3, 10, 12);
        assert_eq!(relative_days(at(2026, 3, 11, 0), now), "in 1 day");
        assert_eq!(relative_days(at(2026, 3, 12, 13), now), "in 3 days");
        assert_eq!(relative_days(now, now), "today");
        assert_eq!(relative_days(at(2026, 3, 10, 1), now), "today");
        assert_eq!(relative_days(at(2026, 3, 9, 12), now), "1 day ago");
        assert_eq!(relative_days(at(2026, 3, 5, 12), now), "5 days ago");
    }

    #[test]
    fn test_next_reset_adds_a_week() {
        assert_eq!(
            next_reset(Some("2026-03-01T00:00:00Z")),
            Some(at(2026, 3, 8, 0))
        );
        assert_eq!(next_reset(Some("garbage")), None);
        assert_eq!(next_reset(None), None);
    }

    #[test]
    fn test_missing_date_renders_placeholder() {
        let now = at(2026, 3, 10, 12);
        assert_eq!(date_with_relative(None, now), "n/a (n/a)");
    }
}
