//! Business time zone arithmetic
//!
//! Dates and times of day are converted to Unix millis here; the repository
//! layer only ever receives `i64` millis.

use chrono::{DateTime, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use shared::error::{AppError, AppResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
        .map_err(|_| AppError::validation(format!("Invalid date format: {date}")))
}

/// Parse a date query parameter, reporting the offending field
pub fn parse_date_field(field: &str, date: &str) -> AppResult<NaiveDate> {
    parse_date(date).map_err(|e| e.with_field(field, "must be YYYY-MM-DD"))
}

/// Parse a time of day. `HH:MM:SS` is canonical, `HH:MM` is accepted.
pub fn parse_time(time: &str) -> AppResult<NaiveTime> {
    let time = time.trim();
    NaiveTime::parse_from_str(time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .map_err(|_| AppError::validation(format!("Invalid time format: {time}")))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Local calendar day of a Unix millis instant
pub fn local_date(millis: i64, tz: Tz) -> NaiveDate {
    DateTime::from_timestamp_millis(millis)
        .unwrap_or_default()
        .with_timezone(&tz)
        .date_naive()
}

/// Date + time of day → Unix millis (business time zone)
///
/// Ambiguous local times take the later instant. Nonexistent local times
/// (DST gap) fall back to reading the wall clock as UTC.
pub fn date_time_millis(date: NaiveDate, time: NaiveTime, tz: Tz) -> i64 {
    let naive = date.and_time(time);
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Local midnight at the start of `date`
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_time_millis(date, NaiveTime::MIN, tz)
}

/// Local midnight at the start of the next day; callers use `< end`
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    date_time_millis(next_day, NaiveTime::MIN, tz)
}

/// Deterministic daily key: `{employee_code}-{YYYY-MM-DD}`
pub fn attendance_id(employee_code: &str, date: NaiveDate) -> String {
    format!("{employee_code}-{}", format_date(date))
}

/// Date encoded at the end of an attendance id
pub fn attendance_date(attendance_id: &str) -> Option<NaiveDate> {
    let split = attendance_id.len().checked_sub(10)?;
    let tail = attendance_id.get(split..)?;
    NaiveDate::parse_from_str(tail, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn millis(tz: Tz, y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> i64 {
        tz.with_ymd_and_hms(y, m, d, h, min, s)
            .single()
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-09-15").unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 15).unwrap()
        );
        assert!(parse_date("15-09-2025").is_err());
        assert!(parse_date("2025-02-30").is_err());
        let err = parse_date_field("date", "yesterday").unwrap_err();
        assert_eq!(err.errors[0].field, "date");
    }

    #[test]
    fn test_parse_time_accepts_minutes() {
        assert_eq!(
            parse_time("09:00:00").unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
        assert_eq!(
            parse_time("17:30").unwrap(),
            NaiveTime::from_hms_opt(17, 30, 0).unwrap()
        );
        assert!(parse_time("25:00:00").is_err());
        assert!(parse_time("9am").is_err());
    }

    #[test]
    fn test_midnight_splits_days() {
        let tz = chrono_tz::Asia::Jakarta;
        let before = millis(tz, 2025, 9, 15, 23, 59, 59);
        let after = millis(tz, 2025, 9, 16, 0, 0, 1);
        assert_ne!(local_date(before, tz), local_date(after, tz));
        assert_eq!(
            attendance_id("EMP-1", local_date(before, tz)),
            "EMP-1-2025-09-15"
        );
        assert_eq!(
            attendance_id("EMP-1", local_date(after, tz)),
            "EMP-1-2025-09-16"
        );
    }

    #[test]
    fn test_local_date_follows_zone() {
        // 2025-09-15T20:00Z is already the 16th in Jakarta (UTC+7)
        let instant = millis(chrono_tz::UTC, 2025, 9, 15, 20, 0, 0);
        assert_eq!(
            local_date(instant, chrono_tz::UTC),
            NaiveDate::from_ymd_opt(2025, 9, 15).unwrap()
        );
        assert_eq!(
            local_date(instant, chrono_tz::Asia::Jakarta),
            NaiveDate::from_ymd_opt(2025, 9, 16).unwrap()
        );
    }

    #[test]
    fn test_day_bounds() {
        let tz = chrono_tz::Europe::Madrid;
        let date = NaiveDate::from_ymd_opt(2025, 3, 30).unwrap();
        let start = day_start_millis(date, tz);
        let end = day_end_millis(date, tz);
        // DST starts on 2025-03-30 in Madrid: the day is 23 hours long
        assert_eq!(end - start, 23 * 3600 * 1000);
        assert_eq!(start, millis(tz, 2025, 3, 30, 0, 0, 0));
    }

    #[test]
    fn test_attendance_date_round_trip() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(
            attendance_date(&attendance_id("EMP-17000", date)),
            Some(date)
        );
        assert_eq!(attendance_date("short"), None);
    }
}
