//! Time utilities
//!
//! Timestamps are naive wall-clock values. Nothing here consults the local
//! time zone; epoch conversions treat wall-clock values as UTC.

use crate::error::LoadError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// chrono format for phase and bed timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
/// chrono format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const TIMESTAMP_PATTERN: &str = "YYYY-MM-DD HH:MM";
const DATE_PATTERN: &str = "YYYY-MM-DD";

/// Digits where the pattern has a field letter, the same separator elsewhere
fn matches_pattern(text: &str, pattern: &str) -> bool {
    text.len() == pattern.len()
        && text.bytes().zip(pattern.bytes()).all(|(c, p)| {
            if p.is_ascii_alphabetic() {
                c.is_ascii_digit()
            } else {
                c == p
            }
        })
}

/// Signed difference `end - start` in whole minutes
pub fn minutes_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    end.signed_duration_since(start).num_minutes()
}

/// Parse a `YYYY-MM-DD HH:MM` timestamp
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime, LoadError> {
    let invalid = || LoadError::InvalidFormat {
        value: text.to_string(),
        pattern: TIMESTAMP_PATTERN,
    };

    // chrono accepts padded or signed fields, the wire format does not
    if !matches_pattern(text, TIMESTAMP_PATTERN) {
        return Err(invalid());
    }

    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).map_err(|_| invalid())
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(text: &str) -> Result<NaiveDate, LoadError> {
    let invalid = || LoadError::InvalidFormat {
        value: text.to_string(),
        pattern: DATE_PATTERN,
    };

    if !matches_pattern(text, DATE_PATTERN) {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| invalid())
}

/// Seconds since the Unix epoch, reading the wall-clock value as UTC
pub fn to_epoch_seconds(ts: NaiveDateTime) -> f64 {
    ts.and_utc().timestamp_millis() as f64 / 1000.0
}

/// Inverse of [`to_epoch_seconds`] at millisecond precision
///
/// Returns `None` for non-finite input or values outside chrono's range.
pub fn from_epoch_seconds(seconds: f64) -> Option<NaiveDateTime> {
    if !seconds.is_finite() {
        return None;
    }
    let millis = (seconds * 1000.0).round();
    if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64).map(|dt| dt.naive_utc())
}

/// Clock part of a timestamp as `HH:MM`
pub fn only_time(ts: NaiveDateTime) -> String {
    ts.format("%H:%M").to_string()
}

/// Calendar part of a timestamp as `YYYY-MM-DD`
pub fn only_date(ts: NaiveDateTime) -> String {
    ts.format(DATE_FORMAT).to_string()
}

/// Render a minute count as `Xh Ym`
pub fn format_duration(minutes: i64) -> String {
    let sign = if minutes < 0 { "-" } else { "" };
    let abs = minutes.unsigned_abs();
    format!("{sign}{}h {}m", abs / 60, abs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, mi, 0).unwrap())
    }

    #[test]
    fn test_minutes_between_positive() {
        let start = at(2024, 5, 31, 10, 30);
        let end = at(2024, 5, 31, 12, 45);
        assert_eq!(minutes_between(start, end), 135);
    }

    #[test]
    fn test_minutes_between_negative() {
        let start = at(2024, 5, 31, 15, 0);
        let end = at(2024, 5, 31, 12, 0);
        assert_eq!(minutes_between(start, end), -180);
    }

    #[test]
    fn test_minutes_between_across_midnight() {
        let start = at(2024, 5, 31, 22, 0);
        let end = at(2024, 6, 1, 6, 0);
        assert_eq!(minutes_between(start, end), 480);
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(
            parse_timestamp("2024-05-31 22:15").unwrap(),
            at(2024, 5, 31, 22, 15)
        );
    }

    #[test]
    fn test_parse_timestamp_rejects_malformed() {
        for text in [
            "",
            "2024-05-31",
            "2024-05-31T22:15",
            "2024-5-31 22:15",
            "2024-05-31 25:00",
            "2024-02-30 10:00",
            "31-05-2024 22:15",
            "2024-05-31 22:15:00",
            "2024-05-31  2:15",
            "2024-05-31 22: 5",
            "2024-05-31\t22:15",
            "+2024-05-31 22:1",
            "2024-05-31 2215 ",
        ] {
            let err = parse_timestamp(text).unwrap_err();
            assert!(
                matches!(err, LoadError::InvalidFormat { .. }),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-05-31").unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 31).unwrap()
        );
    }

    #[test]
    fn test_parse_date_rejects_wrong_field_order() {
        let err = parse_date("31-05-2024").unwrap_err();
        assert!(matches!(err, LoadError::InvalidFormat { .. }));
        for text in [
            "",
            "2024-13-01",
            "2024- 5-31",
            "+024-05-31",
            "2024/05/31",
            "２024-05-31",
        ] {
            let err = parse_date(text).unwrap_err();
            assert!(
                matches!(err, LoadError::InvalidFormat { .. }),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_epoch_round_trip() {
        assert_eq!(to_epoch_seconds(at(2024, 5, 31, 0, 0)), 1717113600.0);

        for ts in [
            at(2024, 5, 31, 0, 0),
            at(1965, 3, 14, 8, 30),
            at(2199, 12, 31, 23, 59),
            NaiveDate::from_ymd_opt(2024, 2, 29)
                .unwrap()
                .and_hms_opt(13, 7, 42)
                .unwrap(),
            NaiveDate::from_ymd_opt(1969, 12, 31)
                .unwrap()
                .and_hms_opt(23, 59, 59)
                .unwrap(),
        ] {
            let seconds = to_epoch_seconds(ts);
            assert_eq!(from_epoch_seconds(seconds), Some(ts), "{ts}");
        }
        assert!(to_epoch_seconds(at(1965, 3, 14, 8, 30)) < 0.0);
    }

    #[test]
    fn test_epoch_zero() {
        let ts = from_epoch_seconds(0.0).unwrap();
        assert_eq!(only_date(ts), "1970-01-01");
        assert_eq!(only_time(ts), "00:00");
    }

    #[test]
    fn test_from_epoch_rejects_non_finite() {
        assert_eq!(from_epoch_seconds(f64::NAN), None);
        assert_eq!(from_epoch_seconds(f64::INFINITY), None);
        assert_eq!(from_epoch_seconds(1e300), None);
    }

    #[test]
    fn test_only_time_and_date() {
        let ts = at(1999, 12, 31, 23, 59);
        assert_eq!(only_time(ts), "23:59");
        assert_eq!(only_date(ts), "1999-12-31");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(90), "1h 30m");
        assert_eq!(format_duration(61), "1h 1m");
        assert_eq!(format_duration(0), "0h 0m");
        assert_eq!(format_duration(1500), "25h 0m");
        assert_eq!(format_duration(-45), "-0h 45m");
    }
}
