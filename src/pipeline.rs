//! Pipeline orchestration
//!
//! One-shot entry points from raw JSON text to report payloads.

use crate::error::LoadError;
use crate::loader::{load_single_day_str, load_week_str};
use crate::report::{DailyReport, ReportBuilder, WeeklyReport};

/// Convert a single-day JSON document into a daily report.
///
/// # Example
/// ```
/// let json = r#"{
///     "date": "2024-05-31",
///     "bedtime": "2024-05-31 22:00",
///     "wake_time": "2024-06-01 06:00",
///     "phases": [
///         { "type": "Light", "start": "2024-05-31 22:00", "end": "2024-06-01 06:00" }
///     ]
/// }"#;
/// let report = sleep_insight::day_report_json(json).unwrap();
/// assert_eq!(report.day.metrics.total_sleep_time, 480);
/// ```
pub fn day_report_json(raw_json: &str) -> Result<DailyReport, LoadError> {
    let day = load_single_day_str(raw_json)?;
    Ok(ReportBuilder::new().daily(&day))
}

/// Convert a seven-day JSON array into a weekly report.
pub fn week_report_json(raw_json: &str) -> Result<WeeklyReport, LoadError> {
    let week = load_week_str(raw_json)?;
    Ok(ReportBuilder::new().weekly(&week))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_week_json() -> String {
        let days: Vec<String> = (1..=7)
            .map(|d| {
                format!(
                    r#"{{
                        "date": "2024-06-0{d}",
                        "bedtime": "2024-06-0{d} 00:00",
                        "wake_time": "2024-06-0{d} 08:00",
                        "phases": [
                            {{ "type": "Light", "start": "2024-06-0{d} 00:00", "end": "2024-06-0{d} 03:00" }},
                            {{ "type": "Deep", "start": "2024-06-0{d} 03:00", "end": "2024-06-0{d} 05:00" }},
                            {{ "type": "REM", "start": "2024-06-0{d} 05:00", "end": "2024-06-0{d} 08:00" }}
                        ]
                    }}"#
                )
            })
            .collect();
        format!("[{}]", days.join(","))
    }

    #[test]
    fn test_week_report_json() {
        let report = week_report_json(&sample_week_json()).unwrap();

        assert_eq!(report.days.len(), 7);
        assert_eq!(report.average.total_sleep_time, 480.0);
        assert_eq!(report.average.efficiency, 100.0);
        assert!((report.average.deep_sleep_percent - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_array_is_schema_error() {
        let err = week_report_json("[]").unwrap_err();
        assert!(matches!(err, LoadError::Schema(_)));
    }

    #[test]
    fn test_invalid_json() {
        let err = day_report_json("not valid json").unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }
}
