//! Report encoding
//!
//! This module wraps computed metrics into serializable report payloads with
//! producer metadata, phase diagnostics and recommendations.

use crate::analyzer::SleepAnalyzer;
use crate::quality::{check_phases, PhaseIssue};
use crate::recommend::{insight, recommendations, Insight, Recommendation};
use crate::types::{AverageSleepMetrics, DailySleepData, SleepMetrics, WeeklySleepData};
use crate::{PRODUCER_NAME, VERSION};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Producer metadata attached to every report
#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub producer: String,
    pub version: String,
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
}

/// Metrics and diagnostics for one night
#[derive(Debug, Clone, Serialize)]
pub struct DayEntry {
    pub date: NaiveDate,
    pub metrics: SleepMetrics,
    pub issues: Vec<PhaseIssue>,
}

/// Report for a single night
#[derive(Debug, Clone, Serialize)]
pub struct DailyReport {
    pub meta: ReportMeta,
    #[serde(flatten)]
    pub day: DayEntry,
    pub recommendations: Vec<Recommendation>,
}

/// Report for a full week
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyReport {
    pub meta: ReportMeta,
    pub days: Vec<DayEntry>,
    pub average: AverageSleepMetrics,
    /// Advice for the most recent night
    pub recommendations: Vec<Recommendation>,
    /// Last night compared with the one before
    pub insight: Insight,
}

/// Report builder sharing one analyzer and report id
pub struct ReportBuilder {
    analyzer: SleepAnalyzer,
    report_id: Uuid,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportBuilder {
    /// Create a builder with default weights and a fresh report id
    pub fn new() -> Self {
        Self::with_analyzer(SleepAnalyzer::default())
    }

    pub fn with_analyzer(analyzer: SleepAnalyzer) -> Self {
        Self {
            analyzer,
            report_id: Uuid::new_v4(),
        }
    }

    /// Use a specific report id
    pub fn with_report_id(mut self, report_id: Uuid) -> Self {
        self.report_id = report_id;
        self
    }

    pub fn daily(&self, data: &DailySleepData) -> DailyReport {
        let day = self.entry(data);
        let recommendations = recommendations(&day.metrics);

        DailyReport {
            meta: self.meta(),
            day,
            recommendations,
        }
    }

    pub fn weekly(&self, week: &WeeklySleepData) -> WeeklyReport {
        let days: Vec<DayEntry> = week.iter().map(|d| self.entry(d)).collect();
        let average = self.analyzer.weekly_average(week);

        // A week always holds seven nights
        let last = &days[days.len() - 1].metrics;
        let before = &days[days.len() - 2].metrics;
        let advice = recommendations(last);
        let trend = insight(last, before);

        WeeklyReport {
            meta: self.meta(),
            days,
            average,
            recommendations: advice,
            insight: trend,
        }
    }

    fn entry(&self, data: &DailySleepData) -> DayEntry {
        DayEntry {
            date: data.date,
            metrics: self.analyzer.daily_metrics(data),
            issues: check_phases(data),
        }
    }

    fn meta(&self) -> ReportMeta {
        ReportMeta {
            producer: PRODUCER_NAME.to_string(),
            version: VERSION.to_string(),
            report_id: self.report_id,
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{load_single_day, load_week};
    use serde_json::{json, Value};

    fn sample_day(date: &str, next: &str) -> Value {
        json!({
            "date": date,
            "bedtime": format!("{date} 23:00"),
            "wake_time": format!("{next} 07:00"),
            "phases": [
                { "type": "Awake", "start": format!("{date} 23:00"), "end": format!("{date} 23:20") },
                { "type": "Light", "start": format!("{date} 23:20"), "end": format!("{next} 01:00") },
                { "type": "Deep", "start": format!("{next} 01:00"), "end": format!("{next} 03:00") },
                { "type": "REM", "start": format!("{next} 03:00"), "end": format!("{next} 04:30") },
                { "type": "Light", "start": format!("{next} 04:30"), "end": format!("{next} 07:00") }
            ]
        })
    }

    #[test]
    fn test_daily_report() {
        let day = load_single_day(&sample_day("2024-05-31", "2024-06-01")).unwrap();
        let id = Uuid::new_v4();
        let report = ReportBuilder::new().with_report_id(id).daily(&day);

        assert_eq!(report.meta.report_id, id);
        assert_eq!(report.meta.producer, PRODUCER_NAME);
        assert_eq!(report.day.metrics.sleep_onset, 20);
        assert_eq!(report.day.metrics.total_sleep_time, 460);
        assert!(report.day.issues.is_empty());
        assert_eq!(report.recommendations, vec![Recommendation::AllGood]);
    }

    #[test]
    fn test_daily_report_json_shape() {
        let day = load_single_day(&sample_day("2024-05-31", "2024-06-01")).unwrap();
        let report = ReportBuilder::new().daily(&day);
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["date"], "2024-05-31");
        assert_eq!(value["metrics"]["time_in_bed"], 480);
        assert_eq!(value["recommendations"][0], "all_good");
        assert_eq!(value["meta"]["producer"], PRODUCER_NAME);
    }

    #[test]
    fn test_weekly_report() {
        let dates = [
            "2024-05-25",
            "2024-05-26",
            "2024-05-27",
            "2024-05-28",
            "2024-05-29",
            "2024-05-30",
            "2024-05-31",
            "2024-06-01",
        ];
        let mut doc = Value::Array(dates.windows(2).map(|w| sample_day(w[0], w[1])).collect());
        // Shorter last night: drop the final light phase
        doc[6]["phases"].as_array_mut().unwrap().pop();

        let week = load_week(&doc).unwrap();
        let report = ReportBuilder::new().weekly(&week);

        assert_eq!(report.days.len(), 7);
        assert_eq!(report.days[6].metrics.total_sleep_time, 310);
        assert_eq!(report.insight, Insight::LessSleep(150));
        assert!(report
            .recommendations
            .contains(&Recommendation::IncreaseSleepTime));
        // (6 * 460 + 310) / 7 = 438.57
        assert_eq!(report.average.total_sleep_time, 439.0);
    }
}
