//! Metrics calculation
//!
//! This module derives per-night and weekly metrics from loaded records:
//! - Phase durations, shares of total sleep and awakenings
//! - Sleep onset delay
//! - Efficiency score
//! - Duration-weighted weekly averages
//!
//! Everything here is a pure function over already validated data.

use crate::time::minutes_between;
use crate::types::{
    AverageSleepMetrics, DailySleepData, SleepMetrics, SleepPhaseType, WeeklySleepData,
    DAYS_PER_WEEK,
};
use serde::{Deserialize, Serialize};

/// Lowest possible efficiency score
pub const MIN_EFFICIENCY: f64 = 1.0;
/// Highest possible efficiency score
pub const MAX_EFFICIENCY: f64 = 100.0;

/// Tunable weights for the efficiency score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Points subtracted per awakening
    pub awakening_penalty: f64,
    /// Points subtracted per minute of sleep onset
    pub onset_penalty_per_minute: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            awakening_penalty: 0.5,
            onset_penalty_per_minute: 1.0 / 60.0,
        }
    }
}

/// Calculator for sleep metrics
#[derive(Debug, Clone, Default)]
pub struct SleepAnalyzer {
    config: AnalyzerConfig,
}

impl SleepAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Compute metrics for a single night
    pub fn daily_metrics(&self, data: &DailySleepData) -> SleepMetrics {
        let mut m = SleepMetrics {
            time_in_bed: minutes_between(data.bedtime, data.wake_time),
            ..Default::default()
        };

        for phase in &data.phases {
            // Inverted phases contribute nothing
            let duration = minutes_between(phase.start, phase.end).max(0);

            match phase.phase_type {
                SleepPhaseType::Awake => {
                    m.awake_duration += duration;
                    m.awakenings_count += 1;
                }
                SleepPhaseType::Light => m.light_sleep_duration += duration,
                SleepPhaseType::Deep => m.deep_sleep_duration += duration,
                SleepPhaseType::Rem => m.rem_sleep_duration += duration,
            }
        }

        m.total_sleep_time = m.light_sleep_duration + m.deep_sleep_duration + m.rem_sleep_duration;
        m.light_sleep_percent = percent_of(m.light_sleep_duration, m.total_sleep_time);
        m.deep_sleep_percent = percent_of(m.deep_sleep_duration, m.total_sleep_time);
        m.rem_sleep_percent = percent_of(m.rem_sleep_duration, m.total_sleep_time);

        m.sleep_onset = sleep_onset(data, m.time_in_bed);
        m.efficiency = self.sleep_efficiency(&m);

        m
    }

    /// Compute metrics for each night in order
    pub fn metrics_for_period(&self, data: &[DailySleepData]) -> Vec<SleepMetrics> {
        data.iter().map(|day| self.daily_metrics(day)).collect()
    }

    /// Efficiency score in `[1, 100]`
    ///
    /// `100 * sleep / bed - penalty * awakenings - penalty * onset`, or the
    /// minimum when no time was spent in bed.
    pub fn sleep_efficiency(&self, m: &SleepMetrics) -> f64 {
        if m.time_in_bed <= 0 {
            return MIN_EFFICIENCY;
        }

        let ratio = m.total_sleep_time as f64 / m.time_in_bed as f64;
        let base = 100.0 * ratio;
        let penalty_awakenings = self.config.awakening_penalty * m.awakenings_count as f64;
        let penalty_onset = self.config.onset_penalty_per_minute * m.sleep_onset as f64;

        (base - penalty_awakenings - penalty_onset).clamp(MIN_EFFICIENCY, MAX_EFFICIENCY)
    }

    /// Average the seven nights of a week
    pub fn weekly_average(&self, week: &WeeklySleepData) -> AverageSleepMetrics {
        let total = week
            .iter()
            .map(|day| self.daily_metrics(day))
            .fold(WeekTotals::default(), WeekTotals::add);

        let days = DAYS_PER_WEEK as f64;
        let avg = |sum: i64| (sum as f64 / days).round();

        AverageSleepMetrics {
            time_in_bed: avg(total.time_in_bed),
            total_sleep_time: avg(total.total_sleep_time),
            sleep_onset: avg(total.sleep_onset),
            awakenings_count: avg(total.awakenings_count),
            awake_duration: avg(total.awake_duration),
            deep_sleep_duration: avg(total.deep_sleep_duration),
            rem_sleep_duration: avg(total.rem_sleep_duration),
            light_sleep_duration: avg(total.light_sleep_duration),
            light_sleep_percent: percent_of(total.light_sleep_duration, total.total_sleep_time),
            deep_sleep_percent: percent_of(total.deep_sleep_duration, total.total_sleep_time),
            rem_sleep_percent: percent_of(total.rem_sleep_duration, total.total_sleep_time),
            efficiency: total.efficiency / days,
        }
    }
}

/// Compute metrics for a single night with default weights
pub fn daily_metrics(data: &DailySleepData) -> SleepMetrics {
    SleepAnalyzer::default().daily_metrics(data)
}

/// Average a week with default weights
pub fn weekly_average(week: &WeeklySleepData) -> AverageSleepMetrics {
    SleepAnalyzer::default().weekly_average(week)
}

/// Efficiency score with default weights
pub fn sleep_efficiency(metrics: &SleepMetrics) -> f64 {
    SleepAnalyzer::default().sleep_efficiency(metrics)
}

/// Running sums across a week
#[derive(Default)]
struct WeekTotals {
    time_in_bed: i64,
    total_sleep_time: i64,
    sleep_onset: i64,
    awakenings_count: i64,
    awake_duration: i64,
    deep_sleep_duration: i64,
    rem_sleep_duration: i64,
    light_sleep_duration: i64,
    efficiency: f64,
}

impl WeekTotals {
    fn add(mut self, m: SleepMetrics) -> Self {
        self.time_in_bed += m.time_in_bed;
        self.total_sleep_time += m.total_sleep_time;
        self.sleep_onset += m.sleep_onset;
        self.awakenings_count += m.awakenings_count;
        self.awake_duration += m.awake_duration;
        self.deep_sleep_duration += m.deep_sleep_duration;
        self.rem_sleep_duration += m.rem_sleep_duration;
        self.light_sleep_duration += m.light_sleep_duration;
        self.efficiency += m.efficiency;
        self
    }
}

/// `part / whole * 100`, or 0 for an empty whole
fn percent_of(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Minutes from bedtime to the earliest non-awake phase
///
/// A night without any sleep phase counts the whole time in bed. Phases that
/// start before bedtime give zero.
fn sleep_onset(data: &DailySleepData, time_in_bed: i64) -> i64 {
    data.phases
        .iter()
        .filter(|p| p.phase_type.is_sleep())
        .map(|p| p.start)
        .min()
        .map(|first_sleep| minutes_between(data.bedtime, first_sleep))
        .unwrap_or(time_in_bed)
        .max(0)
}
