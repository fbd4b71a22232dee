//! Recommendations and day-over-day insights

use crate::types::SleepMetrics;
use serde::Serialize;
use std::fmt;

/// Recommended minimum total sleep (minutes)
pub const TARGET_SLEEP_MINUTES: i64 = 7 * 60;
/// Recommended minimum REM sleep (minutes)
pub const TARGET_REM_MINUTES: i64 = 60;
/// Recommended minimum deep sleep (minutes)
pub const TARGET_DEEP_MINUTES: i64 = 90;
/// Efficiency below this is considered low
pub const LOW_EFFICIENCY: f64 = 70.0;

/// A single piece of advice derived from one night's metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    IncreaseSleepTime,
    ImproveRem,
    ImproveDeepSleep,
    LowEfficiency,
    AllGood,
}

impl Recommendation {
    pub fn message(&self) -> &'static str {
        match self {
            Recommendation::IncreaseSleepTime => {
                "Try to get at least 7 hours of sleep: keep a fixed bedtime and wind down earlier."
            }
            Recommendation::ImproveRem => {
                "REM sleep is short: avoid alcohol and late caffeine, and keep a regular wake time."
            }
            Recommendation::ImproveDeepSleep => {
                "Deep sleep is short: keep the bedroom cool and dark and exercise earlier in the day."
            }
            Recommendation::LowEfficiency => {
                "Sleep efficiency is low: go to bed only when sleepy and limit time awake in bed."
            }
            Recommendation::AllGood => "Your sleep looks fine!",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Advice for one night, never empty
pub fn recommendations(m: &SleepMetrics) -> Vec<Recommendation> {
    let mut advice = Vec::new();

    if m.total_sleep_time < TARGET_SLEEP_MINUTES {
        advice.push(Recommendation::IncreaseSleepTime);
    }
    if m.rem_sleep_duration < TARGET_REM_MINUTES {
        advice.push(Recommendation::ImproveRem);
    }
    if m.deep_sleep_duration < TARGET_DEEP_MINUTES {
        advice.push(Recommendation::ImproveDeepSleep);
    }
    if m.efficiency < LOW_EFFICIENCY {
        advice.push(Recommendation::LowEfficiency);
    }

    if advice.is_empty() {
        advice.push(Recommendation::AllGood);
    }
    advice
}

/// Comparison of total sleep between two nights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "trend", content = "minutes", rename_all = "snake_case")]
pub enum Insight {
    MoreSleep(i64),
    LessSleep(i64),
    SameSleep,
}

/// Compare today's total sleep with yesterday's
pub fn insight(today: &SleepMetrics, yesterday: &SleepMetrics) -> Insight {
    let diff = today.total_sleep_time - yesterday.total_sleep_time;
    match diff {
        d if d > 0 => Insight::MoreSleep(d),
        d if d < 0 => Insight::LessSleep(-d),
        _ => Insight::SameSleep,
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insight::MoreSleep(min) => write!(
                f,
                "You slept {} longer than the night before.",
                crate::time::format_duration(*min)
            ),
            Insight::LessSleep(min) => write!(
                f,
                "You slept {} less than the night before.",
                crate::time::format_duration(*min)
            ),
            Insight::SameSleep => write!(f, "You slept as long as the night before."),
        }
    }
}
