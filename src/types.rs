//! Core types for Sleep Insight
//!
//! This module defines the entities produced by the loader (phases, nights,
//! weeks) and the metric structures produced by the analyzer.

use crate::error::LoadError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Number of nights in a [`WeeklySleepData`]
pub const DAYS_PER_WEEK: usize = 7;

/// Sleep phase classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SleepPhaseType {
    Light,
    Deep,
    #[serde(rename = "REM")]
    Rem,
    Awake,
}

impl SleepPhaseType {
    pub const ALL: [SleepPhaseType; 4] = [
        SleepPhaseType::Light,
        SleepPhaseType::Deep,
        SleepPhaseType::Rem,
        SleepPhaseType::Awake,
    ];

    /// Parse a wire label. Labels are case-sensitive.
    pub fn from_label(label: &str) -> Result<Self, LoadError> {
        match label {
            "Light" => Ok(SleepPhaseType::Light),
            "Deep" => Ok(SleepPhaseType::Deep),
            "REM" => Ok(SleepPhaseType::Rem),
            "Awake" => Ok(SleepPhaseType::Awake),
            other => Err(LoadError::InvalidPhaseType(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SleepPhaseType::Light => "Light",
            SleepPhaseType::Deep => "Deep",
            SleepPhaseType::Rem => "REM",
            SleepPhaseType::Awake => "Awake",
        }
    }

    pub fn is_sleep(&self) -> bool {
        !matches!(self, SleepPhaseType::Awake)
    }

    /// Display metadata used by presentation code
    pub fn display(&self) -> PhaseDisplay {
        match self {
            SleepPhaseType::Light => PhaseDisplay {
                name: "Light sleep",
                color: [0x7f, 0xb3, 0xd5],
            },
            SleepPhaseType::Deep => PhaseDisplay {
                name: "Deep sleep",
                color: [0x1f, 0x3a, 0x93],
            },
            SleepPhaseType::Rem => PhaseDisplay {
                name: "REM sleep",
                color: [0x8e, 0x44, 0xad],
            },
            SleepPhaseType::Awake => PhaseDisplay {
                name: "Awake",
                color: [0xf3, 0x9c, 0x12],
            },
        }
    }
}

impl FromStr for SleepPhaseType {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
    }
}

impl fmt::Display for SleepPhaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation metadata for a phase type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDisplay {
    pub name: &'static str,
    /// RGB colour
    pub color: [u8; 3],
}

/// One contiguous interval of a night
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SleepPhase {
    #[serde(rename = "type")]
    pub phase_type: SleepPhaseType,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Sleep record for a single night
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySleepData {
    /// Calendar date the record belongs to
    pub date: NaiveDate,
    pub bedtime: NaiveDateTime,
    pub wake_time: NaiveDateTime,
    /// Phases in recorded order. Ordering and coverage are not validated on
    /// load; see [`crate::quality::check_phases`].
    pub phases: Vec<SleepPhase>,
}

/// Exactly one week of consecutive nights
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklySleepData {
    days: [DailySleepData; DAYS_PER_WEEK],
}

impl WeeklySleepData {
    pub fn new(days: [DailySleepData; DAYS_PER_WEEK]) -> Self {
        Self { days }
    }

    pub fn days(&self) -> &[DailySleepData; DAYS_PER_WEEK] {
        &self.days
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DailySleepData> {
        self.days.iter()
    }

    pub fn into_days(self) -> [DailySleepData; DAYS_PER_WEEK] {
        self.days
    }
}

impl TryFrom<Vec<DailySleepData>> for WeeklySleepData {
    type Error = LoadError;

    fn try_from(days: Vec<DailySleepData>) -> Result<Self, Self::Error> {
        let days: [DailySleepData; DAYS_PER_WEEK] = days
            .try_into()
            .map_err(|_| LoadError::Schema(WEEK_SHAPE_MESSAGE.to_string()))?;
        Ok(Self { days })
    }
}

impl<'a> IntoIterator for &'a WeeklySleepData {
    type Item = &'a DailySleepData;
    type IntoIter = std::slice::Iter<'a, DailySleepData>;

    fn into_iter(self) -> Self::IntoIter {
        self.days.iter()
    }
}

pub(crate) const WEEK_SHAPE_MESSAGE: &str = "expected array of 7 days";

/// Metrics for a single night, in whole minutes unless noted
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SleepMetrics {
    pub time_in_bed: i64,
    /// Light + deep + REM minutes
    pub total_sleep_time: i64,
    /// Minutes from bedtime to the first non-awake phase
    pub sleep_onset: i64,
    pub awakenings_count: i64,
    pub awake_duration: i64,
    pub deep_sleep_duration: i64,
    pub rem_sleep_duration: i64,
    pub light_sleep_duration: i64,
    /// Share of total sleep time (0-100)
    pub light_sleep_percent: f64,
    pub deep_sleep_percent: f64,
    pub rem_sleep_percent: f64,
    /// Efficiency score (1-100)
    pub efficiency: f64,
}

/// Weekly aggregate of [`SleepMetrics`]
///
/// Minute fields hold means rounded to the nearest whole minute. Percentages
/// are weighted by sleep duration across the week.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AverageSleepMetrics {
    pub time_in_bed: f64,
    pub total_sleep_time: f64,
    pub sleep_onset: f64,
    pub awakenings_count: f64,
    pub awake_duration: f64,
    pub deep_sleep_duration: f64,
    pub rem_sleep_duration: f64,
    pub light_sleep_duration: f64,
    pub light_sleep_percent: f64,
    pub deep_sleep_percent: f64,
    pub rem_sleep_percent: f64,
    pub efficiency: f64,
}
