//! Phase quality checks
//!
//! The loader accepts any phase sequence. This module reports the ways a
//! night can be malformed without failing the load, so callers can decide
//! whether to trust the metrics.

use crate::time::minutes_between;
use crate::types::DailySleepData;
use serde::Serialize;
use std::fmt;

/// A structural problem in one night's phase list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhaseIssue {
    /// Wake time is before bedtime
    InvertedNight,
    /// Phase ends before it starts
    NegativeDuration { index: usize },
    /// Phase starts before the previous phase
    OutOfOrder { index: usize },
    /// Phase starts before the previous phase ends
    Overlap { index: usize, minutes: i64 },
    /// Uncovered time between the previous phase and this one
    Gap { index: usize, minutes: i64 },
    /// Phase extends outside bedtime..wake time
    OutsideNight { index: usize },
}

impl fmt::Display for PhaseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Phase numbers are 1-based for humans
        match self {
            PhaseIssue::InvertedNight => write!(f, "wake time is before bedtime"),
            PhaseIssue::NegativeDuration { index } => {
                write!(f, "phase {} ends before it starts", index + 1)
            }
            PhaseIssue::OutOfOrder { index } => {
                write!(f, "phase {} starts before the previous phase", index + 1)
            }
            PhaseIssue::Overlap { index, minutes } => write!(
                f,
                "phase {} overlaps the previous phase by {} min",
                index + 1,
                minutes
            ),
            PhaseIssue::Gap { index, minutes } => write!(
                f,
                "{} min are not covered before phase {}",
                minutes,
                index + 1
            ),
            PhaseIssue::OutsideNight { index } => {
                write!(f, "phase {} lies outside bedtime and wake time", index + 1)
            }
        }
    }
}

/// Check that phases are ordered, contiguous and inside the night
pub fn check_phases(data: &DailySleepData) -> Vec<PhaseIssue> {
    let mut issues = Vec::new();

    if data.wake_time < data.bedtime {
        issues.push(PhaseIssue::InvertedNight);
    }

    for (index, phase) in data.phases.iter().enumerate() {
        if phase.end < phase.start {
            issues.push(PhaseIssue::NegativeDuration { index });
        }

        if phase.start < data.bedtime || phase.end > data.wake_time {
            issues.push(PhaseIssue::OutsideNight { index });
        }

        let Some(prev) = index.checked_sub(1).map(|i| &data.phases[i]) else {
            continue;
        };

        if phase.start < prev.start {
            issues.push(PhaseIssue::OutOfOrder { index });
        } else if phase.start < prev.end {
            issues.push(PhaseIssue::Overlap {
                index,
                minutes: minutes_between(phase.start, prev.end),
            });
        } else if phase.start > prev.end {
            issues.push(PhaseIssue::Gap {
                index,
                minutes: minutes_between(prev.end, phase.start),
            });
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_timestamp;
    use crate::types::{SleepPhase, SleepPhaseType};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn phase(phase_type: SleepPhaseType, start: &str, end: &str) -> SleepPhase {
        SleepPhase {
            phase_type,
            start: parse_timestamp(start).unwrap(),
            end: parse_timestamp(end).unwrap(),
        }
    }

    fn make_night(phases: Vec<SleepPhase>) -> DailySleepData {
        DailySleepData {
            date: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
            bedtime: parse_timestamp("2024-05-31 22:00").unwrap(),
            wake_time: parse_timestamp("2024-06-01 06:00").unwrap(),
            phases,
        }
    }

    #[test]
    fn test_contiguous_night_is_clean() {
        let night = make_night(vec![
            phase(SleepPhaseType::Light, "2024-05-31 22:00", "2024-06-01 01:00"),
            phase(SleepPhaseType::Deep, "2024-06-01 01:00", "2024-06-01 05:30"),
            phase(SleepPhaseType::Awake, "2024-06-01 05:30", "2024-06-01 06:00"),
        ]);
        assert!(check_phases(&night).is_empty());
    }

    #[test]
    fn test_gap_and_overlap() {
        let night = make_night(vec![
            phase(SleepPhaseType::Light, "2024-05-31 22:00", "2024-05-31 23:00"),
            phase(SleepPhaseType::Deep, "2024-05-31 23:20", "2024-06-01 01:00"),
            phase(SleepPhaseType::Rem, "2024-06-01 00:45", "2024-06-01 02:00"),
        ]);
        assert_eq!(
            check_phases(&night),
            vec![
                PhaseIssue::Gap {
                    index: 1,
                    minutes: 20
                },
                PhaseIssue::Overlap {
                    index: 2,
                    minutes: 15
                },
            ]
        );
    }

    #[test]
    fn test_out_of_order_and_outside_night() {
        let night = make_night(vec![
            phase(SleepPhaseType::Deep, "2024-06-01 01:00", "2024-06-01 02:00"),
            phase(SleepPhaseType::Light, "2024-05-31 21:00", "2024-05-31 23:00"),
        ]);
        assert_eq!(
            check_phases(&night),
            vec![
                PhaseIssue::OutsideNight { index: 1 },
                PhaseIssue::OutOfOrder { index: 1 },
            ]
        );
    }

    #[test]
    fn test_negative_duration_and_inverted_night() {
        let mut night = make_night(vec![phase(
            SleepPhaseType::Light,
            "2024-06-01 03:00",
            "2024-06-01 02:00",
        )]);
        std::mem::swap(&mut night.bedtime, &mut night.wake_time);

        let issues = check_phases(&night);
        assert_eq!(issues[0], PhaseIssue::InvertedNight);
        assert!(issues.contains(&PhaseIssue::NegativeDuration { index: 0 }));
    }

    #[test]
    fn test_issue_messages_are_one_based() {
        let issue = PhaseIssue::Gap {
            index: 1,
            minutes: 20,
        };
        assert_eq!(issue.to_string(), "20 min are not covered before phase 2");
    }

    #[test]
    fn test_issue_serializes_with_kind_tag() {
        let json = serde_json::to_value(PhaseIssue::OutOfOrder { index: 3 }).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "out_of_order", "index": 3 }));
    }
}
