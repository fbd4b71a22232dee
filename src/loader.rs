//! Record loading and validation
//!
//! Converts parsed JSON documents into [`DailySleepData`] and
//! [`WeeklySleepData`]. Loads are all-or-nothing and stop at the first
//! failure.

use crate::error::LoadError;
use crate::time::{parse_date, parse_timestamp};
use crate::types::{
    DailySleepData, SleepPhase, SleepPhaseType, WeeklySleepData, DAYS_PER_WEEK,
    WEEK_SHAPE_MESSAGE,
};
use serde_json::Value;

/// Load a week from a top-level array of exactly seven day documents
pub fn load_week(document: &Value) -> Result<WeeklySleepData, LoadError> {
    let days = match document.as_array() {
        Some(days) if days.len() == DAYS_PER_WEEK => days,
        _ => return Err(LoadError::Schema(WEEK_SHAPE_MESSAGE.to_string())),
    };

    let days = load_days(days)?;
    WeeklySleepData::try_from(days)
}

/// Load a single night from one day document
pub fn load_single_day(document: &Value) -> Result<DailySleepData, LoadError> {
    let date = parse_date(text_field(document, "date"))?;
    let bedtime = parse_timestamp(text_field(document, "bedtime"))?;
    let wake_time = parse_timestamp(text_field(document, "wake_time"))?;

    let phases = match document.get("phases").and_then(Value::as_array) {
        Some(raw) => raw.iter().map(load_phase).collect::<Result<Vec<_>, _>>()?,
        // Absent or non-array phases mean an empty night, not an error
        None => Vec::new(),
    };

    Ok(DailySleepData {
        date,
        bedtime,
        wake_time,
        phases,
    })
}

/// Load several day documents, reporting failures by position
pub fn load_days(documents: &[Value]) -> Result<Vec<DailySleepData>, LoadError> {
    documents
        .iter()
        .enumerate()
        .map(|(index, doc)| load_single_day(doc).map_err(|e| e.in_day(index)))
        .collect()
}

/// Parse JSON text and load it as a week
pub fn load_week_str(json: &str) -> Result<WeeklySleepData, LoadError> {
    let document: Value = serde_json::from_str(json)?;
    load_week(&document)
}

/// Parse JSON text and load it as a single night
pub fn load_single_day_str(json: &str) -> Result<DailySleepData, LoadError> {
    let document: Value = serde_json::from_str(json)?;
    load_single_day(&document)
}

fn load_phase(raw: &Value) -> Result<SleepPhase, LoadError> {
    let phase_type = SleepPhaseType::from_label(text_field(raw, "type"))?;
    let start = parse_timestamp(text_field(raw, "start"))?;
    let end = parse_timestamp(text_field(raw, "end"))?;

    Ok(SleepPhase {
        phase_type,
        start,
        end,
    })
}

/// Missing and non-string fields read as "", which never parses
fn text_field<'a>(document: &'a Value, key: &str) -> &'a str {
    document.get(key).and_then(Value::as_str).unwrap_or("")
}
