//! Error types for Sleep Insight

use thiserror::Error;

/// Errors that can occur while loading sleep records
///
/// Every variant is fatal for the load that produced it: a week either loads
/// completely or not at all.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Failed to parse day {}: {}", .index + 1, .source)]
    DayParse {
        /// Zero-based position of the day in the input
        index: usize,
        #[source]
        source: Box<LoadError>,
    },

    #[error("Invalid format: {value:?} does not match {pattern}")]
    InvalidFormat {
        value: String,
        pattern: &'static str,
    },

    #[error("Invalid sleep phase type: {0:?}")]
    InvalidPhaseType(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoadError {
    pub(crate) fn in_day(self, index: usize) -> Self {
        LoadError::DayParse {
            index,
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any `DayParse` wrappers
    pub fn root_cause(&self) -> &LoadError {
        match self {
            LoadError::DayParse { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
