//! Sleep Insight - validated loading and quality metrics for sleep-phase records
//!
//! Sleep Insight turns nightly sleep-tracking records into metrics through a
//! deterministic pipeline: JSON loading and validation → per-night metrics →
//! weekly averages → reports.
//!
//! ## Modules
//!
//! - **Loader**: strict, all-or-nothing parsing of day and week documents
//! - **Analyzer**: durations, phase shares, sleep onset and efficiency
//! - **Quality / Recommend / Report**: diagnostics and presentation payloads

pub mod analyzer;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod quality;
pub mod recommend;
pub mod report;
pub mod time;
pub mod types;

pub use analyzer::{daily_metrics, sleep_efficiency, weekly_average, AnalyzerConfig, SleepAnalyzer};
pub use error::LoadError;
pub use loader::{load_days, load_single_day, load_single_day_str, load_week, load_week_str};
pub use pipeline::{day_report_json, week_report_json};
pub use types::{
    AverageSleepMetrics, DailySleepData, SleepMetrics, SleepPhase, SleepPhaseType,
    WeeklySleepData,
};

/// Crate version embedded in all reports
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "sleep-insight";
