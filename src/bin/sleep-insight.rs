//! Sleep Insight CLI - Command-line interface for Sleep Insight
//!
//! Commands:
//! - day: Report metrics for a single night
//! - week: Report metrics and averages for a week
//! - validate: Load records and list phase issues without computing reports

use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info, warn};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde_json::Value;
use sleep_insight::analyzer::{AnalyzerConfig, SleepAnalyzer};
use sleep_insight::quality::check_phases;
use sleep_insight::report::{DailyReport, DayEntry, ReportBuilder, WeeklyReport};
use sleep_insight::time::{format_duration, only_time};
use sleep_insight::types::{DailySleepData, SleepPhaseType, WeeklySleepData};
use sleep_insight::{loader, LoadError, VERSION};

/// Sleep Insight - sleep quality metrics from nightly phase records
#[derive(Parser)]
#[command(name = "sleep-insight")]
#[command(version = VERSION)]
#[command(about = "Compute sleep quality metrics from sleep-phase records", long_about = None)]
struct Cli {
    /// Output format (defaults to text on a terminal, json otherwise)
    #[arg(long, global = true, env = "SLEEP_INSIGHT_FORMAT")]
    format: Option<OutputFormat>,

    /// JSON file with analyzer weights
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report metrics for a single night
    Day {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Report metrics and averages for a week
    Week {
        /// Input file holding an array of 7 days (use - for stdin)
        #[arg(short, long, conflicts_with = "days", required_unless_present = "days")]
        input: Option<PathBuf>,

        /// Seven single-day files, oldest first
        #[arg(long, num_args = 7, value_name = "FILE")]
        days: Option<Vec<PathBuf>>,
    },

    /// Load records and list phase issues
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Treat the input as a 7-day array
        #[arg(long)]
        week: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    Text,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), SleepCliError> {
    let format = cli.format.unwrap_or_else(default_format);
    let analyzer = match cli.config.as_deref() {
        Some(path) => SleepAnalyzer::new(load_config(path)?),
        None => SleepAnalyzer::default(),
    };
    debug!("analyzer weights: {:?}", analyzer.config());
    let builder = ReportBuilder::with_analyzer(analyzer);

    match cli.command {
        Commands::Day { input } => cmd_day(&builder, &input, format),
        Commands::Week { input, days } => cmd_week(&builder, input.as_deref(), days, format),
        Commands::Validate { input, week } => cmd_validate(&input, week, format),
    }
}

fn cmd_day(
    builder: &ReportBuilder,
    input: &Path,
    format: OutputFormat,
) -> Result<(), SleepCliError> {
    let document = read_document(input)?;
    let day = loader::load_single_day(&document)?;
    log_issues(&day);

    let report = builder.daily(&day);
    match format {
        OutputFormat::Text => print_daily(&report, &day),
        _ => println!("{}", to_json(&report, format)?),
    }
    Ok(())
}

fn cmd_week(
    builder: &ReportBuilder,
    input: Option<&Path>,
    days: Option<Vec<PathBuf>>,
    format: OutputFormat,
) -> Result<(), SleepCliError> {
    let week = match (input, days) {
        (Some(path), _) => loader::load_week(&read_document(path)?)?,
        (None, Some(paths)) => {
            let documents = paths
                .iter()
                .map(|p| read_document(p))
                .collect::<Result<Vec<_>, _>>()?;
            WeeklySleepData::try_from(loader::load_days(&documents)?)?
        }
        (None, None) => return Err(SleepCliError::MissingInput),
    };
    info!("loaded week starting {}", week.days()[0].date);
    week.iter().for_each(log_issues);

    let report = builder.weekly(&week);
    match format {
        OutputFormat::Text => print_weekly(&report),
        _ => println!("{}", to_json(&report, format)?),
    }
    Ok(())
}

fn cmd_validate(input: &Path, week: bool, format: OutputFormat) -> Result<(), SleepCliError> {
    let document = read_document(input)?;
    let days: Vec<DailySleepData> = if week {
        loader::load_week(&document)?.into_days().into()
    } else {
        vec![loader::load_single_day(&document)?]
    };

    let report = ValidationReport {
        total_days: days.len(),
        days: days
            .iter()
            .map(|d| DayValidation {
                date: d.date.to_string(),
                phases: d.phases.len(),
                issues: check_phases(d).iter().map(|i| i.to_string()).collect(),
            })
            .collect(),
    };

    match format {
        OutputFormat::Text => {
            println!("Validation Report");
            println!("=================");
            println!("Days loaded: {}", report.total_days);
            for day in &report.days {
                let status = if day.issues.is_empty() { "[OK]" } else { "[WARN]" };
                println!("  {} {} ({} phases)", status, day.date, day.phases);
                for issue in &day.issues {
                    println!("      - {}", issue);
                }
            }
        }
        _ => println!("{}", to_json(&report, format)?),
    }
    Ok(())
}

// Helper functions

fn default_format() -> OutputFormat {
    if atty::is(atty::Stream::Stdout) {
        OutputFormat::Text
    } else {
        OutputFormat::Json
    }
}

fn read_document(input: &Path) -> Result<Value, SleepCliError> {
    let text = if input.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            warn!("reading sleep records from terminal, end input with Ctrl-D");
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        debug!("reading {}", input.display());
        fs::read_to_string(input)?
    };

    Ok(serde_json::from_str(&text)?)
}

fn load_config(path: &Path) -> Result<AnalyzerConfig, SleepCliError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn log_issues(day: &DailySleepData) {
    for issue in check_phases(day) {
        warn!("{}: {}", day.date, issue);
    }
}

fn to_json<T: serde::Serialize>(value: &T, format: OutputFormat) -> Result<String, SleepCliError> {
    Ok(match format {
        OutputFormat::JsonPretty => serde_json::to_string_pretty(value)?,
        _ => serde_json::to_string(value)?,
    })
}

fn print_daily(report: &DailyReport, day: &DailySleepData) {
    println!("Sleep report for {}", report.day.date);
    println!("==========================");
    println!(
        "In bed:      {} - {}",
        only_time(day.bedtime),
        only_time(day.wake_time)
    );
    print_entry(&report.day);
    println!("\nRecommendations:");
    for advice in &report.recommendations {
        println!("  - {}", advice);
    }
}

fn print_weekly(report: &WeeklyReport) {
    println!("Weekly sleep report");
    println!("===================");
    println!(
        "{:<12} {:>9} {:>9} {:>6} {:>6} {:>6} {:>10}",
        "Date", "In bed", "Asleep", "Light", "Deep", "REM", "Efficiency"
    );
    for day in &report.days {
        let m = &day.metrics;
        println!(
            "{:<12} {:>9} {:>9} {:>5.1}% {:>5.1}% {:>5.1}% {:>10.1}",
            day.date.to_string(),
            format_duration(m.time_in_bed),
            format_duration(m.total_sleep_time),
            m.light_sleep_percent,
            m.deep_sleep_percent,
            m.rem_sleep_percent,
            m.efficiency,
        );
    }

    let avg = &report.average;
    println!(
        "{:<12} {:>9} {:>9} {:>5.1}% {:>5.1}% {:>5.1}% {:>10.1}",
        "Average",
        format_duration(avg.time_in_bed as i64),
        format_duration(avg.total_sleep_time as i64),
        avg.light_sleep_percent,
        avg.deep_sleep_percent,
        avg.rem_sleep_percent,
        avg.efficiency,
    );
    println!(
        "\nAverage onset {}, {} awakenings per night",
        format_duration(avg.sleep_onset as i64),
        avg.awakenings_count
    );
    println!("{}", report.insight);
    println!("\nRecommendations for last night:");
    for advice in &report.recommendations {
        println!("  - {}", advice);
    }
}

fn print_entry(entry: &DayEntry) {
    let m = &entry.metrics;
    println!("Time in bed:  {}", format_duration(m.time_in_bed));
    println!("Total sleep:  {}", format_duration(m.total_sleep_time));
    println!("Sleep onset:  {}", format_duration(m.sleep_onset));
    println!(
        "{:<14}{} ({} awakenings)",
        format!("{}:", SleepPhaseType::Awake.display().name),
        format_duration(m.awake_duration),
        m.awakenings_count
    );
    for (phase, minutes, percent) in [
        (SleepPhaseType::Light, m.light_sleep_duration, m.light_sleep_percent),
        (SleepPhaseType::Deep, m.deep_sleep_duration, m.deep_sleep_percent),
        (SleepPhaseType::Rem, m.rem_sleep_duration, m.rem_sleep_percent),
    ] {
        println!(
            "{:<14}{} ({:.1}%)",
            format!("{}:", phase.display().name),
            format_duration(minutes),
            percent
        );
    }
    println!("Efficiency:   {:.1}", m.efficiency);
    if !entry.issues.is_empty() {
        println!("\nPhase issues:");
        for issue in &entry.issues {
            println!("  - {}", issue);
        }
    }
}

// Error types

#[derive(Debug)]
enum SleepCliError {
    Io(io::Error),
    Load(LoadError),
    Json(serde_json::Error),
    MissingInput,
}

impl From<io::Error> for SleepCliError {
    fn from(e: io::Error) -> Self {
        SleepCliError::Io(e)
    }
}

impl From<LoadError> for SleepCliError {
    fn from(e: LoadError) -> Self {
        SleepCliError::Load(e)
    }
}

impl From<serde_json::Error> for SleepCliError {
    fn from(e: serde_json::Error) -> Self {
        SleepCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<SleepCliError> for CliError {
    fn from(e: SleepCliError) -> Self {
        match e {
            SleepCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            SleepCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            SleepCliError::MissingInput => CliError {
                code: "MISSING_INPUT".to_string(),
                message: "No input given".to_string(),
                hint: Some("Pass --input or seven --days files".to_string()),
            },
            SleepCliError::Load(e) => {
                let code = match e.root_cause() {
                    LoadError::Schema(_) => "SCHEMA_ERROR",
                    LoadError::InvalidFormat { .. } => "INVALID_FORMAT",
                    LoadError::InvalidPhaseType(_) => "INVALID_PHASE_TYPE",
                    LoadError::Json(_) => "JSON_ERROR",
                    LoadError::DayParse { .. } => "DAY_PARSE_ERROR",
                };
                let hint = match e.root_cause() {
                    LoadError::Schema(_) => "A week must be a JSON array of exactly 7 days",
                    LoadError::InvalidFormat { .. } => {
                        "Dates use YYYY-MM-DD and timestamps YYYY-MM-DD HH:MM"
                    }
                    LoadError::InvalidPhaseType(_) => {
                        "Phase type must be Light, Deep, REM or Awake"
                    }
                    _ => "Check input format",
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_days: usize,
    days: Vec<DayValidation>,
}

#[derive(serde::Serialize)]
struct DayValidation {
    date: String,
    phases: usize,
    issues: Vec<String>,
}
