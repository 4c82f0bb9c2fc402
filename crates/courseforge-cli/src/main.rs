//! `courseforge` CLI: project lecture timetables, find clashes, and compute student levels.
//!
//! ## Usage
//!
//! ```sh
//! # Upcoming lectures for the next week (stdin → stdout)
//! cat schedules.json | courseforge project
//!
//! # Pin "now" and widen the horizon
//! courseforge project -i schedules.json --now 2026-03-05T10:00 --horizon 14
//!
//! # Include absolute UTC instants resolved in the schedule's zone
//! courseforge project -i schedules.json --timezone Africa/Accra --absolute
//!
//! # Timetable clashes
//! courseforge conflicts -i schedules.json
//!
//! # Check a schedule document before importing it
//! courseforge validate -i schedules.json
//!
//! # Academic level of a student
//! courseforge level PS/ITC/21/0001 --today 2025-03-01
//! ```
//!
//! Defaults come from `./courseforge.toml` (or `--config PATH`) and
//! `COURSEFORGE_*` environment variables. Logs go to stderr.

mod config;

use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand, ValueEnum};
use courseforge_core::{
    dst, parse_schedules, parse_timezone, parse_wall_clock, Clock, DstPolicy, Occurrence,
    ZonedClock,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

#[derive(Parser)]
#[command(
    name = "courseforge",
    version,
    about = "CourseForge timetable and enrollment tools"
)]
struct Cli {
    /// Configuration file (defaults to ./courseforge.toml when present)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project weekly schedules into upcoming dated occurrences
    Project {
        /// Input schedules JSON (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Start of the date window (defaults to now)
        #[arg(long)]
        from: Option<String>,
        /// Override the current time (defaults to the system clock)
        #[arg(long)]
        now: Option<String>,
        /// Days after the window start to include
        #[arg(long)]
        horizon: Option<u32>,
        /// IANA timezone for slot times and "now" (overrides config)
        #[arg(long)]
        timezone: Option<String>,
        /// Add startUtc/endUtc to each occurrence
        #[arg(long)]
        absolute: bool,
        /// How --absolute treats wall-clock times inside a DST gap
        #[arg(long, value_enum, default_value_t = GapPolicy::ShiftForward)]
        dst_gap: GapPolicy,
    },
    /// Print the academic level for a student identifier
    Level {
        /// Identifier such as PS/ITC/21/0001
        identifier: String,
        /// Date to evaluate on, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        today: Option<String>,
        /// IANA timezone used to determine today (overrides config)
        #[arg(long)]
        timezone: Option<String>,
    },
    /// List clashing weekly slots
    Conflicts {
        /// Input schedules JSON (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Validate a schedules document
    Validate {
        /// Input schedules JSON (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum GapPolicy {
    Skip,
    ShiftForward,
}

impl From<GapPolicy> for DstPolicy {
    fn from(policy: GapPolicy) -> Self {
        match policy {
            GapPolicy::Skip => DstPolicy::Skip,
            GapPolicy::ShiftForward => DstPolicy::ShiftForward,
        }
    }
}

/// Occurrence plus its absolute instants, for `project --absolute`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AbsoluteOccurrence {
    #[serde(flatten)]
    occurrence: Occurrence,
    start_utc: DateTime<Utc>,
    end_utc: DateTime<Utc>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging(&settings);
    tracing::debug!(settings = ?settings, "configuration loaded");

    match cli.command {
        Commands::Project {
            input,
            output,
            from,
            now,
            horizon,
            timezone,
            absolute,
            dst_gap,
        } => {
            let tz = resolve_timezone(timezone.as_deref(), &settings)?;
            let schedules = parse_schedules(&read_input(input.as_deref())?)
                .context("Failed to parse schedules")?;

            let now = match now {
                Some(raw) => parse_wall_clock(&raw, tz).context("Invalid --now")?,
                None => ZonedClock::new(tz).now(),
            };
            let from = match from {
                Some(raw) => parse_wall_clock(&raw, tz).context("Invalid --from")?,
                None => now,
            };
            let horizon = horizon.unwrap_or(settings.horizon_days);

            let occurrences = courseforge_core::project_occurrences(&schedules, from, horizon, now)
                .context("Failed to project schedules")?;

            let json = if absolute {
                let resolved = to_absolute(occurrences, tz, dst_gap.into());
                serde_json::to_string_pretty(&resolved)?
            } else {
                serde_json::to_string_pretty(&occurrences)?
            };
            write_output(output.as_deref(), &json)?;
        }
        Commands::Level {
            identifier,
            today,
            timezone,
        } => {
            let tz = resolve_timezone(timezone.as_deref(), &settings)?;
            let today = match today {
                Some(raw) => parse_wall_clock(&raw, tz)
                    .context("Invalid --today")?
                    .date(),
                None => ZonedClock::new(tz).today(),
            };
            println!("{}", courseforge_core::level(&identifier, today));
        }
        Commands::Conflicts { input, output } => {
            let schedules = parse_schedules(&read_input(input.as_deref())?)
                .context("Failed to parse schedules")?;
            let conflicts = courseforge_core::find_conflicts(&schedules);
            write_output(output.as_deref(), &serde_json::to_string_pretty(&conflicts)?)?;
        }
        Commands::Validate { input } => {
            let schedules = parse_schedules(&read_input(input.as_deref())?)
                .context("Invalid schedules")?;
            let slots: usize = schedules.iter().map(|s| s.slots.len()).sum();
            println!("OK: {} schedules, {} slots", schedules.len(), slots);
        }
    }

    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}

fn resolve_timezone(flag: Option<&str>, settings: &Settings) -> Result<Tz> {
    match flag {
        Some(name) => Ok(parse_timezone(name)?),
        None => settings.tz(),
    }
}

fn to_absolute(occurrences: Vec<Occurrence>, tz: Tz, policy: DstPolicy) -> Vec<AbsoluteOccurrence> {
    occurrences
        .into_iter()
        .filter_map(|occurrence| match dst::resolve_occurrence(&occurrence, tz, policy) {
            Some((start_utc, end_utc)) => Some(AbsoluteOccurrence {
                occurrence,
                start_utc,
                end_utc,
            }),
            None => {
                tracing::warn!(id = %occurrence.id, "occurrence falls in a DST gap, skipped");
                None
            }
        })
        .collect()
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
