//! `chair` CLI -- compute bookable slots and check booking conflicts from JSON.
//!
//! ## Usage
//!
//! ```sh
//! # Bookable 30-minute starts on a date
//! chair slots --schedule week.json --bookings day.json --date 2026-03-16 --duration 30
//!
//! # Finer grid (also settable via CHAIR_SLOT_GRANULARITY)
//! chair slots -s week.json --date 2026-03-16 --duration 45 --granularity 15
//!
//! # May this booking be made? Exit code 2 when it may not.
//! chair check -s week.json -b day.json --date 2026-03-16 --start 10:15 --duration 30
//!
//! # Reschedule check that ignores the booking being moved
//! chair check -s week.json -b day.json --date 2026-03-16 --start 14:00 --duration 30 --exclude apt-7
//!
//! # Validate a stored weekly schedule (reads stdin when -s is "-")
//! cat week.json | chair validate -s -
//! ```

use anyhow::{Context, Result};
use chair_engine::{
    find_conflicts, is_available_on, AppointmentStatus, AvailableSlots, BookingInterval,
    CandidateInterval, WallTime, WeeklySchedule, DEFAULT_SLOT_GRANULARITY_MINUTES,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::{self, Read};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Exit code for a well-formed check whose slot is taken.
const EXIT_UNAVAILABLE: i32 = 2;

#[derive(Parser)]
#[command(
    name = "chair",
    version,
    about = "Barbershop slot availability and booking conflict checks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter for diagnostics on stderr (e.g. "debug", "chair_engine=trace")
    #[arg(long, global = true, env = "CHAIR_LOG", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List bookable start times for a service on a date
    Slots {
        /// Weekly schedule JSON ("-" for stdin)
        #[arg(short, long)]
        schedule: String,
        /// Existing bookings JSON array ("-" for stdin; none if omitted)
        #[arg(short, long)]
        bookings: Option<String>,
        /// Date to inspect (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Service duration in minutes
        #[arg(long)]
        duration: u32,
        /// Minutes between candidate start times
        #[arg(long, env = "CHAIR_SLOT_GRANULARITY", default_value_t = DEFAULT_SLOT_GRANULARITY_MINUTES)]
        granularity: u32,
    },
    /// Check whether one booking may be made
    Check {
        /// Weekly schedule JSON ("-" for stdin)
        #[arg(short, long)]
        schedule: String,
        /// Existing bookings JSON array ("-" for stdin; none if omitted)
        #[arg(short, long)]
        bookings: Option<String>,
        /// Date of the booking (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Start time (HH:MM)
        #[arg(long)]
        start: WallTime,
        /// Service duration in minutes
        #[arg(long, allow_hyphen_values = true)]
        duration: i64,
        /// Booking id to ignore, for rescheduling a booking in place
        #[arg(long)]
        exclude: Option<String>,
    },
    /// Validate a weekly schedule
    Validate {
        /// Weekly schedule JSON ("-" for stdin)
        #[arg(short, long)]
        schedule: String,
    },
}

/// A stored booking row. Rows whose status does not block are dropped before
/// they reach the engine.
#[derive(Deserialize)]
struct BookingRow {
    id: String,
    start_time: WallTime,
    end_time: WallTime,
    #[serde(default)]
    status: Option<AppointmentStatus>,
}

#[derive(Serialize)]
struct ConflictReport {
    id: String,
    start_time: WallTime,
    end_time: WallTime,
    overlap_minutes: u32,
}

#[derive(Serialize)]
struct CheckReport {
    available: bool,
    date: NaiveDate,
    start_time: WallTime,
    end_time: WallTime,
    conflicts: Vec<ConflictReport>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command {
        Commands::Slots {
            schedule,
            bookings,
            date,
            duration,
            granularity,
        } => {
            ensure_single_stdin(&schedule, bookings.as_deref())?;
            let week = load_schedule(&schedule)?;
            let existing = load_bookings(bookings.as_deref())?;

            let response = AvailableSlots::for_date(&week, date, &existing, duration, granularity)
                .context("Failed to compute available slots")?;
            info!(
                %date,
                duration,
                granularity,
                slots = response.available_slots.len(),
                "computed slots"
            );

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Check {
            schedule,
            bookings,
            date,
            start,
            duration,
            exclude,
        } => {
            ensure_single_stdin(&schedule, bookings.as_deref())?;
            let week = load_schedule(&schedule)?;
            let existing = load_bookings(bookings.as_deref())?;

            let candidate =
                CandidateInterval::new(start, duration).context("Invalid booking candidate")?;
            let available = is_available_on(&week, date, &candidate, &existing, exclude.as_deref())
                .context("Failed to check availability")?;

            let conflicts = find_conflicts(&candidate, &existing, exclude.as_deref())
                .into_iter()
                .map(|c| ConflictReport {
                    id: c.booking.id,
                    start_time: c.booking.start_time,
                    end_time: c.booking.end_time,
                    overlap_minutes: c.overlap_minutes,
                })
                .collect();

            let report = CheckReport {
                available,
                date,
                start_time: candidate.start_time(),
                end_time: candidate.end_time(),
                conflicts,
            };
            info!(%date, slot = %candidate.range(), available, "checked candidate");

            println!("{}", serde_json::to_string_pretty(&report)?);
            if !available {
                process::exit(EXIT_UNAVAILABLE);
            }
        }
        Commands::Validate { schedule } => {
            let week = load_schedule(&schedule)?;
            week.validate().context("Schedule is invalid")?;
            println!("ok");
        }
    }

    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .with_context(|| format!("Invalid log filter: {}", level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

fn ensure_single_stdin(schedule: &str, bookings: Option<&str>) -> Result<()> {
    if schedule == "-" && bookings == Some("-") {
        anyhow::bail!("Only one of --schedule and --bookings can read from stdin");
    }
    Ok(())
}

fn load_schedule(path: &str) -> Result<WeeklySchedule> {
    let raw = read_input(path)?;
    let week: WeeklySchedule = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse weekly schedule: {}", path))?;
    debug!(path, "loaded weekly schedule");
    Ok(week)
}

/// Read bookings and keep only those with a blocking status. Rows without a
/// status are assumed to be pre-filtered.
fn load_bookings(path: Option<&str>) -> Result<Vec<BookingInterval>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };

    let raw = read_input(path)?;
    let rows: Vec<BookingRow> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse bookings: {}", path))?;
    let total = rows.len();

    let bookings: Vec<BookingInterval> = rows
        .into_iter()
        .filter(|row| row.status.map_or(true, |s| s.is_blocking()))
        .map(|row| BookingInterval::new(row.id, row.start_time, row.end_time))
        .collect();

    for b in &bookings {
        if b.start_time >= b.end_time {
            anyhow::bail!(
                "Booking {} has start_time {} not before end_time {}",
                b.id,
                b.start_time,
                b.end_time
            );
        }
    }

    debug!(path, total, blocking = bookings.len(), "loaded bookings");
    Ok(bookings)
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
    }
}
