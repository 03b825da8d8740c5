//! `timebox` CLI: inspect, repair and replay timeboxed daily schedules.
//!
//! ## Usage
//!
//! ```sh
//! # Print the day's timeline
//! timebox show -i sections.json
//!
//! # Report overlapping sections (exits non-zero if any)
//! timebox check -i sections.json
//!
//! # Settle every section into the day window and push overlaps apart
//! timebox resolve -i sections.json -o fixed.json
//!
//! # Replay a recorded pointer script against a day
//! timebox replay -i sections.json --events drag.json --date 2026-03-02
//!
//! # Open a stored day, creating it from yesterday or a template
//! timebox day --store plans.json --date 2026-03-03
//!
//! # Score a stored day and record the review
//! timebox review --store plans.json --date 2026-03-02 --note "good day"
//! ```

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use timebox_engine::time::{duration_between, format_12h};
use timebox_engine::{
    minutes_to_time, DailyPlan, PlanStore, PointerInput, SchedulerConfig, SchedulerSession,
    Section,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "timebox",
    version,
    about = "Timeline scheduler for timeboxed daily plans"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Scheduler config JSON (day window, minimum duration, snapping)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log filter used when RUST_LOG is unset (e.g. "debug", "timebox_engine=trace")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the timeline and the unscheduled tray
    Show {
        /// Sections JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Report overlapping sections; fails if any are found
    Check {
        /// Sections JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Settle all sections into the day window and resolve overlaps
    Resolve {
        /// Sections JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Replay a pointer event script and print the saved sections
    Replay {
        /// Sections JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Pointer events JSON file
        #[arg(long)]
        events: String,
        /// Section to scroll to on days other than today
        #[arg(long)]
        current: Option<String>,
        /// Date of the plan (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Wall-clock time for timers (YYYY-MM-DDTHH:MM:SS); defaults to now
        #[arg(long)]
        now: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Print a stored day's timeline, creating the day first if needed
    Day {
        /// Plan store JSON file
        #[arg(long)]
        store: String,
        /// Date of the plan (YYYY-MM-DD)
        #[arg(long)]
        date: String,
    },
    /// Show productivity for a stored day, optionally recording a review
    Review {
        /// Plan store JSON file
        #[arg(long)]
        store: String,
        /// Date of the plan (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Record the review with this note and save the store
        #[arg(long)]
        note: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Show { input } => {
            let sections = read_sections(input.as_deref())?;
            print!("{}", render_timeline(&sections));
        }
        Commands::Check { input } => {
            let sections = read_sections(input.as_deref())?;
            let intervals: Vec<_> = sections
                .iter()
                .filter(|s| s.is_timeboxed())
                .filter_map(Section::interval)
                .collect();
            let conflicts = timebox_engine::find_conflicts(&intervals);
            for c in &conflicts {
                println!(
                    "{} overlaps {} by {}",
                    c.first.id,
                    c.second.id,
                    timebox_engine::time::format_duration(c.overlap_minutes)
                );
            }
            if !conflicts.is_empty() {
                anyhow::bail!("{} overlapping pair(s) found", conflicts.len());
            }
            println!("No overlaps.");
        }
        Commands::Resolve { input, output } => {
            let sections = read_sections(input.as_deref())?;
            let now = Local::now().naive_local();
            let mut plan = DailyPlan::new(now.date(), sections);
            let mut session = open_scheduler(&plan, None, config)?;
            let resolution = session.settle_all(now);
            if resolution.adjusted() {
                eprintln!("Adjusted: {}", resolution.shifted.join(", "));
            }
            plan.apply_schedule(session.save(now));
            write_json(output.as_deref(), &plan.sections)?;
        }
        Commands::Replay {
            input,
            events,
            current,
            date,
            now,
            output,
        } => {
            let sections = read_sections(input.as_deref())?;
            let script = read_input(Some(&events))?;
            let inputs: Vec<PointerInput> =
                serde_json::from_str(&script).context("Failed to parse pointer events")?;

            let now = match now.as_deref() {
                Some(s) => parse_now(s)?,
                None => Local::now().naive_local(),
            };
            let date = match date.as_deref() {
                Some(s) => parse_date(s)?,
                None => now.date(),
            };

            let mut plan = DailyPlan::new(date, sections);
            let mut session = open_scheduler(&plan, current, config)?;
            for (i, event) in inputs.into_iter().enumerate() {
                let settled = session
                    .dispatch(event, now)
                    .with_context(|| format!("Event {} was rejected", i))?;
                if let Some(settled) = settled {
                    let placed = match settled.interval {
                        Some(iv) => {
                            format!("{}-{}", minutes_to_time(iv.start), minutes_to_time(iv.end))
                        }
                        None => "unscheduled".to_string(),
                    };
                    eprintln!("{}: {}", settled.section_id, placed);
                }
            }
            if let Some(notice) = &session.view().notice {
                eprintln!("{}", notice.message);
            }
            plan.apply_schedule(session.save(now));
            write_json(output.as_deref(), &plan.sections)?;
        }
        Commands::Day { store, date } => {
            let date = parse_date(&date)?;
            let mut plans = PlanStore::load(&store)
                .with_context(|| format!("Failed to load plan store: {}", store))?;
            let created = plans.get(date).is_none();
            print!("{}", render_timeline(&plans.open_day(date).sections));
            if created {
                plans.save().context("Failed to save plan store")?;
            }
        }
        Commands::Review { store, date, note } => {
            let date = parse_date(&date)?;
            let mut plans = PlanStore::load(&store)
                .with_context(|| format!("Failed to load plan store: {}", store))?;
            let plan = plans
                .get(date)
                .with_context(|| format!("No plan for {}", date))?;
            let scores = plan.productivity();
            println!("Signal productivity:    {}%", scores.signal);
            println!("Absolute productivity:  {}%", scores.absolute);

            if let Some(note) = note {
                plans.record_review(date, note)?;
                plans.save().context("Failed to save plan store")?;
                println!("Review recorded for {}.", date);
            }
        }
    }

    Ok(())
}

/// Install the stderr `fmt` subscriber. `RUST_LOG` wins over `--log-level`.
fn init_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))
}

/// Open a scheduler over the plan's timeboxed sections only; the rest are
/// spliced back in front by `DailyPlan::apply_schedule`.
fn open_scheduler(
    plan: &DailyPlan,
    current: Option<String>,
    config: SchedulerConfig,
) -> Result<SchedulerSession> {
    SchedulerSession::open(plan.timeboxed_sections(), current, plan.date, config)
        .context("Failed to open scheduler")
}

fn load_config(path: Option<&str>) -> Result<SchedulerConfig> {
    let Some(path) = path else {
        return Ok(SchedulerConfig::default());
    };
    let json = read_input(Some(path))?;
    SchedulerConfig::from_json(&json)
        .with_context(|| format!("Invalid scheduler config: {}", path))
}

fn read_sections(path: Option<&str>) -> Result<Vec<Section>> {
    let json = read_input(path)?;
    serde_json::from_str(&json).context("Failed to parse sections JSON")
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

fn parse_now(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .with_context(|| format!("Invalid time '{}', expected YYYY-MM-DDTHH:MM:SS", s))
}

/// One line per scheduled section in start order, then the tray.
/// Sections that are not timeboxed are left out.
fn render_timeline(sections: &[Section]) -> String {
    let timeboxed: Vec<&Section> = sections.iter().filter(|s| s.is_timeboxed()).collect();
    let mut scheduled: Vec<_> = timeboxed
        .iter()
        .filter_map(|s| s.interval().map(|iv| (iv, *s)))
        .collect();
    scheduled.sort_by_key(|(iv, _)| iv.start);

    let mut out = String::new();
    for (_, section) in &scheduled {
        let start = section.start_time.as_deref().unwrap_or_default();
        let end = section.end_time.as_deref().unwrap_or_default();
        out.push_str(&format!(
            "{:>8} - {:<8}  {:<14}  {}\n",
            format_12h(start),
            format_12h(end),
            duration_between(Some(start), Some(end)),
            section.title
        ));
    }

    let unscheduled: Vec<_> = timeboxed.iter().filter(|s| s.interval().is_none()).collect();
    if !unscheduled.is_empty() {
        out.push_str("\nUnscheduled:\n");
        for section in unscheduled {
            out.push_str(&format!("  {}\n", section.title));
        }
    }
    out
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

fn write_json<T: serde::Serialize>(path: Option<&str>, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
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
