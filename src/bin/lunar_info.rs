//! Lunar Calendar Information Tool
//!
//! Prints the lunar and Hebrew dates of an instant, the instant of a lunar
//! date, or the New Moons that start each month of a lunar year.
//!
//! Usage:
//!   cargo run --bin lunar_info -- [--date 2016-04-22T05:24:00Z]
//!   cargo run --bin lunar_info -- --lunar 2016,3,0.5
//!   cargo run --bin lunar_info -- --year 2017 -v

use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser};
use lunisolar::hebrew::{datetime_to_hebrew_date_str, datetime_to_hebrew_month_day_str, HebrewDate};
use lunisolar::lunar::months_in_year;
use lunisolar::time::datetime_to_jd;
use lunisolar::{AnalyticEphemeris, LunarCalendar, LunarDate, Loader};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Targets that receive log output
const CRATE_TARGETS: &[&str] = &["lunisolar", "lunar_info"];

/// Lunar Calendar Information Tool
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Converts between UTC instants, lunar dates and Hebrew dates",
    long_about = None
)]
struct Args {
    /// UTC instant in RFC 3339 form (defaults to now)
    #[arg(short, long)]
    date: Option<DateTime<Utc>>,

    /// Lunar date as "year,month,day" to convert to UTC
    #[arg(short, long, conflicts_with = "date")]
    lunar: Option<String>,

    /// List the month starts of a lunar year
    #[arg(short, long)]
    year: Option<i32>,

    /// JSON calendar configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Install the log subscriber; `RUST_LOG` overrides the verbosity flag
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let default_filter: String = CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",");

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Parse "year,month,day" into a lunar date
fn parse_lunar_date(text: &str) -> Result<LunarDate> {
    let fields = text
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()?;
    match fields.as_slice() {
        &[year, month, day] => Ok(LunarDate::try_from((year, month, day))?),
        _ => Err(format!("expected \"year,month,day\", got {text:?}").into()),
    }
}

/// Prints a section header with a title and separator line
fn print_section_header(title: &str) {
    println!("\n{}:", title);
    println!("-------------------------------------------------------");
}

/// Helper to print named values in a formatted way
fn print_named_value(name: &str, value: impl std::fmt::Display) {
    println!("{:<16} {}", format!("{name}:"), value);
}

fn display_instant(calendar: &LunarCalendar<AnalyticEphemeris>, dt: &DateTime<Utc>) -> Result<()> {
    print_section_header(&format!("Instant {}", dt.to_rfc3339()));
    print_named_value("Julian date", format!("{:.6}", datetime_to_jd(dt)));
    print_named_value("Elongation", format!("{:.4}°", calendar.elongation(dt)?));

    let lunar = calendar.datetime_to_lunar_date(dt)?;
    print_named_value(
        "Lunar date",
        format!("{} (day {:.3})", lunar, lunar.day()),
    );
    print_named_value("Hebrew date", HebrewDate::from_datetime(dt));
    print_named_value("Hebrew (y,m,d)", datetime_to_hebrew_date_str(dt));
    print_named_value("Hebrew month", datetime_to_hebrew_month_day_str(dt));
    print_named_value("Solar eclipse", calendar.is_solar_eclipse(dt)?);
    print_named_value("Lunar eclipse", calendar.is_lunar_eclipse(dt)?);
    Ok(())
}

fn display_lunar_date(calendar: &LunarCalendar<AnalyticEphemeris>, date: &LunarDate) -> Result<()> {
    let dt = calendar.lunar_date_to_datetime(date)?;
    print_section_header(&date.to_string());
    print_named_value("UTC", dt.to_rfc3339());
    print_named_value("Elongation", format!("{:.4}°", calendar.elongation(&dt)?));
    print_named_value("Hebrew date", HebrewDate::from_datetime(&dt));
    Ok(())
}

fn display_year(calendar: &LunarCalendar<AnalyticEphemeris>, year: i32) -> Result<()> {
    print_section_header(&format!(
        "Lunar year {} ({} months)",
        year,
        months_in_year(year)
    ));
    print_named_value("March equinox", calendar.spring_equinox(year)?.to_rfc3339());
    for month in 1..=months_in_year(year) {
        let start = calendar.month_start(year, month)?;
        print_named_value(
            &format!("Month {month:>2}"),
            format!("{}  {}", start.to_rfc3339(), datetime_to_hebrew_month_day_str(&start)),
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut loader = Loader::new();
    if let Some(path) = &args.config {
        loader = loader.with_config_file(path);
    }
    let calendar = loader.lunar_calendar()?;
    log::debug!("calendar configuration: {:?}", calendar.config());

    if let Some(text) = &args.lunar {
        let date = parse_lunar_date(text)?;
        display_lunar_date(&calendar, &date)?;
    } else if args.year.is_none() || args.date.is_some() {
        let dt = args.date.unwrap_or_else(Utc::now);
        display_instant(&calendar, &dt)?;
    }

    if let Some(year) = args.year {
        display_year(&calendar, year)?;
    }

    Ok(())
}
