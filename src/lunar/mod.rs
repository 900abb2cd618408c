//! Lunar calendar
//!
//! A lunisolar calendar whose months run from one New Moon to the next and
//! whose years begin near the March equinox. Years hold 12 or 13 months
//! according to a fixed 19-year cycle, and every month is divided into 30
//! lunar days of 12° Moon-Sun elongation each, so day 15 is the Full Moon.
//!
//! [`LunarDate`] and [`LunarTimeDelta`] are plain values with calendar
//! arithmetic that needs no ephemeris. [`LunarCalendar`] ties them to real
//! instants through an [`Ephemeris`](crate::planetlib::Ephemeris).

pub mod calendar;
pub mod config;
pub mod date;
pub mod delta;

pub use calendar::LunarCalendar;
pub use config::LunarCalendarConfig;
pub use date::{is_lunar_leap_year, months_in_year, LunarDate};
pub use delta::LunarTimeDelta;

use crate::planetlib::PlanetError;
use crate::search::SearchError;
use crate::time::TimeError;
use thiserror::Error;

/// Error type for lunar calendar operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LunarError {
    #[error("Invalid month {month} for lunar year {year} (must be 1..={max})")]
    InvalidMonth { year: i32, month: u8, max: u8 },

    #[error("Invalid lunar day {0} (must be finite and non-negative)")]
    InvalidDay(f64),

    #[error("Lunar {field} must be an integer, got {value}")]
    NonIntegral { field: &'static str, value: f64 },

    #[error("Month {month} is not a month of lunar year {year} (must be 1..={max})")]
    MonthOutOfRange { year: i32, month: f64, max: u8 },

    #[error("Lunar year {0} is out of the supported range")]
    YearOutOfRange(i64),

    #[error("Invalid calendar configuration: {0}")]
    InvalidConfig(String),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Ephemeris error: {0}")]
    Ephemeris(#[from] PlanetError),

    #[error("Time error: {0}")]
    Time(#[from] TimeError),
}

/// Result type for lunar calendar operations
pub type Result<T> = std::result::Result<T, LunarError>;
