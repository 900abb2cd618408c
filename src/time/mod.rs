//! Time module for astronomical time calculations
//!
//! The calendar code works on Julian dates in Universal Time, while the
//! ephemeris expects Terrestrial Time. This module converts between
//! `chrono` UTC datetimes and Julian dates and supplies the ΔT correction
//! between the two scales. UTC is used as a stand-in for UT1; the
//! difference is below a second.

pub mod calendar;

use crate::constants::{DAY_S, UNIX_EPOCH_JD};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Error type for time operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimeError {
    #[error("Time out of range: {0}")]
    OutOfRange(String),

    #[error("Calendar error: {0}")]
    CalendarError(String),
}

/// Result type for time operations
pub type Result<T> = std::result::Result<T, TimeError>;

/// Convert a UTC datetime to a Julian date (UT)
pub fn datetime_to_jd(dt: &DateTime<Utc>) -> f64 {
    let seconds = dt.timestamp() as f64 + dt.timestamp_subsec_nanos() as f64 * 1e-9;
    UNIX_EPOCH_JD + seconds / DAY_S
}

/// Convert a Julian date (UT) to a UTC datetime, rounded to the nearest microsecond
pub fn jd_to_datetime(jd: f64) -> Result<DateTime<Utc>> {
    if !jd.is_finite() {
        return Err(TimeError::OutOfRange(format!("Julian date {jd} is not finite")));
    }

    let micros = ((jd - UNIX_EPOCH_JD) * DAY_S * 1e6).round();
    if micros.abs() >= i64::MAX as f64 {
        return Err(TimeError::OutOfRange(format!("Julian date {jd}")));
    }

    DateTime::<Utc>::from_timestamp_micros(micros as i64)
        .ok_or_else(|| TimeError::OutOfRange(format!("Julian date {jd}")))
}

/// Julian date (UT) of midnight at the start of the given Gregorian date
pub fn gregorian_midnight_jd(year: i32, month: u32, day: u32) -> Result<f64> {
    if !(1..=12).contains(&month) || day == 0 || day > 31 {
        return Err(TimeError::CalendarError(format!(
            "Invalid calendar date {year:04}-{month:02}-{day:02}"
        )));
    }
    Ok(calendar::julian_date(year, month, day as f64))
}

/// Convert a Julian date in UT to Terrestrial Time
pub fn ut_to_tt(jd_ut: f64) -> f64 {
    jd_ut + delta_t(jd_ut) / DAY_S
}

/// Calculate delta_t (TT - UT) in seconds at the given Julian date
pub fn delta_t(jd: f64) -> f64 {
    let year = (jd - 1721045.0) / 365.25;
    delta_t_approx(year)
}

/// Approximate delta_t calculation based on year
///
/// Piecewise polynomials of Espenak and Meeus (NASA eclipse tables).
fn delta_t_approx(year: f64) -> f64 {
    if year < -500.0 {
        let t = (year - 1820.0) / 100.0;
        -20.0 + 32.0 * t * t
    } else if year < 500.0 {
        let t = year / 100.0;
        10583.6 - 1014.41 * t + 33.78311 * t * t - 5.952053 * t.powi(3) - 0.1798452 * t.powi(4)
            + 0.022174192 * t.powi(5)
            + 0.0090316521 * t.powi(6)
    } else if year < 1600.0 {
        let t = (year - 1000.0) / 100.0;
        1574.2 - 556.01 * t + 71.23472 * t * t + 0.319781 * t.powi(3)
            - 0.8503463 * t.powi(4)
            - 0.005050998 * t.powi(5)
            + 0.0083572073 * t.powi(6)
    } else if year < 1700.0 {
        let t = year - 1600.0;
        120.0 - 0.9808 * t - 0.01532 * t * t + t.powi(3) / 7129.0
    } else if year < 1800.0 {
        let t = year - 1700.0;
        8.83 + 0.1603 * t - 0.0059285 * t * t + 0.00013336 * t.powi(3) - t.powi(4) / 1174000.0
    } else if year < 1860.0 {
        let t = year - 1800.0;
        13.72 - 0.332447 * t + 0.0068612 * t * t + 0.0041116 * t.powi(3)
            - 0.00037436 * t.powi(4)
            + 0.0000121272 * t.powi(5)
            - 0.0000001699 * t.powi(6)
            + 0.000000000875 * t.powi(7)
    } else if year < 1900.0 {
        let t = year - 1860.0;
        7.62 + 0.5737 * t - 0.251754 * t * t + 0.01680668 * t.powi(3) - 0.0004473624 * t.powi(4)
            + t.powi(5) / 233174.0
    } else if year < 1920.0 {
        let t = year - 1900.0;
        -2.79 + 1.494119 * t - 0.0598939 * t * t + 0.0061966 * t.powi(3) - 0.000197 * t.powi(4)
    } else if year < 1941.0 {
        let t = year - 1920.0;
        21.20 + 0.84493 * t - 0.076100 * t * t + 0.0020936 * t.powi(3)
    } else if year < 1961.0 {
        let t = year - 1950.0;
        29.07 + 0.407 * t - t * t / 233.0 + t.powi(3) / 2547.0
    } else if year < 1986.0 {
        let t = year - 1975.0;
        45.45 + 1.067 * t - t * t / 260.0 - t.powi(3) / 718.0
    } else if year < 2005.0 {
        let t = year - 2000.0;
        63.86 + 0.3345 * t - 0.060374 * t * t
            + 0.0017275 * t.powi(3)
            + 0.000651814 * t.powi(4)
            + 0.00002373599 * t.powi(5)
    } else if year < 2050.0 {
        // 2005-2050 prediction
        let t = year - 2000.0;
        62.92 + 0.32217 * t + 0.005589 * t * t
    } else if year < 2150.0 {
        let u = (year - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u - 0.5628 * (2150.0 - year)
    } else {
        // After 2150, based on long-term parabola
        let u = (year - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u
    }
}
