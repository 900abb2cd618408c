//! Lunar calendar dates

use super::delta::{split_days, LunarTimeDelta};
use super::{LunarError, Result};
use crate::constants::{LEAP_CYCLE_POSITIONS, LEAP_CYCLE_YEARS};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Months in one full leap cycle (12 common + 7 leap years)
pub(crate) const MONTHS_PER_CYCLE: i64 = 12 * LEAP_CYCLE_YEARS as i64 + LEAP_CYCLE_POSITIONS.len() as i64;

/// Largest month carry from days that is shifted into a year
const MAX_MONTH_CARRY: f64 = 1e15;

/// Whether the lunar year has a 13th month
///
/// Leap years follow a fixed 19-year cycle: positions 1, 3, 6, 9, 11, 14
/// and 17 of `year mod 19`.
pub fn is_lunar_leap_year(year: i32) -> bool {
    LEAP_CYCLE_POSITIONS.contains(&year.rem_euclid(LEAP_CYCLE_YEARS))
}

/// Number of months (12 or 13) in the lunar year
pub fn months_in_year(year: i32) -> u8 {
    if is_lunar_leap_year(year) {
        13
    } else {
        12
    }
}

/// A position in the lunar calendar
///
/// `day` is measured in lunar days of 12° elongation from the month's New
/// Moon and may be fractional. Dates are values: arithmetic returns new
/// dates.
///
/// Only [`LunarTimeDelta`] values can be added to a date:
///
/// ```compile_fail
/// use lunisolar::lunar::LunarDate;
///
/// let a = LunarDate::new(2016, 3, 0.5).unwrap();
/// let b = LunarDate::new(2016, 5, 23.0).unwrap();
/// let _ = a.add_delta(&b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LunarDate {
    year: i32,
    month: u8,
    day: f64,
}

impl LunarDate {
    /// Creates a lunar date
    ///
    /// # Errors
    ///
    /// [`LunarError::InvalidMonth`] if `month` is not in `1..=12`, or
    /// `1..=13` for a leap year, and [`LunarError::InvalidDay`] if `day` is
    /// negative or not finite.
    pub fn new(year: i32, month: u8, day: f64) -> Result<Self> {
        let max = months_in_year(year);
        if month == 0 || month > max {
            return Err(LunarError::InvalidMonth { year, month, max });
        }
        if !day.is_finite() || day < 0.0 {
            return Err(LunarError::InvalidDay(day));
        }
        Ok(Self { year, month, day })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> f64 {
        self.day
    }

    /// Whether `year` holds 13 months
    pub fn is_lunar_leap_year(year: i32) -> bool {
        is_lunar_leap_year(year)
    }

    /// The same position with the day folded into `[0, 30)`
    pub fn normalized(&self) -> Result<Self> {
        self.add_delta(&LunarTimeDelta::default())
    }

    /// Adds an interval
    ///
    /// Days are applied first and carried into months modulo 30, then the
    /// months walk across year boundaries using the 12/13-month length of
    /// each year crossed, and finally the years are added. A month 13 that
    /// lands in a common year rolls over to month 1 of the next year.
    ///
    /// # Errors
    ///
    /// [`LunarError::InvalidDay`] if the summed day count is not finite, and
    /// [`LunarError::YearOutOfRange`] if the result leaves the `i32` years.
    pub fn add_delta(&self, delta: &LunarTimeDelta) -> Result<Self> {
        let total = self.day + delta.days;
        if !total.is_finite() {
            return Err(LunarError::InvalidDay(total));
        }
        let (carry, day) = split_days(total);
        if carry.abs() > MAX_MONTH_CARRY {
            let years = carry * LEAP_CYCLE_YEARS as f64 / MONTHS_PER_CYCLE as f64;
            return Err(LunarError::YearOutOfRange(
                (self.year as i64).saturating_add(years as i64),
            ));
        }
        let (year, month) = shift_months(self.year, self.month, carry as i64 + delta.months as i64)?;

        let year = checked_year(year as i64 + delta.years as i64)?;
        let (year, month) = if month > months_in_year(year) {
            (checked_year(year as i64 + 1)?, month - months_in_year(year))
        } else {
            (year, month)
        };

        Ok(Self { year, month, day })
    }

    /// Subtracts an interval; the same as adding its negation
    pub fn sub_delta(&self, delta: &LunarTimeDelta) -> Result<Self> {
        self.add_delta(&-*delta)
    }

    /// Lexicographic comparison of (year, month, day)
    pub fn compare(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then(self.month.cmp(&other.month))
            .then(self.day.total_cmp(&other.day))
    }
}

fn checked_year(year: i64) -> Result<i32> {
    i32::try_from(year).map_err(|_| LunarError::YearOutOfRange(year))
}

/// Move `shift` months from (year, month), crossing years of 12 or 13 months
fn shift_months(year: i32, month: u8, shift: i64) -> Result<(i32, u8)> {
    // Any 19 consecutive years hold exactly one cycle's worth of months
    let mut index = month as i64 - 1 + shift;
    let cycles = index.div_euclid(MONTHS_PER_CYCLE);
    index -= cycles * MONTHS_PER_CYCLE;
    let mut year = checked_year(year as i64 + cycles * LEAP_CYCLE_YEARS as i64)?;

    while index >= months_in_year(year) as i64 {
        index -= months_in_year(year) as i64;
        year = checked_year(year as i64 + 1)?;
    }

    Ok((year, index as u8 + 1))
}

impl PartialOrd for LunarDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl TryFrom<(f64, f64, f64)> for LunarDate {
    type Error = LunarError;

    /// Builds a date from loosely typed values, rejecting a fractional year or month
    fn try_from((year, month, day): (f64, f64, f64)) -> Result<Self> {
        if !year.is_finite() || year.fract() != 0.0 {
            return Err(LunarError::NonIntegral {
                field: "year",
                value: year,
            });
        }
        if year < i32::MIN as f64 || year > i32::MAX as f64 {
            return Err(LunarError::YearOutOfRange(year as i64));
        }
        if !month.is_finite() || month.fract() != 0.0 {
            return Err(LunarError::NonIntegral {
                field: "month",
                value: month,
            });
        }
        let year = year as i32;
        let max = months_in_year(year);
        if !(1.0..=max as f64).contains(&month) {
            return Err(LunarError::MonthOutOfRange { year, month, max });
        }
        LunarDate::new(year, month as u8, day)
    }
}

impl fmt::Display for LunarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LunarDate({}, {}, {})", self.year, self.month, self.day)
    }
}
