//! Hebrew calendar
//!
//! Arithmetic conversion between Gregorian dates and the fixed Hebrew
//! calendar (molad of Tishri, the postponement rules and variable
//! Marheshvan/Kislev lengths), plus the month names and string formats used
//! when annotating dates.
//!
//! Months are numbered from Nisan = 1, so the year (which begins at Tishri)
//! runs 7, 8, ..., 12 (or 13), 1, ..., 6.

use crate::time::calendar;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Julian day number of 1 Tishri AM 1
const HEBREW_EPOCH_JDN: i64 = 347_998;

/// Parts (1/1080 hour) in a day
const PARTS_PER_DAY: i64 = 25_920;

const MONTH_NAMES: [&str; 13] = [
    "Nisan",
    "Iyar",
    "Sivan",
    "Tammuz",
    "Av",
    "Elul",
    "Tishri",
    "Marheshvan",
    "Kislev",
    "Tevet",
    "Shevat",
    "Adar I",
    "Adar II",
];

/// Error type for Hebrew calendar operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HebrewError {
    #[error("Invalid Hebrew date {year}-{month}-{day}")]
    InvalidDate { year: i32, month: u8, day: u8 },

    #[error("Invalid Gregorian date {year:04}-{month:02}-{day:02}")]
    InvalidGregorian { year: i32, month: u32, day: u32 },
}

/// Result type for Hebrew calendar operations
pub type Result<T> = std::result::Result<T, HebrewError>;

/// Name of a Hebrew month number (1 = Nisan ... 13 = Adar II)
pub fn month_number_to_month_name(month: u8) -> Option<&'static str> {
    match month {
        1..=13 => Some(MONTH_NAMES[month as usize - 1]),
        _ => None,
    }
}

/// Whether the Hebrew year has a second Adar
pub fn is_hebrew_leap_year(year: i32) -> bool {
    (7 * year as i64 + 1).rem_euclid(19) < 7
}

/// Number of months (12 or 13) in the Hebrew year
pub fn months_in_hebrew_year(year: i32) -> u8 {
    if is_hebrew_leap_year(year) {
        13
    } else {
        12
    }
}

/// Number of days in the Hebrew year (353-355 or 383-385)
pub fn days_in_hebrew_year(year: i32) -> i64 {
    new_year_jdn(year as i64 + 1) - new_year_jdn(year as i64)
}

/// Number of days (29 or 30) in a month of the Hebrew year
pub fn days_in_hebrew_month(year: i32, month: u8) -> u8 {
    match month {
        2 | 4 | 6 | 10 | 13 => 29,
        12 if !is_hebrew_leap_year(year) => 29,
        // Marheshvan is full only in complete years, Kislev short only in deficient ones
        8 if days_in_hebrew_year(year) % 10 != 5 => 29,
        9 if days_in_hebrew_year(year) % 10 == 3 => 29,
        _ => 30,
    }
}

/// Days from the epoch to the molad of Tishri, with the molad-zaken and
/// lo-ADU postponements applied
fn elapsed_days(year: i64) -> i64 {
    let months = (235 * year - 234).div_euclid(19);
    let parts = 12_084 + 13_753 * months;
    let day = months * 29 + parts.div_euclid(PARTS_PER_DAY);
    if (3 * (day + 1)).rem_euclid(7) < 3 {
        day + 1
    } else {
        day
    }
}

/// Postponement keeping every year within the allowed lengths
fn year_length_delay(year: i64) -> i64 {
    let last = elapsed_days(year - 1);
    let present = elapsed_days(year);
    let next = elapsed_days(year + 1);
    if next - present == 356 {
        2
    } else if present - last == 382 {
        1
    } else {
        0
    }
}

/// Julian day number of 1 Tishri
fn new_year_jdn(year: i64) -> i64 {
    HEBREW_EPOCH_JDN + elapsed_days(year) + year_length_delay(year)
}

fn to_jdn(year: i32, month: u8, day: u8) -> i64 {
    let month_days = |range: std::ops::Range<u8>| -> i64 {
        range.map(|m| days_in_hebrew_month(year, m) as i64).sum()
    };
    let before = if month < 7 {
        month_days(7..months_in_hebrew_year(year) + 1) + month_days(1..month)
    } else {
        month_days(7..month)
    };
    new_year_jdn(year as i64) + before + day as i64 - 1
}

fn from_jdn(jdn: i64) -> (i32, u8, u8) {
    // Estimate from the mean year, then step to the enclosing year
    let count = ((jdn - HEBREW_EPOCH_JDN) * 98_496).div_euclid(35_975_351);
    let mut year = count - 1;
    while jdn >= new_year_jdn(year + 1) {
        year += 1;
    }
    let year = year as i32;

    let mut month = if jdn < to_jdn(year, 1, 1) { 7 } else { 1 };
    while month < 13 && jdn > to_jdn(year, month, days_in_hebrew_month(year, month)) {
        month += 1;
    }
    let day = jdn - to_jdn(year, month, 1) + 1;

    (year, month, day as u8)
}

/// A date in the Hebrew calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HebrewDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl HebrewDate {
    /// Creates a Hebrew date, checking the month and day against the year
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self> {
        if month == 0
            || month > months_in_hebrew_year(year)
            || day == 0
            || day > days_in_hebrew_month(year, month)
        {
            return Err(HebrewError::InvalidDate { year, month, day });
        }
        Ok(Self { year, month, day })
    }

    /// Hebrew date of a proleptic Gregorian date
    pub fn from_gregorian(year: i32, month: u32, day: u32) -> Result<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(HebrewError::InvalidGregorian { year, month, day })?;
        Ok(Self::from_naive_date(&date))
    }

    /// Hebrew date of the UTC calendar day containing `dt`
    pub fn from_datetime(dt: &DateTime<Utc>) -> Self {
        Self::from_naive_date(&dt.date_naive())
    }

    fn from_naive_date(date: &NaiveDate) -> Self {
        let jdn = calendar::julian_day(date.year(), date.month(), date.day());
        let (year, month, day) = from_jdn(jdn);
        Self { year, month, day }
    }

    /// The Gregorian date of this Hebrew date
    pub fn to_gregorian(&self) -> Result<NaiveDate> {
        let (year, month, day) = calendar::calendar_date(to_jdn(self.year, self.month, self.day));
        NaiveDate::from_ymd_opt(year, month, day).ok_or(HebrewError::InvalidGregorian {
            year,
            month,
            day,
        })
    }

    pub fn month_name(&self) -> &'static str {
        month_number_to_month_name(self.month).unwrap_or_default()
    }
}

impl fmt::Display for HebrewDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.day, self.month_name(), self.year)
    }
}

/// `"year, month, day"` of the Hebrew date, right-aligned to widths 4, 2, 2
pub fn datetime_to_hebrew_date_str(dt: &DateTime<Utc>) -> String {
    let date = HebrewDate::from_datetime(dt);
    format!("{:>4}, {:>2}, {:>2}", date.year, date.month, date.day)
}

/// `"Month: day"` of the Hebrew date, e.g. `"Tishri: 1"`
pub fn datetime_to_hebrew_month_day_str(dt: &DateTime<Utc>) -> String {
    let date = HebrewDate::from_datetime(dt);
    format!("{}: {}", date.month_name(), date.day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_month_names() {
        assert_eq!(month_number_to_month_name(1), Some("Nisan"));
        assert_eq!(month_number_to_month_name(7), Some("Tishri"));
        assert_eq!(month_number_to_month_name(12), Some("Adar I"));
        assert_eq!(month_number_to_month_name(13), Some("Adar II"));
        assert_eq!(month_number_to_month_name(0), None);
        assert_eq!(month_number_to_month_name(14), None);
    }

    #[test]
    fn test_leap_years() {
        // Years 3, 6, 8, 11, 14, 17 and 19 of the cycle
        let leaps: Vec<i32> = (5758..5777).filter(|&y| is_hebrew_leap_year(y)).collect();
        assert_eq!(leaps, vec![5760, 5763, 5765, 5768, 5771, 5774, 5776]);
    }

    #[test]
    fn test_year_lengths() {
        for year in 5700..5850 {
            let days = days_in_hebrew_year(year);
            let allowed: &[i64] = if is_hebrew_leap_year(year) {
                &[383, 384, 385]
            } else {
                &[353, 354, 355]
            };
            assert!(allowed.contains(&days), "year {year} has {days} days");

            let summed: i64 = (1..=months_in_hebrew_year(year))
                .map(|m| days_in_hebrew_month(year, m) as i64)
                .sum();
            assert_eq!(summed, days);
        }
    }

    #[test]
    fn test_rosh_hashanah_5784() {
        let jdn = calendar::julian_day(2023, 9, 16);
        assert_eq!(jdn, 2460204);
        assert_eq!(new_year_jdn(5784), jdn);
        assert_eq!(from_jdn(jdn), (5784, 7, 1));
    }

    #[test]
    fn test_new_rejects_invalid() {
        assert!(HebrewDate::new(5783, 13, 1).is_err());
        assert!(HebrewDate::new(5784, 13, 1).is_ok());
        assert!(HebrewDate::new(5784, 2, 30).is_err());
        assert!(HebrewDate::new(5784, 0, 1).is_err());
        assert!(HebrewDate::new(5784, 1, 30).is_ok());
    }

    #[test]
    fn test_from_gregorian_rejects_invalid() {
        assert_eq!(
            HebrewDate::from_gregorian(2023, 2, 30).unwrap_err(),
            HebrewError::InvalidGregorian {
                year: 2023,
                month: 2,
                day: 30
            }
        );
    }

    #[test]
    fn test_strings() {
        let dt = Utc.with_ymd_and_hms(2023, 9, 16, 12, 0, 0).unwrap();
        assert_eq!(datetime_to_hebrew_date_str(&dt), "5784,  7,  1");
        assert_eq!(datetime_to_hebrew_month_day_str(&dt), "Tishri: 1");
        assert_eq!(HebrewDate::from_datetime(&dt).to_string(), "1 Tishri 5784");
    }
}
