//! Lunar calendar intervals

use crate::constants::LUNAR_DAYS_PER_MONTH;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// A signed interval of lunar years, months and days
///
/// Combining two deltas normalizes the day count into `[0, 30)` and carries
/// the overflow into `months`. Months are never carried into years: a year
/// holds 12 or 13 months, which is only known once the delta is applied to a
/// [`LunarDate`](super::LunarDate).
///
/// The operators saturate at the `i32` bounds instead of overflowing. A
/// non-finite day count is carried along unchanged and rejected when the
/// delta is applied to a date.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LunarTimeDelta {
    pub years: i32,
    pub months: i32,
    pub days: f64,
}

impl LunarTimeDelta {
    pub fn new(years: i32, months: i32, days: f64) -> Self {
        Self {
            years,
            months,
            days,
        }
    }

    pub fn from_years(years: i32) -> Self {
        Self::new(years, 0, 0.0)
    }

    pub fn from_months(months: i32) -> Self {
        Self::new(0, months, 0.0)
    }

    pub fn from_days(days: f64) -> Self {
        Self::new(0, 0, days)
    }

    /// Day count folded into `[0, 30)` with the carry moved into months
    fn carry_days(years: i32, months: i32, days: f64) -> Self {
        if !days.is_finite() {
            return Self::new(years, months, days);
        }
        let (carry, days) = split_days(days);
        // `as` saturates at the i32 bounds
        Self::new(years, months.saturating_add(carry as i32), days)
    }
}

/// Split a finite day count into whole months and the remainder in `[0, 30)`
pub(crate) fn split_days(days: f64) -> (f64, f64) {
    let mut carry = days.div_euclid(LUNAR_DAYS_PER_MONTH);
    let mut rest = days - carry * LUNAR_DAYS_PER_MONTH;
    if rest >= LUNAR_DAYS_PER_MONTH {
        rest -= LUNAR_DAYS_PER_MONTH;
        carry += 1.0;
    }
    // rounding at large magnitudes can leave the remainder outside the month
    if !(0.0..LUNAR_DAYS_PER_MONTH).contains(&rest) {
        rest = 0.0;
    }
    (carry, rest)
}

impl Add for LunarTimeDelta {
    type Output = LunarTimeDelta;

    fn add(self, other: LunarTimeDelta) -> LunarTimeDelta {
        Self::carry_days(
            self.years.saturating_add(other.years),
            self.months.saturating_add(other.months),
            self.days + other.days,
        )
    }
}

impl Sub for LunarTimeDelta {
    type Output = LunarTimeDelta;

    fn sub(self, other: LunarTimeDelta) -> LunarTimeDelta {
        Self::carry_days(
            self.years.saturating_sub(other.years),
            self.months.saturating_sub(other.months),
            self.days - other.days,
        )
    }
}

impl Neg for LunarTimeDelta {
    type Output = LunarTimeDelta;

    fn neg(self) -> LunarTimeDelta {
        Self::new(self.years.saturating_neg(), self.months.saturating_neg(), -self.days)
    }
}

impl fmt::Display for LunarTimeDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LunarTimeDelta(years={}, months={}, days={})",
            self.years, self.months, self.days
        )
    }
}
