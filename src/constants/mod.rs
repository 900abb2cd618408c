//! Constants module for calendrical and astronomical calculations

use std::f64::consts::PI;

// Time constants
/// Seconds in a day
pub const DAY_S: f64 = 86_400.0;
/// J2000.0 epoch as Julian date
pub const J2000: f64 = 2_451_545.0;
/// Days in a Julian century
pub const JULIAN_CENTURY: f64 = 36_525.0;
/// Julian date of the Unix epoch (1970-01-01T00:00:00Z)
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

// Angles
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Arcseconds per degree
pub const ASEC_PER_DEG: f64 = 3_600.0;

// Lunar calendar
/// Mean length of the synodic month in days
pub const SYNODIC_MONTH: f64 = 29.530_588_853;
/// Lunar days in every month of the lunar calendar
pub const LUNAR_DAYS_PER_MONTH: f64 = 30.0;
/// Moon-Sun elongation spanned by one lunar day, in degrees
pub const LUNAR_DAY_SPAN_DEG: f64 = 360.0 / LUNAR_DAYS_PER_MONTH;
/// Length of the leap cycle in years
pub const LEAP_CYCLE_YEARS: i32 = 19;
/// Positions (`year mod 19`) of the leap years within the cycle
pub const LEAP_CYCLE_POSITIONS: [i32; 7] = [1, 3, 6, 9, 11, 14, 17];
/// Year whose first month anchors the month count of the calendar
pub const ANCHOR_YEAR: i32 = 2000;
