//! Gregorian calendar and Julian day number conversion functions
//!
//! All functions use the proleptic Gregorian calendar. A Julian day number
//! names the day that begins at noon of the returned Julian date, so
//! midnight of a calendar date is `julian_day(..) as f64 - 0.5`.

/// Convert (year, month, day) to Julian day number
///
/// Months outside 1..=12 are folded into the year first.
/// See the Explanatory Supplement to the Astronomical Almanac 15.11.
pub fn julian_day(year: i32, month: u32, day: u32) -> i64 {
    let (year, month) = normalize_month(year, month as i64);
    let janfeb = month <= 2;
    let g = year + 4716 - if janfeb { 1 } else { 0 };
    let f = (month + 9) % 12;
    let e = (1461 * g).div_euclid(4) + day as i64 - 1402;
    let j = e + (153 * f + 2) / 5;

    j + 38 - ((g + 184).div_euclid(100) * 3).div_euclid(4)
}

/// Convert Julian day number to calendar date (year, month, day)
pub fn calendar_date(jd: i64) -> (i32, u32, u32) {
    // See the Explanatory Supplement to the Astronomical Almanac 15.11.
    let f = jd + 1401 + ((4 * jd + 274_277).div_euclid(146_097) * 3).div_euclid(4) - 38;

    let e = 4 * f + 3;
    let g = e.rem_euclid(1461) / 4;
    let h = 5 * g + 2;
    let day = (h % 153) / 5 + 1;
    let month = (h / 153 + 2) % 12 + 1;
    let year = e.div_euclid(1461) - 4716 + (12 + 2 - month) / 12;

    (year as i32, month as u32, day as u32)
}

/// Convert (year, month, fractional day) to a Julian date
pub fn julian_date(year: i32, month: u32, day: f64) -> f64 {
    julian_day(year, month, day.floor() as u32) as f64 - 0.5 + day.fract()
}

/// Format a Julian date as a calendar date string (YYYY-MM-DD)
pub fn format_date(jd: f64) -> String {
    let (year, month, day) = calendar_date((jd + 0.5).floor() as i64);
    format!("{:04}-{:02}-{:02}", year, month, day)
}

fn normalize_month(year: i32, month: i64) -> (i64, i64) {
    let month_0 = month - 1;
    (year as i64 + month_0.div_euclid(12), month_0.rem_euclid(12) + 1)
}
