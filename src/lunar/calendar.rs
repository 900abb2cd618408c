//! Conversions between lunar dates and UTC instants

use super::config::LunarCalendarConfig;
use super::date::{months_in_year, LunarDate, MONTHS_PER_CYCLE};
use super::{LunarError, Result};
use crate::constants::{
    ANCHOR_YEAR, LEAP_CYCLE_YEARS, LUNAR_DAYS_PER_MONTH, LUNAR_DAY_SPAN_DEG, SYNODIC_MONTH,
};
use crate::planetlib::{self, Body, Ephemeris};
use crate::search::{find_angle_crossing, normalize_to_pm180};
use crate::time::{calendar, datetime_to_jd, gregorian_midnight_jd, jd_to_datetime};
use chrono::{DateTime, Utc};

/// A New Moon is searched for from this many days before its mean date
const NEW_MOON_MARGIN_DAYS: f64 = 3.0;

/// Length of the window scanned for a New Moon around its mean date
const NEW_MOON_WINDOW_DAYS: f64 = 7.0;

/// Year starts tried before giving up on bracketing an instant
const MAX_YEAR_STEPS: usize = 4;

/// Lunar calendar bound to an ephemeris
///
/// Month boundaries are true New Moons. They are numbered from the anchor,
/// the first New Moon at or after the March equinox of 2000, and each lunar
/// year starts at the New Moon whose number equals the count of months in
/// the preceding years of the 12/13-month cycle. The numbering therefore
/// always agrees with [`months_in_year`].
#[derive(Debug, Clone)]
pub struct LunarCalendar<E: Ephemeris> {
    ephemeris: E,
    config: LunarCalendarConfig,
    /// Julian date (UT) of New Moon number 0
    anchor_jd: f64,
}

impl<E: Ephemeris> LunarCalendar<E> {
    /// Creates a calendar with the default configuration
    pub fn new(ephemeris: E) -> Result<Self> {
        Self::with_config(ephemeris, LunarCalendarConfig::default())
    }

    /// Creates a calendar, locating its anchor New Moon with `ephemeris`
    ///
    /// Fails with [`LunarError::Search`] or [`LunarError::InvalidConfig`]
    /// if `config` does not pass [`LunarCalendarConfig::validate`].
    pub fn with_config(ephemeris: E, config: LunarCalendarConfig) -> Result<Self> {
        config.validate()?;
        let mut lunar = Self {
            ephemeris,
            config,
            anchor_jd: f64::NAN,
        };
        let equinox = lunar.spring_equinox_jd(ANCHOR_YEAR)?;
        lunar.anchor_jd = lunar.next_new_moon_jd(equinox)?;
        log::info!(
            "lunar calendar anchored at New Moon JD {:.6} ({})",
            lunar.anchor_jd,
            calendar::format_date(lunar.anchor_jd)
        );
        Ok(lunar)
    }

    pub fn ephemeris(&self) -> &E {
        &self.ephemeris
    }

    pub fn config(&self) -> &LunarCalendarConfig {
        &self.config
    }

    /// Moon-Sun elongation in [0, 360) at the given instant
    pub fn elongation(&self, dt: &DateTime<Utc>) -> Result<f64> {
        Ok(self.elongation_jd(datetime_to_jd(dt))?)
    }

    /// The March equinox of a Gregorian year
    pub fn spring_equinox(&self, year: i32) -> Result<DateTime<Utc>> {
        Ok(jd_to_datetime(self.spring_equinox_jd(year)?)?)
    }

    /// The instant lunar `year` begins (the New Moon starting month 1)
    pub fn nisan1_datetime_for_year(&self, year: i32) -> Result<DateTime<Utc>> {
        Ok(jd_to_datetime(self.year_start_jd(year)?)?)
    }

    /// The New Moon that starts the given month
    pub fn month_start(&self, year: i32, month: u8) -> Result<DateTime<Utc>> {
        let date = LunarDate::new(year, month, 0.0)?;
        Ok(jd_to_datetime(self.month_start_jd(&date)?)?)
    }

    /// The instant of a lunar date
    ///
    /// The day is normalized into `[0, 30)` first, so unnormalized days
    /// roll into later months.
    pub fn lunar_date_to_datetime(&self, date: &LunarDate) -> Result<DateTime<Utc>> {
        Ok(jd_to_datetime(self.lunar_date_to_jd(date)?)?)
    }

    /// The lunar date of an instant
    pub fn datetime_to_lunar_date(&self, dt: &DateTime<Utc>) -> Result<LunarDate> {
        self.jd_to_lunar_date(datetime_to_jd(dt))
    }

    /// Whether `dt` falls at a New Moon close enough to a lunar node for a solar eclipse
    pub fn is_solar_eclipse(&self, dt: &DateTime<Utc>) -> Result<bool> {
        self.is_eclipse(dt, 0.0, self.config.solar_eclipse_limit_deg)
    }

    /// Whether `dt` falls at a Full Moon close enough to a lunar node for an umbral lunar eclipse
    pub fn is_lunar_eclipse(&self, dt: &DateTime<Utc>) -> Result<bool> {
        self.is_eclipse(dt, 180.0, self.config.lunar_eclipse_limit_deg)
    }

    fn is_eclipse(&self, dt: &DateTime<Utc>, syzygy_deg: f64, limit_deg: f64) -> Result<bool> {
        let jd = datetime_to_jd(dt);
        let offset = normalize_to_pm180(self.elongation_jd(jd)? - syzygy_deg);
        if offset.abs() > self.config.syzygy_orb_deg {
            return Ok(false);
        }
        let latitude = self.ephemeris.position_ut(Body::Moon, jd)?.latitude;
        log::debug!("syzygy {syzygy_deg}° at JD {jd:.6}: offset {offset:.4}°, lunar latitude {latitude:.4}°");
        Ok(latitude.abs() <= limit_deg)
    }

    fn elongation_jd(&self, jd_ut: f64) -> planetlib::Result<f64> {
        Ok(self.ephemeris.position_ut(Body::MoonSun, jd_ut)?.longitude)
    }

    fn sun_longitude_jd(&self, jd_ut: f64) -> planetlib::Result<f64> {
        Ok(self.ephemeris.position_ut(Body::Sun, jd_ut)?.longitude)
    }

    fn steps_for(&self, window_days: f64) -> usize {
        (window_days / self.config.search.step_days).ceil() as usize
    }

    fn spring_equinox_jd(&self, year: i32) -> Result<f64> {
        let start = gregorian_midnight_jd(year, 3, 1)?;
        let jd = find_angle_crossing(
            |t| Ok(self.sun_longitude_jd(t)?),
            0.0,
            start,
            self.steps_for(31.0),
            &self.config.search,
        )?;
        log::trace!("March equinox {year} at JD {jd:.6}");
        Ok(jd)
    }

    /// First New Moon at or after `start`
    fn next_new_moon_jd(&self, start: f64) -> Result<f64> {
        Ok(find_angle_crossing(
            |t| Ok(self.elongation_jd(t)?),
            0.0,
            start,
            self.steps_for(SYNODIC_MONTH + 2.0),
            &self.config.search,
        )?)
    }

    /// New Moon number `index`, counted from the anchor
    fn new_moon_jd(&self, index: i64) -> Result<f64> {
        let mean = self.anchor_jd + index as f64 * SYNODIC_MONTH;
        let jd = find_angle_crossing(
            |t| Ok(self.elongation_jd(t)?),
            0.0,
            mean - NEW_MOON_MARGIN_DAYS,
            self.steps_for(NEW_MOON_WINDOW_DAYS),
            &self.config.search,
        )?;
        log::trace!("New Moon #{index} at JD {jd:.6}");
        Ok(jd)
    }

    fn year_start_jd(&self, year: i32) -> Result<f64> {
        self.new_moon_jd(months_before(year))
    }

    fn month_start_jd(&self, date: &LunarDate) -> Result<f64> {
        self.new_moon_jd(months_before(date.year()) + date.month() as i64 - 1)
    }

    fn lunar_date_to_jd(&self, date: &LunarDate) -> Result<f64> {
        let date = date.normalized()?;
        let start = self.month_start_jd(&date)?;
        if date.day() == 0.0 {
            return Ok(start);
        }

        // The elongation right at the New Moon may read just under 360°, so
        // early days are searched from slightly before it. Late days must
        // not start early, or they would match the end of the previous month.
        let from = if date.day() < LUNAR_DAYS_PER_MONTH / 2.0 {
            start - self.config.search.step_days
        } else {
            start
        };
        let jd = find_angle_crossing(
            |t| Ok(self.elongation_jd(t)?),
            date.day() * LUNAR_DAY_SPAN_DEG,
            from,
            self.steps_for(SYNODIC_MONTH + 2.0),
            &self.config.search,
        )?;
        log::debug!("{date} is JD {jd:.6}");
        Ok(jd)
    }

    fn jd_to_lunar_date(&self, jd: f64) -> Result<LunarDate> {
        let (mut year, _, _) = calendar::calendar_date((jd + 0.5).floor() as i64);
        let mut year_start = self.year_start_jd(year)?;

        let mut steps = 0;
        while jd < year_start {
            steps += 1;
            if steps > MAX_YEAR_STEPS {
                return Err(LunarError::YearOutOfRange(year as i64));
            }
            year -= 1;
            year_start = self.year_start_jd(year)?;
        }
        loop {
            steps += 1;
            if steps > MAX_YEAR_STEPS {
                return Err(LunarError::YearOutOfRange(year as i64));
            }
            let next_start = self.year_start_jd(year + 1)?;
            if jd < next_start {
                break;
            }
            year += 1;
            year_start = next_start;
        }
        log::debug!("JD {jd:.6} is in lunar year {year} starting JD {year_start:.6}");

        let first = months_before(year);
        let months = months_in_year(year) as i64;
        let mut index = (((jd - year_start) / SYNODIC_MONTH).floor() as i64).clamp(0, months - 1);
        let mut month_start = self.new_moon_jd(first + index)?;
        while index > 0 && jd < month_start {
            index -= 1;
            month_start = self.new_moon_jd(first + index)?;
        }
        while index + 1 < months {
            let next = self.new_moon_jd(first + index + 1)?;
            if jd < next {
                break;
            }
            index += 1;
            month_start = next;
        }

        let elongation = self.elongation_jd(jd)?;
        // Just after the New Moon the elongation can still read as ~360°
        let day = if elongation > 360.0 - LUNAR_DAY_SPAN_DEG / 2.0 && jd - month_start < 1.0 {
            0.0
        } else {
            elongation / LUNAR_DAY_SPAN_DEG
        };

        LunarDate::new(year, index as u8 + 1, day)
    }
}

/// Number of months from the start of the anchor year to the start of `year`
///
/// Negative for years before the anchor.
pub(crate) fn months_before(year: i32) -> i64 {
    let offset = year as i64 - ANCHOR_YEAR as i64;
    let cycles = offset.div_euclid(LEAP_CYCLE_YEARS as i64);
    let rest = offset.rem_euclid(LEAP_CYCLE_YEARS as i64) as i32;
    let partial: i64 = (0..rest)
        .map(|k| months_in_year(ANCHOR_YEAR + k) as i64)
        .sum();
    cycles * MONTHS_PER_CYCLE + partial
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planetlib::AnalyticEphemeris;
    use crate::search::SearchError;
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;

    fn calendar() -> LunarCalendar<AnalyticEphemeris> {
        LunarCalendar::new(AnalyticEphemeris).unwrap()
    }

    #[test]
    fn test_months_before() {
        assert_eq!(months_before(2000), 0);
        assert_eq!(months_before(2001), 12);
        assert_eq!(months_before(2002), 25);
        assert_eq!(months_before(2019), 235);
        assert_eq!(months_before(1999), -12);
        assert_eq!(months_before(1981), -235);
    }

    #[test]
    fn test_months_before_is_cumulative() {
        for year in 1950..2050 {
            assert_eq!(
                months_before(year + 1) - months_before(year),
                months_in_year(year) as i64,
                "year {year}"
            );
        }
    }

    #[test]
    fn test_anchor_new_moon() {
        // New Moon of 2000-04-04 18:12 UTC
        let cal = calendar();
        let expected = Utc.with_ymd_and_hms(2000, 4, 4, 18, 12, 0).unwrap();
        let anchor = jd_to_datetime(cal.anchor_jd).unwrap();
        assert!((anchor - expected).num_minutes().abs() <= 5, "anchor {anchor}");
    }

    #[test]
    fn test_with_config_rejects_unusable_step() {
        for step_days in [0.0, f64::NAN] {
            let mut config = LunarCalendarConfig::default();
            config.search.step_days = step_days;
            let err = LunarCalendar::with_config(AnalyticEphemeris, config).unwrap_err();
            assert!(
                matches!(err, LunarError::Search(SearchError::InvalidConfig(_))),
                "step_days {step_days}: {err}"
            );
        }
    }

    #[test]
    fn test_with_config_rejects_bad_eclipse_limit() {
        let config = LunarCalendarConfig {
            lunar_eclipse_limit_deg: -1.0,
            ..LunarCalendarConfig::default()
        };
        assert!(matches!(
            LunarCalendar::with_config(AnalyticEphemeris, config),
            Err(LunarError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_month_start_elongation_is_zero() {
        let cal = calendar();
        let start = cal.month_start(2016, 6).unwrap();
        let elongation = cal.elongation(&start).unwrap();
        assert_abs_diff_eq!(normalize_to_pm180(elongation), 0.0, epsilon = 0.0002);
    }

    #[test]
    fn test_month_start_rejects_invalid_month() {
        let cal = calendar();
        assert!(matches!(
            cal.month_start(2016, 13),
            Err(LunarError::InvalidMonth { .. })
        ));
    }

    #[test]
    fn test_unnormalized_day_rolls_forward() {
        let cal = calendar();
        let a = cal
            .lunar_date_to_datetime(&LunarDate::new(2016, 12, 35.0).unwrap())
            .unwrap();
        let b = cal
            .lunar_date_to_datetime(&LunarDate::new(2017, 1, 5.0).unwrap())
            .unwrap();
        assert!((a - b).num_milliseconds().abs() <= 1);
    }

    #[test]
    fn test_last_lunar_day_stays_in_month() {
        let cal = calendar();
        let date = LunarDate::new(2016, 12, 29.9).unwrap();
        let dt = cal.lunar_date_to_datetime(&date).unwrap();
        assert!(dt < cal.nisan1_datetime_for_year(2017).unwrap());
        assert!(dt > cal.month_start(2016, 12).unwrap());
    }
}
