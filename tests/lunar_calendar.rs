//! Conversions between lunar dates and UTC instants

use approx::assert_abs_diff_eq;
use chrono::{DateTime, Duration, TimeZone, Utc};
use lunisolar::planetlib::{Body, Ephemeris};
use lunisolar::search::normalize_to_pm180;
use lunisolar::{AnalyticEphemeris, LunarCalendar, LunarDate};
use rstest::{fixture, rstest};

/// Elongation tolerance for converted instants, in degrees
const ELONGATION_TOLERANCE: f64 = 0.0002;

#[fixture]
fn calendar() -> LunarCalendar<AnalyticEphemeris> {
    LunarCalendar::new(AnalyticEphemeris::new()).unwrap()
}

fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

fn assert_near(actual: DateTime<Utc>, expected: DateTime<Utc>, minutes: i64) {
    assert!(
        (actual - expected).num_minutes().abs() <= minutes,
        "{actual} is not within {minutes} minutes of {expected}"
    );
}

#[rstest]
fn test_full_moon_day(calendar: LunarCalendar<AnalyticEphemeris>) {
    let dt = calendar
        .lunar_date_to_datetime(&LunarDate::new(2016, 1, 15.0).unwrap())
        .unwrap();
    let info = calendar.ephemeris().planetary_info(Body::MoonSun, &dt).unwrap();
    assert_abs_diff_eq!(info.geocentric.longitude, 180.0, epsilon = ELONGATION_TOLERANCE);
    assert_near(dt, utc(2016, 4, 22, 5, 24), 10);
}

#[rstest]
fn test_half_day(calendar: LunarCalendar<AnalyticEphemeris>) {
    let dt = calendar
        .lunar_date_to_datetime(&LunarDate::new(2016, 3, 0.5).unwrap())
        .unwrap();
    let info = calendar.ephemeris().planetary_info(Body::MoonSun, &dt).unwrap();
    assert_abs_diff_eq!(info.geocentric.longitude, 6.0, epsilon = ELONGATION_TOLERANCE);
    assert_near(dt, utc(2016, 6, 5, 13, 26), 10);
}

#[rstest]
#[case(2016, utc(2016, 4, 7, 11, 24))]
#[case(2019, utc(2019, 4, 5, 8, 50))]
fn test_nisan1(calendar: LunarCalendar<AnalyticEphemeris>, #[case] year: i32, #[case] expected: DateTime<Utc>) {
    let start = calendar.nisan1_datetime_for_year(year).unwrap();
    assert_near(start, expected, 5);
    let elongation = calendar.elongation(&start).unwrap();
    assert_abs_diff_eq!(normalize_to_pm180(elongation), 0.0, epsilon = ELONGATION_TOLERANCE);
}

#[rstest]
fn test_leap_month(calendar: LunarCalendar<AnalyticEphemeris>) {
    let dt = calendar
        .lunar_date_to_datetime(&LunarDate::new(2017, 13, 5.0).unwrap())
        .unwrap();
    assert_near(dt, utc(2018, 3, 22, 8, 22), 10);
    assert!(dt < calendar.nisan1_datetime_for_year(2018).unwrap());
}

#[rstest]
fn test_spring_equinox(calendar: LunarCalendar<AnalyticEphemeris>) {
    let equinox = calendar.spring_equinox(2016).unwrap();
    assert_near(equinox, utc(2016, 3, 20, 4, 30), 10);
    let sun = calendar.ephemeris().planetary_info(Body::Sun, &equinox).unwrap();
    assert_abs_diff_eq!(normalize_to_pm180(sun.geocentric.longitude), 0.0, epsilon = 1e-4);
}

#[rstest]
fn test_year_has_listed_month_count(calendar: LunarCalendar<AnalyticEphemeris>) {
    // 13 New Moons separate the starts of a leap year and the year after
    let days = calendar.nisan1_datetime_for_year(2018).unwrap()
        - calendar.nisan1_datetime_for_year(2017).unwrap();
    assert!((380..=386).contains(&days.num_days()), "{} days", days.num_days());

    let days = calendar.nisan1_datetime_for_year(2017).unwrap()
        - calendar.nisan1_datetime_for_year(2016).unwrap();
    assert!((352..=357).contains(&days.num_days()), "{} days", days.num_days());
}

#[rstest]
#[case(LunarDate::new(2016, 1, 15.0).unwrap())]
#[case(LunarDate::new(2016, 3, 0.5).unwrap())]
#[case(LunarDate::new(2017, 13, 5.0).unwrap())]
#[case(LunarDate::new(2017, 1, 29.5).unwrap())]
#[case(LunarDate::new(1950, 6, 10.25).unwrap())]
#[case(LunarDate::new(2050, 2, 22.0).unwrap())]
fn test_datetime_inverts_lunar_date(calendar: LunarCalendar<AnalyticEphemeris>, #[case] date: LunarDate) {
    let dt = calendar.lunar_date_to_datetime(&date).unwrap();
    let back = calendar.datetime_to_lunar_date(&dt).unwrap();
    assert_eq!((back.year(), back.month()), (date.year(), date.month()));
    assert_abs_diff_eq!(back.day(), date.day(), epsilon = 1e-5);
}

#[rstest]
fn test_year_boundary(calendar: LunarCalendar<AnalyticEphemeris>) {
    let start = calendar.nisan1_datetime_for_year(2017).unwrap();

    let before = calendar.datetime_to_lunar_date(&(start - Duration::hours(1))).unwrap();
    assert_eq!((before.year(), before.month()), (2016, 12));
    assert!(before.day() > 29.9);

    let after = calendar.datetime_to_lunar_date(&(start + Duration::hours(1))).unwrap();
    assert_eq!((after.year(), after.month()), (2017, 1));
    assert!(after.day() < 0.1);
}

#[rstest]
fn test_just_after_month_start(calendar: LunarCalendar<AnalyticEphemeris>) {
    let start = calendar.month_start(2017, 13).unwrap();
    let date = calendar
        .datetime_to_lunar_date(&(start + Duration::minutes(1)))
        .unwrap();
    assert_eq!((date.year(), date.month()), (2017, 13));
    assert!(date.day() < 0.01, "day {}", date.day());
}

#[rstest]
fn test_months_are_consecutive_new_moons(calendar: LunarCalendar<AnalyticEphemeris>) {
    let mut previous = calendar.month_start(2015, 1).unwrap();
    for (year, month) in (2..=13).map(|m| (2015, m)).chain((1..=12).map(|m| (2016, m))) {
        let start = calendar.month_start(year, month).unwrap();
        let gap = (start - previous).num_hours();
        assert!((700..=718).contains(&gap), "{year}-{month}: {gap} hours");
        previous = start;
    }
}

#[rstest]
#[case::total_solar_2017(utc(2017, 8, 21, 18, 30), true, false)]
#[case::new_moon_off_node(utc(2017, 9, 20, 5, 30), false, false)]
#[case::total_lunar_2018(utc(2018, 1, 31, 13, 30), false, true)]
#[case::full_moon_off_node(utc(2018, 3, 31, 12, 37), false, false)]
#[case::quarter_moon(utc(2018, 2, 7, 15, 54), false, false)]
fn test_eclipses(
    calendar: LunarCalendar<AnalyticEphemeris>,
    #[case] dt: DateTime<Utc>,
    #[case] solar: bool,
    #[case] lunar: bool,
) {
    assert_eq!(calendar.is_solar_eclipse(&dt).unwrap(), solar);
    assert_eq!(calendar.is_lunar_eclipse(&dt).unwrap(), lunar);
}

#[rstest]
fn test_moon_latitude_matches_eclipse(calendar: LunarCalendar<AnalyticEphemeris>) {
    let info = calendar
        .ephemeris()
        .planetary_info(Body::Moon, &utc(2017, 8, 21, 18, 30))
        .unwrap();
    assert!(info.geocentric.latitude.abs() < 1.0);
}

#[test]
fn test_calendar_over_borrowed_ephemeris() {
    let ephemeris = AnalyticEphemeris::new();
    let calendar = LunarCalendar::new(&ephemeris).unwrap();
    let date = calendar.datetime_to_lunar_date(&utc(2016, 4, 22, 5, 24)).unwrap();
    assert_eq!((date.year(), date.month()), (2016, 1));
    assert_abs_diff_eq!(date.day(), 15.0, epsilon = 0.01);
}
