//! Analytic Sun and Moon theory
//!
//! Low-precision solar coordinates and the truncated ELP-2000/82 lunar
//! series as tabulated in Meeus, *Astronomical Algorithms* (2nd ed.),
//! chapters 22, 25 and 47. Accuracy is roughly 0.01° for the Sun and a few
//! thousandths of a degree for the Moon, which is ample for locating New
//! Moons to within a minute or two of time.

use super::{EclipticPosition, Ephemeris, PlanetError, Result};
use crate::constants::{ASEC_PER_DEG, DEG2RAD, J2000, JULIAN_CENTURY};
use crate::search::normalize_degrees;

/// Periodic term: multipliers of D, M, M', F and the coefficient (1e-6 degree)
type Term = (i8, i8, i8, i8, f64);

/// Table 47.A, longitude terms (Σl)
const LONGITUDE_TERMS: [Term; 59] = [
    (0, 0, 1, 0, 6_288_774.0),
    (2, 0, -1, 0, 1_274_027.0),
    (2, 0, 0, 0, 658_314.0),
    (0, 0, 2, 0, 213_618.0),
    (0, 1, 0, 0, -185_116.0),
    (0, 0, 0, 2, -114_332.0),
    (2, 0, -2, 0, 58_793.0),
    (2, -1, -1, 0, 57_066.0),
    (2, 0, 1, 0, 53_322.0),
    (2, -1, 0, 0, 45_758.0),
    (0, 1, -1, 0, -40_923.0),
    (1, 0, 0, 0, -34_720.0),
    (0, 1, 1, 0, -30_383.0),
    (2, 0, 0, -2, 15_327.0),
    (0, 0, 1, 2, -12_528.0),
    (0, 0, 1, -2, 10_980.0),
    (4, 0, -1, 0, 10_675.0),
    (0, 0, 3, 0, 10_034.0),
    (4, 0, -2, 0, 8_548.0),
    (2, 1, -1, 0, -7_888.0),
    (2, 1, 0, 0, -6_766.0),
    (1, 0, -1, 0, -5_163.0),
    (1, 1, 0, 0, 4_987.0),
    (2, -1, 1, 0, 4_036.0),
    (2, 0, 2, 0, 3_994.0),
    (4, 0, 0, 0, 3_861.0),
    (2, 0, -3, 0, 3_665.0),
    (0, 1, -2, 0, -2_689.0),
    (2, 0, -1, 2, -2_602.0),
    (2, -1, -2, 0, 2_390.0),
    (1, 0, 1, 0, -2_348.0),
    (2, -2, 0, 0, 2_236.0),
    (0, 1, 2, 0, -2_120.0),
    (0, 2, 0, 0, -2_069.0),
    (2, -2, -1, 0, 2_048.0),
    (2, 0, 1, -2, -1_773.0),
    (2, 0, 0, 2, -1_595.0),
    (4, -1, -1, 0, 1_215.0),
    (0, 0, 2, 2, -1_110.0),
    (3, 0, -1, 0, -892.0),
    (2, 1, 1, 0, -810.0),
    (4, -1, -2, 0, 759.0),
    (0, 2, -1, 0, -713.0),
    (2, 2, -1, 0, -700.0),
    (2, 1, -2, 0, 691.0),
    (2, -1, 0, -2, 596.0),
    (4, 0, 1, 0, 549.0),
    (0, 0, 4, 0, 537.0),
    (4, -1, 0, 0, 520.0),
    (1, 0, -2, 0, -487.0),
    (2, 1, 0, -2, -399.0),
    (0, 0, 2, -2, -381.0),
    (1, 1, 1, 0, 351.0),
    (3, 0, -2, 0, -340.0),
    (4, 0, -3, 0, 330.0),
    (2, -1, 2, 0, 327.0),
    (0, 2, 1, 0, -323.0),
    (1, 1, -1, 0, 299.0),
    (2, 0, 3, 0, 294.0),
];

/// Table 47.B, latitude terms (Σb), truncated below 800e-6 degree
const LATITUDE_TERMS: [Term; 30] = [
    (0, 0, 0, 1, 5_128_122.0),
    (0, 0, 1, 1, 280_602.0),
    (0, 0, 1, -1, 277_693.0),
    (2, 0, 0, -1, 173_237.0),
    (2, 0, -1, 1, 55_413.0),
    (2, 0, -1, -1, 46_271.0),
    (2, 0, 0, 1, 32_573.0),
    (0, 0, 2, 1, 17_198.0),
    (2, 0, 1, -1, 9_266.0),
    (0, 0, 2, -1, 8_822.0),
    (2, -1, 0, -1, 8_216.0),
    (2, 0, -2, -1, 4_324.0),
    (2, 0, 1, 1, 4_200.0),
    (2, 1, 0, -1, -3_359.0),
    (2, -1, -1, 1, 2_463.0),
    (2, -1, 0, 1, 2_211.0),
    (2, -1, -1, -1, 2_065.0),
    (0, 1, -1, -1, -1_870.0),
    (4, 0, -1, -1, 1_828.0),
    (0, 1, 0, 1, -1_794.0),
    (0, 0, 0, 3, -1_749.0),
    (0, 1, -1, 1, -1_565.0),
    (1, 0, 0, 1, -1_491.0),
    (0, 1, 1, 1, -1_475.0),
    (0, 1, 1, -1, -1_410.0),
    (0, 1, 0, -1, -1_344.0),
    (1, 0, 0, -1, -1_335.0),
    (0, 0, 3, 1, 1_107.0),
    (4, 0, 0, -1, 1_021.0),
    (4, 0, -1, 1, 833.0),
];

/// Fundamental lunar arguments in degrees, for `t` Julian centuries from J2000 (TT)
#[derive(Debug, Clone, Copy)]
struct LunarArguments {
    /// Moon's mean longitude
    l_prime: f64,
    /// Mean elongation
    d: f64,
    /// Sun's mean anomaly
    m: f64,
    /// Moon's mean anomaly
    m_prime: f64,
    /// Argument of latitude
    f: f64,
    a1: f64,
    a2: f64,
    a3: f64,
    /// Eccentricity correction of Earth's orbit
    e: f64,
}

impl LunarArguments {
    fn at(t: f64) -> Self {
        let t2 = t * t;
        let t3 = t2 * t;
        let t4 = t3 * t;
        Self {
            l_prime: 218.316_447_7 + 481_267.881_234_21 * t - 0.001_578_6 * t2 + t3 / 538_841.0
                - t4 / 65_194_000.0,
            d: 297.850_192_1 + 445_267.111_403_4 * t - 0.001_881_9 * t2 + t3 / 545_868.0
                - t4 / 113_065_000.0,
            m: 357.529_109_2 + 35_999.050_290_9 * t - 0.000_153_6 * t2 + t3 / 24_490_000.0,
            m_prime: 134.963_396_4 + 477_198.867_505_5 * t + 0.008_741_4 * t2 + t3 / 69_699.0
                - t4 / 14_712_000.0,
            f: 93.272_095_0 + 483_202.017_523_3 * t - 0.003_653_9 * t2 - t3 / 3_526_000.0
                + t4 / 863_310_000.0,
            a1: 119.75 + 131.849 * t,
            a2: 53.09 + 479_264.290 * t,
            a3: 313.45 + 481_266.484 * t,
            e: 1.0 - 0.002_516 * t - 0.000_007_4 * t2,
        }
    }

    /// Sum of `coefficient * sin(argument)` over a table
    fn sum(&self, terms: &[Term]) -> f64 {
        terms
            .iter()
            .map(|&(d, m, m_prime, f, coefficient)| {
                let argument = d as f64 * self.d
                    + m as f64 * self.m
                    + m_prime as f64 * self.m_prime
                    + f as f64 * self.f;
                let eccentricity = self.e.powi(m.unsigned_abs() as i32);
                coefficient * eccentricity * (argument * DEG2RAD).sin()
            })
            .sum()
    }
}

/// Julian centuries since J2000 (TT)
fn centuries(jd_tt: f64) -> f64 {
    (jd_tt - J2000) / JULIAN_CENTURY
}

/// Nutation in longitude in degrees (Meeus 22, 0.5" accuracy)
fn nutation_in_longitude(t: f64) -> f64 {
    let omega = (125.044_52 - 1_934.136_261 * t) * DEG2RAD;
    let sun_mean = (280.4665 + 36_000.7698 * t) * DEG2RAD;
    let moon_mean = (218.3165 + 481_267.8813 * t) * DEG2RAD;
    let arcsec = -17.20 * omega.sin() - 1.32 * (2.0 * sun_mean).sin()
        - 0.23 * (2.0 * moon_mean).sin()
        + 0.21 * (2.0 * omega).sin();
    arcsec / ASEC_PER_DEG
}

/// Closed-form Sun and Moon ephemeris
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticEphemeris;

impl AnalyticEphemeris {
    pub fn new() -> Self {
        Self
    }
}

fn check_time(jd_tt: f64) -> Result<f64> {
    if jd_tt.is_finite() {
        Ok(centuries(jd_tt))
    } else {
        Err(PlanetError::TimeError(format!("Julian date {jd_tt}")))
    }
}

impl Ephemeris for AnalyticEphemeris {
    fn sun(&self, jd_tt: f64) -> Result<EclipticPosition> {
        let t = check_time(jd_tt)?;
        let mean_longitude = 280.466_46 + 36_000.769_83 * t + 0.000_303_2 * t * t;
        let mean_anomaly = (357.529_11 + 35_999.050_29 * t - 0.000_153_7 * t * t) * DEG2RAD;
        let center = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * mean_anomaly.sin()
            + (0.019_993 - 0.000_101 * t) * (2.0 * mean_anomaly).sin()
            + 0.000_289 * (3.0 * mean_anomaly).sin();
        let omega = (125.04 - 1_934.136 * t) * DEG2RAD;

        // Aberration and nutation folded in, as in Meeus 25.8
        let apparent = mean_longitude + center - 0.005_69 - 0.004_78 * omega.sin();
        Ok(EclipticPosition {
            longitude: normalize_degrees(apparent),
            latitude: 0.0,
        })
    }

    fn moon(&self, jd_tt: f64) -> Result<EclipticPosition> {
        let t = check_time(jd_tt)?;
        let args = LunarArguments::at(t);

        let sigma_l = args.sum(&LONGITUDE_TERMS)
            + 3_958.0 * (args.a1 * DEG2RAD).sin()
            + 1_962.0 * ((args.l_prime - args.f) * DEG2RAD).sin()
            + 318.0 * (args.a2 * DEG2RAD).sin();

        let sigma_b = args.sum(&LATITUDE_TERMS) - 2_235.0 * (args.l_prime * DEG2RAD).sin()
            + 382.0 * (args.a3 * DEG2RAD).sin()
            + 175.0 * ((args.a1 - args.f) * DEG2RAD).sin()
            + 175.0 * ((args.a1 + args.f) * DEG2RAD).sin()
            + 127.0 * ((args.l_prime - args.m_prime) * DEG2RAD).sin()
            - 115.0 * ((args.l_prime + args.m_prime) * DEG2RAD).sin();

        let longitude = args.l_prime + sigma_l / 1e6 + nutation_in_longitude(t);
        Ok(EclipticPosition {
            longitude: normalize_degrees(longitude),
            latitude: sigma_b / 1e6,
        })
    }
}
