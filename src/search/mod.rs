//! Bounded root finding over time
//!
//! Every search here has an explicit step size, convergence tolerance and
//! iteration cap, and returns an error instead of running on when they are
//! exhausted.

use crate::planetlib::PlanetError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for searches
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SearchError {
    #[error("No convergence after {iterations} iterations (bracket width {width} days)")]
    NoConvergence { iterations: usize, width: f64 },

    #[error("No crossing of {target_deg}° within {steps} steps from JD {start}")]
    NoCrossing {
        target_deg: f64,
        start: f64,
        steps: usize,
    },

    #[error("Function does not change sign between JD {lo} and JD {hi}")]
    InvalidBracket { lo: f64, hi: f64 },

    #[error("Invalid search configuration: {0}")]
    InvalidConfig(String),

    #[error("Ephemeris error: {0}")]
    Ephemeris(#[from] PlanetError),
}

/// Result type for searches
pub type Result<T> = std::result::Result<T, SearchError>;

/// Smallest scan step accepted, in days
pub const MIN_STEP_DAYS: f64 = 1e-3;

/// Largest scan step accepted, in days; the elongation must not move more
/// than half a turn between samples
pub const MAX_STEP_DAYS: f64 = 5.0;

/// Step and convergence parameters for time searches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Step used to scan for a sign change, in days
    pub step_days: f64,
    /// Bisection stops once the bracket is narrower than this, in days
    pub tolerance_days: f64,
    /// Bisection iteration cap
    pub max_iterations: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            step_days: 0.5,
            tolerance_days: 1e-8,
            max_iterations: 64,
        }
    }
}

impl SearchConfig {
    /// Check that searches driven by this configuration terminate
    pub fn validate(&self) -> Result<()> {
        if !(MIN_STEP_DAYS..=MAX_STEP_DAYS).contains(&self.step_days) {
            return Err(SearchError::InvalidConfig(format!(
                "step_days must be within {MIN_STEP_DAYS}..={MAX_STEP_DAYS}, got {}",
                self.step_days
            )));
        }
        if !(self.tolerance_days > 0.0 && self.tolerance_days < self.step_days) {
            return Err(SearchError::InvalidConfig(format!(
                "tolerance_days must be in (0, step_days), got {}",
                self.tolerance_days
            )));
        }
        if self.max_iterations == 0 {
            return Err(SearchError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Normalize an angle in degrees to [0, 360)
pub fn normalize_degrees(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Normalize an angle in degrees to [-180, 180)
pub fn normalize_to_pm180(deg: f64) -> f64 {
    let r = normalize_degrees(deg);
    if r >= 180.0 {
        r - 360.0
    } else {
        r
    }
}

/// Find a root of `f` in `[lo, hi]` by bisection
///
/// `f(lo)` and `f(hi)` must have opposite signs (or one must be zero).
pub fn bisect<F>(mut f: F, lo: f64, hi: f64, config: &SearchConfig) -> Result<f64>
where
    F: FnMut(f64) -> Result<f64>,
{
    config.validate()?;
    let (mut lo, mut hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let f_lo = f(lo)?;
    if f_lo == 0.0 {
        return Ok(lo);
    }
    let f_hi = f(hi)?;
    if f_hi == 0.0 {
        return Ok(hi);
    }
    if (f_lo < 0.0) == (f_hi < 0.0) {
        return Err(SearchError::InvalidBracket { lo, hi });
    }

    let lo_negative = f_lo < 0.0;
    for iteration in 0..config.max_iterations {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid)?;
        if f_mid == 0.0 {
            log::trace!("bisection hit exact root at JD {mid} after {iteration} iterations");
            return Ok(mid);
        }
        if (f_mid < 0.0) == lo_negative {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo < config.tolerance_days {
            log::trace!("bisection converged at JD {} after {} iterations", 0.5 * (lo + hi), iteration + 1);
            return Ok(0.5 * (lo + hi));
        }
    }

    Err(SearchError::NoConvergence {
        iterations: config.max_iterations,
        width: hi - lo,
    })
}

/// Find the first time at or after `start` where the angle `f(t)` reaches `target_deg`
///
/// The scan advances by `config.step_days` for at most `max_steps` steps and
/// looks for `normalize_to_pm180(f(t) - target_deg)` rising through zero.
/// A jump across ±180° is a wrap, not a crossing. `f` must be increasing
/// near the crossing, as the Moon-Sun elongation and the Sun's longitude are.
pub fn find_angle_crossing<F>(
    mut f: F,
    target_deg: f64,
    start: f64,
    max_steps: usize,
    config: &SearchConfig,
) -> Result<f64>
where
    F: FnMut(f64) -> Result<f64>,
{
    config.validate()?;
    let mut offset = |t: f64| -> Result<f64> { Ok(normalize_to_pm180(f(t)? - target_deg)) };

    let mut t0 = start;
    let mut v0 = offset(t0)?;
    if v0 == 0.0 {
        return Ok(t0);
    }

    for _ in 0..max_steps {
        let t1 = t0 + config.step_days;
        let v1 = offset(t1)?;
        if v0 < 0.0 && v1 >= 0.0 && v1 - v0 < 180.0 {
            return bisect(&mut offset, t0, t1, config);
        }
        t0 = t1;
        v0 = v1;
    }

    Err(SearchError::NoCrossing {
        target_deg,
        start,
        steps: max_steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-10.0), 350.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-1e-18), 0.0);
    }

    #[test]
    fn test_normalize_to_pm180() {
        assert_eq!(normalize_to_pm180(190.0), -170.0);
        assert_eq!(normalize_to_pm180(-190.0), 170.0);
        assert_eq!(normalize_to_pm180(180.0), -180.0);
        assert_eq!(normalize_to_pm180(45.0), 45.0);
    }

    #[test]
    fn test_bisect_linear() {
        let root = bisect(|t| Ok(t - 2.25), 0.0, 10.0, &SearchConfig::default()).unwrap();
        assert_abs_diff_eq!(root, 2.25, epsilon = 1e-8);
    }

    #[test]
    fn test_bisect_invalid_bracket() {
        let err = bisect(|t| Ok(t * t + 1.0), -1.0, 1.0, &SearchConfig::default()).unwrap_err();
        assert_eq!(err, SearchError::InvalidBracket { lo: -1.0, hi: 1.0 });
    }

    #[test]
    fn test_bisect_iteration_cap() {
        let config = SearchConfig {
            max_iterations: 5,
            ..SearchConfig::default()
        };
        let err = bisect(|t| Ok(t - 0.3), 0.0, 1.0, &config).unwrap_err();
        assert!(matches!(err, SearchError::NoConvergence { iterations: 5, .. }));
    }

    #[test]
    fn test_angle_crossing_across_wrap() {
        // Angle advancing 12°/day, starting at 300°: reaches 6° after 5.5 days
        let angle = |t: f64| Ok(normalize_degrees(300.0 + 12.0 * t));
        let t = find_angle_crossing(angle, 6.0, 0.0, 40, &SearchConfig::default()).unwrap();
        assert_abs_diff_eq!(t, 5.5, epsilon = 1e-7);
    }

    #[test]
    fn test_angle_crossing_skips_opposite_wrap() {
        // Target 0° while starting at 170°: the jump at 180° is not a crossing
        let angle = |t: f64| Ok(normalize_degrees(170.0 + 12.0 * t));
        let t = find_angle_crossing(angle, 0.0, 0.0, 40, &SearchConfig::default()).unwrap();
        assert_abs_diff_eq!(t, 190.0 / 12.0, epsilon = 1e-7);
    }

    #[test]
    fn test_validate_rejects_unusable_steps() {
        for step_days in [0.0, -0.5, f64::NAN, f64::INFINITY, 1e-9, 30.0] {
            let config = SearchConfig {
                step_days,
                ..SearchConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(SearchError::InvalidConfig(_))),
                "step_days {step_days}"
            );
        }

        let config = SearchConfig {
            tolerance_days: f64::NAN,
            ..SearchConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_angle_crossing_rejects_zero_step() {
        let config = SearchConfig {
            step_days: 0.0,
            ..SearchConfig::default()
        };
        let angle = |t: f64| Ok(normalize_degrees(12.0 * t));
        let err = find_angle_crossing(angle, 6.0, 0.0, usize::MAX, &config).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));
    }

    #[test]
    fn test_angle_crossing_step_cap() {
        let angle = |_t: f64| Ok(90.0);
        let err = find_angle_crossing(angle, 0.0, 0.0, 10, &SearchConfig::default()).unwrap_err();
        assert!(matches!(err, SearchError::NoCrossing { steps: 10, .. }));
    }
}
