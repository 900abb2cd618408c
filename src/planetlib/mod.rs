//! Planetary ephemeris module
//!
//! The lunar calendar only needs the apparent geocentric tropical
//! longitudes of the Sun and Moon (plus the Moon's latitude for eclipse
//! checks). The [`Ephemeris`] trait is the seam through which those
//! positions are queried; [`AnalyticEphemeris`] is the built-in
//! implementation.

pub mod analytic;

pub use analytic::AnalyticEphemeris;

use crate::search::normalize_degrees;
use crate::time::{datetime_to_jd, ut_to_tt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for planetary calculations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanetError {
    #[error("Planet not found: {0}")]
    NotFound(String),

    #[error("Invalid time: {0}")]
    TimeError(String),
}

/// Result type for planetary calculations
pub type Result<T> = std::result::Result<T, PlanetError>;

/// Bodies the ephemeris can be queried for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Body {
    Sun,
    Moon,
    /// Composite body: the Moon's position measured from the Sun
    MoonSun,
}

impl Body {
    /// Get the body's name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::MoonSun => "MoonSun",
        }
    }

    /// Short body code as used in chart scripts
    pub fn code(&self) -> &'static str {
        match self {
            Body::Sun => "Su",
            Body::Moon => "Mo",
            Body::MoonSun => "MoSu",
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Body {
    type Err = PlanetError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Su" | "Sun" => Ok(Body::Sun),
            "Mo" | "Moon" => Ok(Body::Moon),
            "MoSu" | "MoonSun" => Ok(Body::MoonSun),
            other => Err(PlanetError::NotFound(other.to_string())),
        }
    }
}

/// Ecliptic coordinates of date, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EclipticPosition {
    /// Tropical longitude in [0, 360)
    pub longitude: f64,
    pub latitude: f64,
}

/// Result of a planetary query at a UTC instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetaryInfo {
    pub body: Body,
    /// Julian date (UT) of the query
    pub jd_ut: f64,
    /// Apparent geocentric tropical position
    pub geocentric: EclipticPosition,
}

/// A source of apparent geocentric Sun and Moon positions
///
/// Implementors take Julian dates in Terrestrial Time and return positions
/// referred to the true equinox of date.
pub trait Ephemeris {
    fn sun(&self, jd_tt: f64) -> Result<EclipticPosition>;

    fn moon(&self, jd_tt: f64) -> Result<EclipticPosition>;

    /// Position of any [`Body`], deriving the composite bodies
    fn position(&self, body: Body, jd_tt: f64) -> Result<EclipticPosition> {
        match body {
            Body::Sun => self.sun(jd_tt),
            Body::Moon => self.moon(jd_tt),
            Body::MoonSun => {
                let moon = self.moon(jd_tt)?;
                let sun = self.sun(jd_tt)?;
                Ok(EclipticPosition {
                    longitude: normalize_degrees(moon.longitude - sun.longitude),
                    latitude: moon.latitude - sun.latitude,
                })
            }
        }
    }

    /// Position of `body` at a Julian date in UT
    fn position_ut(&self, body: Body, jd_ut: f64) -> Result<EclipticPosition> {
        if !jd_ut.is_finite() {
            return Err(PlanetError::TimeError(format!("Julian date {jd_ut}")));
        }
        self.position(body, ut_to_tt(jd_ut))
    }

    /// Position of `body` at a UTC instant
    fn planetary_info(&self, body: Body, dt: &DateTime<Utc>) -> Result<PlanetaryInfo> {
        let jd_ut = datetime_to_jd(dt);
        Ok(PlanetaryInfo {
            body,
            jd_ut,
            geocentric: self.position_ut(body, jd_ut)?,
        })
    }
}

impl<E: Ephemeris + ?Sized> Ephemeris for &E {
    fn sun(&self, jd_tt: f64) -> Result<EclipticPosition> {
        (**self).sun(jd_tt)
    }

    fn moon(&self, jd_tt: f64) -> Result<EclipticPosition> {
        (**self).moon(jd_tt)
    }
}
