//! Lunar calendar configuration

use super::LunarError;
use crate::search::SearchConfig;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable parameters of a [`LunarCalendar`](super::LunarCalendar)
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```
/// use lunisolar::lunar::LunarCalendarConfig;
///
/// let config = LunarCalendarConfig::from_json_str(r#"{"syzygy_orb_deg": 3.0}"#).unwrap();
/// assert_eq!(config.syzygy_orb_deg, 3.0);
/// assert_eq!(config.search.step_days, 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LunarCalendarConfig {
    /// Root-finding parameters for New Moon, equinox and lunar day searches
    pub search: SearchConfig,
    /// How far from exact conjunction/opposition (degrees of elongation) an
    /// instant may be and still count as the syzygy of an eclipse
    pub syzygy_orb_deg: f64,
    /// Largest lunar latitude (degrees) at New Moon that still yields a solar eclipse
    pub solar_eclipse_limit_deg: f64,
    /// Largest lunar latitude (degrees) at Full Moon that still yields an umbral lunar eclipse
    pub lunar_eclipse_limit_deg: f64,
}

impl Default for LunarCalendarConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            syzygy_orb_deg: 6.0,
            solar_eclipse_limit_deg: 1.58,
            lunar_eclipse_limit_deg: 1.03,
        }
    }
}

impl LunarCalendarConfig {
    /// Parse a configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        log::debug!("loaded lunar calendar config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Check that the parameters can drive a search
    ///
    /// [`LunarCalendar::with_config`](super::LunarCalendar::with_config)
    /// calls this before any search runs.
    pub fn validate(&self) -> super::Result<()> {
        self.search.validate()?;
        for (name, value) in [
            ("syzygy_orb_deg", self.syzygy_orb_deg),
            ("solar_eclipse_limit_deg", self.solar_eclipse_limit_deg),
            ("lunar_eclipse_limit_deg", self.lunar_eclipse_limit_deg),
        ] {
            if !(0.0..=180.0).contains(&value) {
                return Err(LunarError::InvalidConfig(format!(
                    "{name} must be within 0..=180, got {value}"
                )));
            }
        }
        Ok(())
    }
}
