//! Lunisolar: a New Moon based lunar calendar driven by an ephemeris
//!
//! This crate converts between UTC instants and dates of a lunisolar
//! calendar whose months start at true New Moons and whose days are 12° of
//! Moon-Sun elongation. It also provides the fixed Hebrew calendar used
//! alongside it for annotation.

use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod constants;
pub mod hebrew;
pub mod lunar;
pub mod planetlib;
pub mod search;
pub mod time;

// Re-export commonly used types
pub use hebrew::HebrewDate;
pub use lunar::{LunarCalendar, LunarCalendarConfig, LunarDate, LunarTimeDelta};
pub use planetlib::{AnalyticEphemeris, Body, Ephemeris};

/// Main error type for the lunisolar library
#[derive(Debug, Error)]
pub enum LunisolarError {
    #[error("Time error: {0}")]
    TimeError(#[from] time::TimeError),

    #[error("Ephemeris error: {0}")]
    Planet(#[from] planetlib::PlanetError),

    #[error("Search error: {0}")]
    Search(#[from] search::SearchError),

    #[error("Lunar calendar error: {0}")]
    Lunar(#[from] lunar::LunarError),

    #[error("Hebrew calendar error: {0}")]
    Hebrew(#[from] hebrew::HebrewError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for lunisolar operations
pub type Result<T> = std::result::Result<T, LunisolarError>;

/// Entry point for building a configured lunar calendar
pub struct Loader {
    config_path: Option<PathBuf>,
}

impl Loader {
    /// Create a new loader using the default configuration
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Read the calendar configuration from a JSON file
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Load and validate the configuration
    pub fn load_config(&self) -> Result<LunarCalendarConfig> {
        let config = match &self.config_path {
            Some(path) => LunarCalendarConfig::from_json_file(path)?,
            None => LunarCalendarConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load the built-in analytic ephemeris
    pub fn load_ephemeris(&self) -> Result<AnalyticEphemeris> {
        Ok(AnalyticEphemeris::new())
    }

    /// Build a lunar calendar from the configuration and ephemeris
    pub fn lunar_calendar(&self) -> Result<LunarCalendar<AnalyticEphemeris>> {
        let config = self.load_config()?;
        let ephemeris = self.load_ephemeris()?;
        Ok(LunarCalendar::with_config(ephemeris, config)?)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
