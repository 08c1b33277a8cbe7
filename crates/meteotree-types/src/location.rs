//! Location configuration and the unit system toggle.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest forecast window, in days, a location may request.
pub const MAX_FORECAST_DAYS: u8 = 16;

/// Largest hourly forecast window a location may request.
pub const MAX_FORECAST_HOURS: u16 = 384;

/// Measurement system used for fetched values and display units.
///
/// The unit system is global to the engine, not per location: every fetched
/// snapshot and every unit in point metadata follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum UnitSystem {
    /// Celsius, millimetres, km/h.
    #[default]
    Metric,
    /// Fahrenheit, inches, mph.
    Imperial,
}

impl UnitSystem {
    /// Lowercase name as used in configuration files.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured location to fetch and project into the state tree.
///
/// `forecast_hours` and the air-quality subtree are produced only when the
/// corresponding flag is on; the reconciliation pass removes their subtrees
/// once a flag is turned off.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocationConfig {
    /// Display name; its sanitized form is the state-tree subtree root.
    pub name: String,
    /// Latitude in decimal degrees, positive north.
    pub latitude: f64,
    /// Longitude in decimal degrees, positive east.
    pub longitude: f64,
    /// IANA timezone for local times; provider default when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub timezone: Option<String>,
    /// Fetch and project the air-quality subtree.
    #[cfg_attr(feature = "serde", serde(default))]
    pub air_quality: bool,
    /// Fetch and project the hourly forecast subtree.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hourly_forecast: bool,
    /// Number of forecast days to keep (`day0..day<N-1>`).
    #[cfg_attr(feature = "serde", serde(default = "default_forecast_days"))]
    pub forecast_days: u8,
    /// Number of hourly entries to keep (`hour0..hour<N-1>`).
    #[cfg_attr(feature = "serde", serde(default = "default_forecast_hours"))]
    pub forecast_hours: u16,
}

fn default_forecast_days() -> u8 {
    7
}

fn default_forecast_hours() -> u16 {
    24
}

impl LocationConfig {
    /// A location with default windows and all optional subtrees off.
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            timezone: None,
            air_quality: false,
            hourly_forecast: false,
            forecast_days: default_forecast_days(),
            forecast_hours: default_forecast_hours(),
        }
    }

    /// Toggle the air-quality subtree.
    #[must_use]
    pub fn with_air_quality(mut self, enabled: bool) -> Self {
        self.air_quality = enabled;
        self
    }

    /// Toggle the hourly forecast subtree.
    #[must_use]
    pub fn with_hourly_forecast(mut self, enabled: bool) -> Self {
        self.hourly_forecast = enabled;
        self
    }

    /// Set the forecast window in days.
    #[must_use]
    pub fn with_forecast_days(mut self, days: u8) -> Self {
        self.forecast_days = days;
        self
    }

    /// Set the hourly forecast window.
    #[must_use]
    pub fn with_forecast_hours(mut self, hours: u16) -> Self {
        self.forecast_hours = hours;
        self
    }

    /// Set the IANA timezone.
    #[must_use]
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// The state-tree root segment for this location.
    ///
    /// Every character outside the identifier charset (alphanumerics and
    /// `_`) is replaced with `_`, so the result is always a valid
    /// [`PointId`](crate::PointId) segment for a non-empty name.
    ///
    /// # Examples
    ///
    /// ```
    /// use meteotree_types::LocationConfig;
    ///
    /// let loc = LocationConfig::new("New York (JFK)", 40.64, -73.78);
    /// assert_eq!(loc.slug(), "New_York__JFK_");
    /// ```
    #[must_use]
    pub fn slug(&self) -> String {
        if self.name.is_empty() {
            return "_".to_string();
        }
        self.name
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect()
    }
}
