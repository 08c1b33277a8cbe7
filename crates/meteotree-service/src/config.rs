//! Service configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use meteotree_core::Locale;
use meteotree_types::{LocationConfig, MAX_FORECAST_DAYS, MAX_FORECAST_HOURS, UnitSystem};
use serde::{Deserialize, Serialize};

/// Service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sync cycle settings.
    pub sync: SyncSettings,
    /// Storage settings.
    pub storage: StorageConfig,
    /// Locations to fetch and project.
    #[serde(default)]
    pub locations: Vec<LocationConfig>,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        // Create parent directories if needed
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return any errors.
    ///
    /// This checks:
    /// - Sync interval is within reasonable bounds (1 minute - 1 day)
    /// - Storage path is not empty
    /// - Location names are not empty and coordinates are in range
    /// - Forecast windows fit what the provider can serve
    /// - No two locations sanitize to the same tree root
    ///
    /// # Example
    ///
    /// ```
    /// use meteotree_service::Config;
    ///
    /// let config = Config::default();
    /// config.validate().expect("Default config should be valid");
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        // Validate sync settings
        errors.extend(self.sync.validate());

        // Validate storage config
        errors.extend(self.storage.validate());

        // Validate locations
        let mut seen_slugs = std::collections::HashSet::new();
        for (i, location) in self.locations.iter().enumerate() {
            let prefix = format!("locations[{}]", i);
            errors.extend(validate_location(location, &prefix));

            // Names that differ only in punctuation sanitize to the same root
            let slug = location.slug();
            if !seen_slugs.insert(slug.clone()) {
                errors.push(ValidationError {
                    field: format!("{}.name", prefix),
                    message: format!(
                        "location '{}' collides with an earlier location (both map to tree root '{}')",
                        location.name, slug
                    ),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load and validate configuration from a file.
    ///
    /// This is a convenience method that combines `load()` and `validate()`.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }
}

/// Sync cycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Minutes between sync cycles.
    pub interval_minutes: u64,
    /// Unit system for fetched values and display units.
    pub units: UnitSystem,
    /// Locale for labels and derived texts.
    pub locale: Locale,
}

/// Minimum sync interval in minutes.
pub const MIN_INTERVAL_MINUTES: u64 = 1;
/// Maximum sync interval in minutes (1 day).
pub const MAX_INTERVAL_MINUTES: u64 = 1440;

fn default_interval_minutes() -> u64 {
    30
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
            units: UnitSystem::default(),
            locale: Locale::default(),
        }
    }
}

impl SyncSettings {
    /// The sync interval as a [`Duration`].
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes * 60)
    }

    /// Validate sync settings.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.interval_minutes < MIN_INTERVAL_MINUTES {
            errors.push(ValidationError {
                field: "sync.interval_minutes".to_string(),
                message: format!(
                    "sync interval {} is too short (minimum {} minute)",
                    self.interval_minutes, MIN_INTERVAL_MINUTES
                ),
            });
        } else if self.interval_minutes > MAX_INTERVAL_MINUTES {
            errors.push(ValidationError {
                field: "sync.interval_minutes".to_string(),
                message: format!(
                    "sync interval {} is too long (maximum {} minutes / 1 day)",
                    self.interval_minutes, MAX_INTERVAL_MINUTES
                ),
            });
        }

        errors
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file path.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: meteotree_store::default_db_path(),
        }
    }
}

impl StorageConfig {
    /// Validate storage configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.path.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "storage.path".to_string(),
                message: "database path cannot be empty".to_string(),
            });
        }

        errors
    }
}

/// Validate one location entry.
fn validate_location(location: &LocationConfig, prefix: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    // Name validation
    if location.name.is_empty() {
        errors.push(ValidationError {
            field: format!("{}.name", prefix),
            message: "location name cannot be empty".to_string(),
        });
    }

    // Coordinate validation
    if !location.latitude.is_finite() || !(-90.0..=90.0).contains(&location.latitude) {
        errors.push(ValidationError {
            field: format!("{}.latitude", prefix),
            message: format!(
                "latitude {} is out of range (must be -90 to 90)",
                location.latitude
            ),
        });
    }
    if !location.longitude.is_finite() || !(-180.0..=180.0).contains(&location.longitude) {
        errors.push(ValidationError {
            field: format!("{}.longitude", prefix),
            message: format!(
                "longitude {} is out of range (must be -180 to 180)",
                location.longitude
            ),
        });
    }

    // Timezone validation (if provided)
    if let Some(timezone) = &location.timezone
        && timezone.is_empty()
    {
        errors.push(ValidationError {
            field: format!("{}.timezone", prefix),
            message: "timezone cannot be empty string (use null/omit instead)".to_string(),
        });
    }

    // Forecast window validation
    if location.forecast_days == 0 {
        errors.push(ValidationError {
            field: format!("{}.forecast_days", prefix),
            message: "forecast window must cover at least 1 day".to_string(),
        });
    } else if location.forecast_days > MAX_FORECAST_DAYS {
        errors.push(ValidationError {
            field: format!("{}.forecast_days", prefix),
            message: format!(
                "forecast window {} is too long (maximum {} days)",
                location.forecast_days, MAX_FORECAST_DAYS
            ),
        });
    }
    if location.forecast_hours == 0 {
        errors.push(ValidationError {
            field: format!("{}.forecast_hours", prefix),
            message: "hourly window must cover at least 1 hour".to_string(),
        });
    } else if location.forecast_hours > MAX_FORECAST_HOURS {
        errors.push(ValidationError {
            field: format!("{}.forecast_hours", prefix),
            message: format!(
                "hourly window {} is too long (maximum {} hours)",
                location.forecast_hours, MAX_FORECAST_HOURS
            ),
        });
    }

    errors
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field path (e.g., `sync.interval_minutes` or `locations[0].name`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("meteotree")
        .join("config.toml")
}
