//! Background sync daemon projecting Open-Meteo data into a local state tree.
//!
//! This crate provides a service that:
//! - Fetches forecast and air-quality snapshots for configured locations
//! - Projects them into the point tree in the local database
//! - Maintains derived points (condition texts, icons, lunar almanac)
//! - Reconciles the tree against the configuration on startup
//!
//! # Configuration
//!
//! The service reads configuration from `~/.config/meteotree/config.toml`:
//!
//! ```toml
//! [sync]
//! interval_minutes = 30
//! units = "metric"
//! locale = "en"
//!
//! [storage]
//! path = "~/.local/share/meteotree/points.db"
//!
//! [[locations]]
//! name = "Berlin"
//! latitude = 52.52
//! longitude = 13.405
//! air_quality = true
//! hourly_forecast = true
//! forecast_days = 7
//! forecast_hours = 24
//! ```
//!
//! Every field except `name`, `latitude`, and `longitude` has a default;
//! a fresh install with no config file runs with no locations and an
//! otherwise valid default configuration.

pub mod client;
pub mod config;

pub use client::OpenMeteoClient;
pub use config::{Config, ConfigError, StorageConfig, SyncSettings, ValidationError};
