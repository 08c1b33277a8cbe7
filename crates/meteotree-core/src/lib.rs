//! Core synchronization engine for the meteotree weather state tree.
//!
//! This crate turns fetched weather snapshots into a self-describing tree of
//! persistent data points. It owns everything between the fetcher and the
//! store: naming, metadata, derived values, lunar astronomy, localization,
//! cycle orchestration and reconciliation.
//!
//! # Features
//!
//! - **Deterministic projection**: Every snapshot field maps to a stable dotted
//!   point id with kind, role, unit and localized label
//! - **Derived points**: Condition texts, weather/wind/moon icons, dew point,
//!   sunshine hours, pollen severity computed next to their source fields
//! - **Lunar almanac**: Moonrise, moonset and moon phase per forecast day,
//!   computed locally without network access
//! - **Define-once upserts**: Metadata is written on first encounter, values
//!   on every cycle, with a process-wide definition cache
//! - **Reconciliation**: Subtrees the configuration no longer produces are
//!   condemned and deleted
//! - **Overlap guard**: A cycle that starts while the previous one still runs
//!   becomes a logged no-op
//!
//! # Tree Layout
//!
//! | Subtree | Content |
//! |---------|---------|
//! | `<location>.current` | Current conditions plus derived texts and icons |
//! | `<location>.forecast.day<N>` | Daily aggregates plus lunar points |
//! | `<location>.hourly.hour<N>` | Hourly forecast entries |
//! | `<location>.air` | Air quality, current and hourly |
//! | `info` | Engine bookkeeping such as `info.last_sync` |
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use meteotree_core::i18n::Locale;
//! use meteotree_core::mock::MockFetcher;
//! use meteotree_core::{SyncController, SyncOptions};
//! use meteotree_store::MemoryStore;
//! use meteotree_types::{LocationConfig, UnitSystem};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = SyncOptions {
//!         locations: vec![LocationConfig::new("Berlin", 52.52, 13.405)],
//!         units: UnitSystem::Metric,
//!         locale: Locale::En,
//!     };
//!     let controller = SyncController::new(
//!         Arc::new(MemoryStore::new()),
//!         Arc::new(MockFetcher::new()),
//!         options,
//!     );
//!
//!     // Drop state the configuration no longer produces, then sync
//!     controller.reconcile().await?;
//!     let report = controller.run_cycle().await?;
//!     println!("wrote {} points", report.points_written);
//!     Ok(())
//! }
//! ```

pub mod astro;
pub mod cache;
pub mod calc;
pub mod codes;
pub mod controller;
pub mod error;
pub mod fetch;
pub mod i18n;
pub mod mock;
pub mod naming;
pub mod reconcile;
pub mod state;
pub mod sync;

// Core exports
pub use astro::{Almanac, MoonTimes, StandardAlmanac};
pub use controller::{CycleReport, SyncController, SyncOptions};
pub use error::{Error, FetchError, Result};
pub use fetch::SnapshotFetcher;
pub use i18n::{Locale, Translator};
pub use reconcile::ReconcileReport;
pub use sync::{SyncReport, Synchronizer};
