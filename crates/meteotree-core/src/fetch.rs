//! Snapshot retrieval seam.
//!
//! The engine never talks to the network itself. A [`SnapshotFetcher`]
//! produces one [`Snapshot`] per location; the service crate implements it
//! over the Open-Meteo HTTP API, and [`MockFetcher`](crate::mock::MockFetcher)
//! scripts snapshots for tests.

use async_trait::async_trait;
use meteotree_types::{LocationConfig, Snapshot};

use crate::error::FetchError;

/// Retrieves the current snapshot for one location.
///
/// A failure is fatal only to that location for that cycle; the controller
/// logs it and moves on to the next location.
///
/// # Example
///
/// ```ignore
/// use meteotree_core::SnapshotFetcher;
///
/// async fn sync_one<F: SnapshotFetcher>(fetcher: &F, location: &LocationConfig) {
///     match fetcher.fetch(location).await {
///         Ok(snapshot) => { /* hand to the synchronizer */ }
///         Err(err) => tracing::warn!("skipping {}: {}", location.name, err),
///     }
/// }
/// ```
#[async_trait]
pub trait SnapshotFetcher: Send + Sync {
    /// Fetch a fresh snapshot for `location`.
    ///
    /// Implementations honor the location's feature flags: the air-quality
    /// section is present only when `location.air_quality` is set, hourly
    /// entries only when `location.hourly_forecast` is set.
    async fn fetch(&self, location: &LocationConfig) -> Result<Snapshot, FetchError>;
}
