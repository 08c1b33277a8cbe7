//! Mock collaborators for testing.
//!
//! This module provides scripted stand-ins for the two external seams of the
//! engine, so synchronizer and controller logic can be exercised without
//! network access or real ephemeris math.
//!
//! # Features
//!
//! - **Scripted snapshots**: one canned [`Snapshot`] per location name
//! - **Failure injection**: fail every fetch, or only the next N fetches
//! - **Call counting**: assert how many fetches a cycle performed
//! - **Fixed almanac**: deterministic lunar values for derived-point tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use time::{Date, Time, UtcOffset};
use tokio::sync::RwLock;

use meteotree_types::{LocationConfig, Snapshot};

use crate::astro::{Almanac, MoonTimes};
use crate::error::FetchError;
use crate::fetch::SnapshotFetcher;

/// A scripted [`SnapshotFetcher`] for tests.
///
/// # Example
///
/// ```
/// use meteotree_core::mock::MockFetcher;
/// use meteotree_core::SnapshotFetcher;
/// use meteotree_types::{LocationConfig, Snapshot};
///
/// #[tokio::main]
/// async fn main() {
///     let fetcher = MockFetcher::new();
///     fetcher.set_snapshot("Berlin", Snapshot::default()).await;
///
///     let location = LocationConfig::new("Berlin", 52.52, 13.405);
///     assert!(fetcher.fetch(&location).await.is_ok());
///     assert_eq!(fetcher.fetch_count(), 1);
/// }
/// ```
pub struct MockFetcher {
    snapshots: RwLock<HashMap<String, Snapshot>>,
    fetch_count: AtomicU32,
    should_fail: AtomicBool,
    fail_message: RwLock<String>,
    /// Simulated fetch latency in milliseconds (0 = no delay).
    fetch_latency_ms: AtomicU64,
    /// Number of fetches to fail before succeeding (0 = behavior driven by should_fail).
    fail_count: AtomicU32,
    /// Current count of failures (decremented on each failure).
    remaining_failures: AtomicU32,
}

impl std::fmt::Debug for MockFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockFetcher")
            .field("fetch_count", &self.fetch_count.load(Ordering::Relaxed))
            .field("should_fail", &self.should_fail.load(Ordering::Relaxed))
            .finish()
    }
}

impl MockFetcher {
    /// Create a fetcher with no scripted snapshots.
    #[must_use]
    pub fn new() -> Self {
        Self {
            snapshots: RwLock::new(HashMap::new()),
            fetch_count: AtomicU32::new(0),
            should_fail: AtomicBool::new(false),
            fail_message: RwLock::new("Mock fetch failure".to_string()),
            fetch_latency_ms: AtomicU64::new(0),
            fail_count: AtomicU32::new(0),
            remaining_failures: AtomicU32::new(0),
        }
    }

    /// Script the snapshot returned for a location name.
    pub async fn set_snapshot(&self, location_name: &str, snapshot: Snapshot) {
        self.snapshots
            .write()
            .await
            .insert(location_name.to_string(), snapshot);
    }

    /// Remove a scripted snapshot.
    pub async fn clear_snapshot(&self, location_name: &str) {
        self.snapshots.write().await.remove(location_name);
    }

    /// Set whether fetches should fail.
    pub async fn set_should_fail(&self, fail: bool, message: Option<&str>) {
        self.should_fail.store(fail, Ordering::Relaxed);
        if let Some(msg) = message {
            *self.fail_message.write().await = msg.to_string();
        }
    }

    /// Fail the next `count` fetches, then recover.
    pub fn set_transient_failures(&self, count: u32) {
        self.fail_count.store(count, Ordering::Relaxed);
        self.remaining_failures.store(count, Ordering::Relaxed);
    }

    /// Re-arm the transient failure window at its configured size.
    pub fn reset_transient_failures(&self) {
        self.remaining_failures
            .store(self.fail_count.load(Ordering::Relaxed), Ordering::Relaxed);
    }

    /// Number of transient failures still pending.
    #[must_use]
    pub fn remaining_failures(&self) -> u32 {
        self.remaining_failures.load(Ordering::Relaxed)
    }

    /// Set simulated fetch latency.
    pub fn set_fetch_latency(&self, latency: Duration) {
        self.fetch_latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Number of fetches performed (including failed ones).
    #[must_use]
    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::Relaxed)
    }

    /// Reset the fetch counter.
    pub fn reset_fetch_count(&self) {
        self.fetch_count.store(0, Ordering::Relaxed);
    }

    async fn check_should_fail(&self) -> Result<(), FetchError> {
        if self.remaining_failures.load(Ordering::Relaxed) > 0 {
            self.remaining_failures.fetch_sub(1, Ordering::Relaxed);
            return Err(FetchError::Transport(
                self.fail_message.read().await.clone(),
            ));
        }

        if self.should_fail.load(Ordering::Relaxed) {
            return Err(FetchError::Transport(
                self.fail_message.read().await.clone(),
            ));
        }
        Ok(())
    }
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotFetcher for MockFetcher {
    async fn fetch(&self, location: &LocationConfig) -> Result<Snapshot, FetchError> {
        let latency = self.fetch_latency_ms.load(Ordering::Relaxed);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        self.check_should_fail().await?;

        self.snapshots
            .read()
            .await
            .get(&location.name)
            .cloned()
            .ok_or_else(|| {
                FetchError::Transport(format!("no snapshot scripted for '{}'", location.name))
            })
    }
}

/// An [`Almanac`] returning fixed values, for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedAlmanac {
    rise: Option<Time>,
    set: Option<Time>,
    phase: f64,
}

impl FixedAlmanac {
    /// Almanac pinned to a cycle fraction, with no rise/set events.
    #[must_use]
    pub fn new(phase: f64) -> Self {
        Self {
            rise: None,
            set: None,
            phase,
        }
    }

    /// Script the rise and set times.
    #[must_use]
    pub fn with_times(mut self, rise: Option<Time>, set: Option<Time>) -> Self {
        self.rise = rise;
        self.set = set;
        self
    }
}

impl Almanac for FixedAlmanac {
    fn moon_times(&self, _date: Date, _offset: UtcOffset, _lat: f64, _lon: f64) -> MoonTimes {
        MoonTimes {
            rise: self.rise,
            set: self.set,
        }
    }

    fn moon_phase(&self, _date: Date) -> f64 {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location() -> LocationConfig {
        LocationConfig::new("Berlin", 52.52, 13.405)
    }

    #[tokio::test]
    async fn test_scripted_snapshot_returned() {
        let fetcher = MockFetcher::new();
        fetcher.set_snapshot("Berlin", Snapshot::default()).await;

        assert!(fetcher.fetch(&location()).await.is_ok());
        assert_eq!(fetcher.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_unscripted_location_errors() {
        let fetcher = MockFetcher::new();
        let result = fetcher.fetch(&location()).await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
        // The attempt still counts
        assert_eq!(fetcher.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let fetcher = MockFetcher::new();
        fetcher.set_snapshot("Berlin", Snapshot::default()).await;
        fetcher.set_should_fail(true, Some("connection reset")).await;

        let err = fetcher.fetch(&location()).await.unwrap_err();
        assert!(err.to_string().contains("connection reset"));

        fetcher.set_should_fail(false, None).await;
        assert!(fetcher.fetch(&location()).await.is_ok());
    }

    #[tokio::test]
    async fn test_transient_failures_recover() {
        let fetcher = MockFetcher::new();
        fetcher.set_snapshot("Berlin", Snapshot::default()).await;
        fetcher.set_transient_failures(2);

        assert!(fetcher.fetch(&location()).await.is_err());
        assert_eq!(fetcher.remaining_failures(), 1);
        assert!(fetcher.fetch(&location()).await.is_err());
        assert!(fetcher.fetch(&location()).await.is_ok());

        fetcher.reset_transient_failures();
        assert_eq!(fetcher.remaining_failures(), 2);
        assert!(fetcher.fetch(&location()).await.is_err());
    }

    #[test]
    fn test_fixed_almanac_returns_scripted_values() {
        let almanac = FixedAlmanac::new(0.5)
            .with_times(Time::from_hms(18, 30, 0).ok(), Time::from_hms(5, 10, 0).ok());
        let date = Date::from_julian_day(2460000).unwrap();

        assert_eq!(almanac.moon_phase(date), 0.5);
        let times = almanac.moon_times(date, UtcOffset::UTC, 52.5, 13.4);
        assert_eq!(times.rise, Time::from_hms(18, 30, 0).ok());
        assert_eq!(times.set, Time::from_hms(5, 10, 0).ok());
    }
}
