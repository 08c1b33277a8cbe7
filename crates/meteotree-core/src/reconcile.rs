//! Reconciliation of the persisted tree against the configuration.
//!
//! Synchronization only ever adds and updates points, so configuration
//! changes leave stale subtrees behind: a removed location, a disabled
//! air-quality or hourly section, a shrunk forecast window. The
//! reconciliation pass walks every persisted id, condemns the subtrees the
//! current configuration no longer produces, and deletes them.
//!
//! [`condemn`] is pure and synchronous; [`reconcile`] applies its verdict
//! to a store. The reserved `info` root is never condemned.

use std::collections::BTreeSet;

use meteotree_store::StateStore;
use meteotree_types::{LocationConfig, PointId};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;

/// Root segment reserved for engine bookkeeping points.
pub const INFO_ROOT: &str = "info";

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileReport {
    /// Stale subtrees removed.
    pub subtrees_deleted: u32,
    /// Individual points removed across all subtrees.
    pub points_deleted: u64,
    /// Subtree deletions that failed (logged and skipped).
    pub failures: u32,
}

/// Determine which subtrees the current configuration condemns.
///
/// Rules, applied per persisted id, most general first:
///
/// 1. a root that is neither a configured location slug nor `info`
///    condemns the whole location subtree,
/// 2. `<slug>.air` when the location has air quality disabled,
/// 3. `<slug>.hourly` when the location has hourly forecasts disabled,
/// 4. `<slug>.forecast.day<N>` when `N` is outside the forecast-day window,
/// 5. any `hour<N>` section when `N` is outside the forecast-hour window.
///
/// The returned roots are minimal: no returned id lies inside the subtree
/// of another, so deleting them in order counts every stale point once.
#[must_use]
pub fn condemn(ids: &[PointId], locations: &[LocationConfig]) -> Vec<PointId> {
    let by_slug: std::collections::BTreeMap<String, &LocationConfig> = locations
        .iter()
        .map(|location| (location.slug(), location))
        .collect();

    let mut condemned = BTreeSet::new();
    for id in ids {
        let segments: Vec<&str> = id.segments().collect();
        let root = segments[0];
        if root == INFO_ROOT {
            continue;
        }

        let Some(config) = by_slug.get(root) else {
            condemn_prefix(&mut condemned, &segments, 1);
            continue;
        };

        match segments.get(1).copied() {
            Some("air") if !config.air_quality => {
                condemn_prefix(&mut condemned, &segments, 2);
                continue;
            }
            Some("forecast") => {
                if let Some(day) = segments.get(2).and_then(|s| parse_index(s, "day")) {
                    if day >= u32::from(config.forecast_days) {
                        condemn_prefix(&mut condemned, &segments, 3);
                        continue;
                    }
                }
            }
            Some("hourly") if !config.hourly_forecast => {
                condemn_prefix(&mut condemned, &segments, 2);
                continue;
            }
            _ => {}
        }

        // Stale hour entries under a still-enabled hourly or air section.
        if let Some(hour) = segments.get(2).and_then(|s| parse_index(s, "hour")) {
            if hour >= u32::from(config.forecast_hours) {
                condemn_prefix(&mut condemned, &segments, 3);
            }
        }
    }

    condemned
        .iter()
        .filter(|id| {
            !condemned
                .iter()
                .any(|other| *other != **id && other.contains(id))
        })
        .cloned()
        .collect()
}

/// Delete every subtree the configuration condemns.
///
/// Failures to delete an individual subtree are logged and counted, not
/// propagated, so one bad subtree cannot stall the rest of the pass.
pub async fn reconcile<S>(store: &S, locations: &[LocationConfig]) -> Result<ReconcileReport>
where
    S: StateStore + ?Sized,
{
    let ids = store.ids().await?;
    let condemned = condemn(&ids, locations);
    let mut report = ReconcileReport::default();

    for root in &condemned {
        match store.delete_subtree(root).await {
            Ok(removed) => {
                debug!(root = %root, removed, "deleted stale subtree");
                report.subtrees_deleted += 1;
                report.points_deleted += removed;
            }
            Err(error) => {
                warn!(root = %root, %error, "failed to delete stale subtree");
                report.failures += 1;
            }
        }
    }

    if report.points_deleted > 0 {
        info!(
            subtrees = report.subtrees_deleted,
            points = report.points_deleted,
            "reconciliation removed stale state"
        );
    }
    Ok(report)
}

fn condemn_prefix(condemned: &mut BTreeSet<PointId>, segments: &[&str], len: usize) {
    // Segments of an existing id revalidate cleanly, so this cannot fail.
    if let Ok(id) = PointId::new(segments.iter().take(len).copied()) {
        condemned.insert(id);
    }
}

fn parse_index(segment: &str, prefix: &str) -> Option<u32> {
    let digits = segment.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteotree_store::MemoryStore;
    use meteotree_types::{PointMeta, PointValue, Role, ValueKind};

    fn id(s: &str) -> PointId {
        PointId::parse(s).unwrap()
    }

    fn ids(list: &[&str]) -> Vec<PointId> {
        list.iter().map(|s| id(s)).collect()
    }

    fn berlin() -> LocationConfig {
        LocationConfig::new("Berlin", 52.52, 13.405)
    }

    async fn seed(store: &MemoryStore, list: &[&str]) {
        for raw in list {
            let point = id(raw);
            let meta = PointMeta::new(ValueKind::Number, Role::Value, "seed");
            store.define(&point, &meta).await.unwrap();
            store.write(&point, &PointValue::Number(1.0), true).await.unwrap();
        }
    }

    #[test]
    fn test_removed_location_condemned() {
        let existing = ids(&[
            "Berlin.current.temperature_2m",
            "Oslo.current.temperature_2m",
            "Oslo.forecast.day0.weekday",
        ]);
        let condemned = condemn(&existing, &[berlin()]);
        assert_eq!(condemned, vec![id("Oslo")]);
    }

    #[test]
    fn test_info_root_is_never_condemned() {
        let existing = ids(&["info.last_sync", "Oslo.current.temperature_2m"]);
        let condemned = condemn(&existing, &[]);
        assert_eq!(condemned, vec![id("Oslo")]);
    }

    #[test]
    fn test_disabled_sections_condemned() {
        let existing = ids(&[
            "Berlin.current.temperature_2m",
            "Berlin.air.current.pm10",
            "Berlin.air.hour0.pm10",
            "Berlin.hourly.hour0.temperature_2m",
        ]);
        let condemned = condemn(&existing, &[berlin()]);
        assert_eq!(condemned, vec![id("Berlin.air"), id("Berlin.hourly")]);
    }

    #[test]
    fn test_enabled_sections_retained() {
        let config = berlin().with_air_quality(true).with_hourly_forecast(true);
        let existing = ids(&[
            "Berlin.air.current.pm10",
            "Berlin.hourly.hour0.temperature_2m",
        ]);
        assert!(condemn(&existing, &[config]).is_empty());
    }

    #[test]
    fn test_shrunk_forecast_window_condemns_tail_days() {
        let config = berlin().with_forecast_days(3);
        let existing = ids(&[
            "Berlin.forecast.day0.weekday",
            "Berlin.forecast.day2.weekday",
            "Berlin.forecast.day3.weekday",
            "Berlin.forecast.day6.weekday",
        ]);
        let condemned = condemn(&existing, &[config]);
        assert_eq!(
            condemned,
            vec![id("Berlin.forecast.day3"), id("Berlin.forecast.day6")]
        );
    }

    #[test]
    fn test_shrunk_hour_window_condemns_tail_hours() {
        let config = berlin()
            .with_air_quality(true)
            .with_hourly_forecast(true)
            .with_forecast_hours(2);
        let existing = ids(&[
            "Berlin.hourly.hour0.temperature_2m",
            "Berlin.hourly.hour1.temperature_2m",
            "Berlin.hourly.hour2.temperature_2m",
            "Berlin.air.hour5.pm10",
        ]);
        let condemned = condemn(&existing, &[config]);
        assert_eq!(
            condemned,
            vec![id("Berlin.air.hour5"), id("Berlin.hourly.hour2")]
        );
    }

    #[test]
    fn test_condemned_roots_are_minimal() {
        // A removed location also has a disabled-flag subtree; only the
        // location root survives reduction.
        let existing = ids(&[
            "Oslo.current.temperature_2m",
            "Oslo.air.current.pm10",
            "Oslo.hourly.hour9.temperature_2m",
        ]);
        let condemned = condemn(&existing, &[berlin()]);
        assert_eq!(condemned, vec![id("Oslo")]);
    }

    #[test]
    fn test_malformed_indices_are_retained() {
        let config = berlin().with_forecast_days(2);
        let existing = ids(&[
            "Berlin.forecast.dayX.weekday",
            "Berlin.forecast.day.weekday",
            "Berlin.forecast.summary",
        ]);
        assert!(condemn(&existing, &[config]).is_empty());
    }

    #[test]
    fn test_day_window_boundary() {
        let config = berlin().with_forecast_days(7);
        let existing = ids(&[
            "Berlin.forecast.day6.weekday",
            "Berlin.forecast.day7.weekday",
        ]);
        let condemned = condemn(&existing, &[config]);
        assert_eq!(condemned, vec![id("Berlin.forecast.day7")]);
    }

    #[tokio::test]
    async fn test_reconcile_deletes_stale_points() {
        let store = MemoryStore::new();
        seed(
            &store,
            &[
                "info.last_sync",
                "Berlin.current.temperature_2m",
                "Oslo.current.temperature_2m",
                "Oslo.current.weather_text",
            ],
        )
        .await;

        let report = reconcile(&store, &[berlin()]).await.unwrap();
        assert_eq!(report.subtrees_deleted, 1);
        assert_eq!(report.points_deleted, 2);
        assert_eq!(report.failures, 0);

        let remaining = store.ids().await.unwrap();
        assert_eq!(
            remaining,
            ids(&["Berlin.current.temperature_2m", "info.last_sync"])
        );
    }

    #[tokio::test]
    async fn test_reconcile_with_matching_config_is_a_no_op() {
        let store = MemoryStore::new();
        seed(&store, &["Berlin.current.temperature_2m"]).await;

        let report = reconcile(&store, &[berlin()]).await.unwrap();
        assert_eq!(report.subtrees_deleted, 0);
        assert_eq!(report.points_deleted, 0);
        assert_eq!(store.ids().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reconcile_propagates_listing_failure() {
        let store = MemoryStore::new();
        store.set_should_fail(true, Some("database offline")).await;
        assert!(reconcile(&store, &[]).await.is_err());
    }

    /// Store double whose `delete_subtree` refuses one specific root.
    struct RefusingStore {
        inner: MemoryStore,
        refused: PointId,
    }

    #[async_trait::async_trait]
    impl StateStore for RefusingStore {
        async fn exists(&self, id: &PointId) -> meteotree_store::Result<bool> {
            self.inner.exists(id).await
        }

        async fn define(
            &self,
            id: &PointId,
            meta: &PointMeta,
        ) -> meteotree_store::Result<()> {
            self.inner.define(id, meta).await
        }

        async fn write(
            &self,
            id: &PointId,
            value: &PointValue,
            acknowledged: bool,
        ) -> meteotree_store::Result<()> {
            self.inner.write(id, value, acknowledged).await
        }

        async fn read(
            &self,
            id: &PointId,
        ) -> meteotree_store::Result<Option<meteotree_store::StoredPoint>> {
            self.inner.read(id).await
        }

        async fn ids(&self) -> meteotree_store::Result<Vec<PointId>> {
            self.inner.ids().await
        }

        async fn delete_subtree(&self, root: &PointId) -> meteotree_store::Result<u64> {
            if *root == self.refused {
                return Err(meteotree_store::Error::Injected(
                    "delete refused".to_string(),
                ));
            }
            self.inner.delete_subtree(root).await
        }
    }

    #[tokio::test]
    async fn test_reconcile_counts_failures_and_continues() {
        let store = RefusingStore {
            inner: MemoryStore::new(),
            refused: id("Oslo"),
        };
        seed(
            &store.inner,
            &[
                "Oslo.current.temperature_2m",
                "Utsira.current.temperature_2m",
            ],
        )
        .await;

        let report = reconcile(&store, &[]).await.unwrap();
        assert_eq!(report.failures, 1);
        assert_eq!(report.subtrees_deleted, 1);
        assert_eq!(report.points_deleted, 1);
        // The refused subtree is untouched, the other one is gone
        assert_eq!(store.inner.len().await, 1);
    }
}
