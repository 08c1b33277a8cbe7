//! Cycle orchestration over fetcher, synchronizer and store.
//!
//! [`SyncController`] owns everything one synchronization cycle needs and
//! runs locations sequentially: fetch, project into the tree, move on. A
//! location whose fetch or projection fails is logged and skipped so the
//! remaining locations still sync, and an overlap guard turns a cycle that
//! starts while the previous one is still running into a no-op.

use std::sync::Arc;
use std::time::Instant;

use meteotree_store::StateStore;
use meteotree_types::{
    LocationConfig, PointId, PointMeta, PointValue, Role, UnitSystem, ValueKind,
};
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info, warn};

use crate::astro::{Almanac, StandardAlmanac};
use crate::error::{Error, Result};
use crate::fetch::SnapshotFetcher;
use crate::i18n::{Locale, Translator};
use crate::reconcile::{self, ReconcileReport};
use crate::state::SyncState;
use crate::sync::{SyncReport, Synchronizer};

/// Reserved id of the cycle timestamp point.
const LAST_SYNC_ID: &str = "info.last_sync";

/// Options governing every synchronization cycle.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Locations to synchronize, in cycle order.
    pub locations: Vec<LocationConfig>,
    /// Unit system requested from the fetcher and used for display units.
    pub units: UnitSystem,
    /// Locale for labels and derived texts.
    pub locale: Locale,
}

/// Outcome of one synchronization cycle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CycleReport {
    /// Whether the cycle was skipped because the previous one still ran.
    pub skipped: bool,
    /// Locations synchronized successfully.
    pub locations_synced: u32,
    /// Locations skipped after a fetch or projection failure.
    pub locations_failed: u32,
    /// Metadata definitions issued across all locations.
    pub points_defined: u32,
    /// Value writes issued across all locations.
    pub points_written: u32,
    /// Fields dropped for carrying a value of the wrong kind.
    pub fields_skipped: u32,
    /// Wall-clock duration of the cycle.
    pub duration_ms: u64,
    /// Per-location detail, in cycle order.
    pub reports: Vec<SyncReport>,
}

/// Drives synchronization cycles and reconciliation passes.
///
/// Generic over the store backend, the fetcher and the almanac so tests can
/// swap in in-memory and scripted implementations.
pub struct SyncController<S, F, A = StandardAlmanac> {
    store: Arc<S>,
    fetcher: Arc<F>,
    almanac: A,
    translator: Translator,
    options: SyncOptions,
    state: SyncState,
}

impl<S, F> SyncController<S, F, StandardAlmanac>
where
    S: StateStore,
    F: SnapshotFetcher,
{
    /// Create a controller computing lunar data with [`StandardAlmanac`].
    pub fn new(store: Arc<S>, fetcher: Arc<F>, options: SyncOptions) -> Self {
        let translator = Translator::new(options.locale);
        Self {
            store,
            fetcher,
            almanac: StandardAlmanac,
            translator,
            options,
            state: SyncState::new(),
        }
    }
}

impl<S, F, A> SyncController<S, F, A>
where
    S: StateStore,
    F: SnapshotFetcher,
    A: Almanac,
{
    /// Replace the almanac, keeping everything else.
    #[must_use]
    pub fn with_almanac<B: Almanac>(self, almanac: B) -> SyncController<S, F, B> {
        SyncController {
            store: self.store,
            fetcher: self.fetcher,
            almanac,
            translator: self.translator,
            options: self.options,
            state: self.state,
        }
    }

    /// The controller's cycle state (overlap guard and definition cache).
    pub fn state(&self) -> &SyncState {
        &self.state
    }

    /// The options this controller was built with.
    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Run one synchronization cycle across all configured locations.
    ///
    /// Returns a skipped report when the previous cycle is still running.
    /// A failing location is logged and counted, not propagated; only a
    /// failure to write the cycle timestamp aborts the cycle with an error.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        if !self.state.begin_cycle() {
            warn!("previous synchronization cycle still running, skipping");
            return Ok(CycleReport {
                skipped: true,
                ..CycleReport::default()
            });
        }

        let result = self.run_cycle_inner().await;
        self.state.end_cycle();
        result
    }

    async fn run_cycle_inner(&self) -> Result<CycleReport> {
        let started = Instant::now();
        let mut report = CycleReport::default();

        if self.options.locations.is_empty() {
            warn!("no locations configured, nothing to synchronize");
        }

        for location in &self.options.locations {
            match self.sync_one(location).await {
                Ok(location_report) => {
                    report.locations_synced += 1;
                    report.points_defined += location_report.points_defined;
                    report.points_written += location_report.points_written;
                    report.fields_skipped += location_report.fields_skipped;
                    report.reports.push(location_report);
                }
                Err(error) => {
                    warn!(location = %location.name, %error, "location skipped this cycle");
                    report.locations_failed += 1;
                }
            }
        }

        self.write_sync_stamp().await?;
        report.duration_ms = started.elapsed().as_millis() as u64;
        info!(
            synced = report.locations_synced,
            failed = report.locations_failed,
            defined = report.points_defined,
            written = report.points_written,
            duration_ms = report.duration_ms,
            "synchronization cycle finished"
        );
        Ok(report)
    }

    async fn sync_one(&self, location: &LocationConfig) -> Result<SyncReport> {
        debug!(location = %location.name, "fetching snapshot");
        let snapshot = self.fetcher.fetch(location).await.map_err(|reason| {
            Error::Fetch {
                location: location.name.clone(),
                reason,
            }
        })?;

        let synchronizer = Synchronizer::new(
            self.store.as_ref(),
            self.state.cache(),
            &self.almanac,
            &self.translator,
            self.options.units,
        );
        synchronizer.sync_location(location, &snapshot).await
    }

    /// Record the cycle completion time under the reserved `info` root.
    async fn write_sync_stamp(&self) -> Result<()> {
        let id = PointId::parse(LAST_SYNC_ID)?;
        if !self.state.cache().has(&id) {
            let label = self.translator.translate("last_sync");
            let meta = PointMeta::new(ValueKind::Text, Role::Date, label);
            self.store.define(&id, &meta).await?;
            self.state.cache().mark(&id);
        }
        let stamp = OffsetDateTime::now_utc().format(&Rfc3339)?;
        self.store.write(&id, &PointValue::from(stamp), true).await?;
        Ok(())
    }

    /// Delete subtrees the current configuration no longer produces.
    pub async fn reconcile(&self) -> Result<ReconcileReport> {
        reconcile::reconcile(self.store.as_ref(), &self.options.locations)
            .await
    }
}
