//! In-memory store implementation for testing.
//!
//! [`MemoryStore`] implements the [`StateStore`] trait without touching disk,
//! so synchronizer and reconciliation logic can be exercised in unit tests.
//!
//! # Features
//!
//! - **Call counting**: Track how many define/write/delete calls arrive
//! - **Failure injection**: Fail every call, or only the next N calls

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use meteotree_types::{PointId, PointMeta, PointValue};

use crate::error::{Error, Result};
use crate::models::StoredPoint;
use crate::traits::StateStore;

/// An in-memory [`StateStore`] for testing.
///
/// # Example
///
/// ```
/// use meteotree_store::{MemoryStore, StateStore};
/// use meteotree_types::{PointId, PointMeta, PointValue, Role, ValueKind};
///
/// #[tokio::main]
/// async fn main() {
///     let store = MemoryStore::new();
///     let id = PointId::parse("Berlin.current.temperature_2m").unwrap();
///     let meta = PointMeta::new(ValueKind::Number, Role::Value, "Temperature");
///
///     store.define(&id, &meta).await.unwrap();
///     store.write(&id, &PointValue::Number(20.5), true).await.unwrap();
///     assert_eq!(store.write_count(), 1);
/// }
/// ```
pub struct MemoryStore {
    points: RwLock<BTreeMap<PointId, StoredPoint>>,
    define_count: AtomicU32,
    write_count: AtomicU32,
    delete_count: AtomicU32,
    should_fail: AtomicBool,
    fail_message: RwLock<String>,
    /// Number of operations to fail before succeeding (0 = behavior driven by should_fail).
    fail_count: AtomicU32,
    /// Current count of failures (decremented on each failure).
    remaining_failures: AtomicU32,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("define_count", &self.define_count.load(Ordering::Relaxed))
            .field("write_count", &self.write_count.load(Ordering::Relaxed))
            .field("delete_count", &self.delete_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            points: RwLock::new(BTreeMap::new()),
            define_count: AtomicU32::new(0),
            write_count: AtomicU32::new(0),
            delete_count: AtomicU32::new(0),
            should_fail: AtomicBool::new(false),
            fail_message: RwLock::new("Injected store failure".to_string()),
            fail_count: AtomicU32::new(0),
            remaining_failures: AtomicU32::new(0),
        }
    }

    async fn check_should_fail(&self) -> Result<()> {
        // Transient failures take priority
        if self.remaining_failures.load(Ordering::Relaxed) > 0 {
            self.remaining_failures.fetch_sub(1, Ordering::Relaxed);
            return Err(Error::Injected(self.fail_message.read().await.clone()));
        }

        if self.should_fail.load(Ordering::Relaxed) {
            return Err(Error::Injected(self.fail_message.read().await.clone()));
        }
        Ok(())
    }

    /// Set whether operations should fail.
    pub async fn set_should_fail(&self, fail: bool, message: Option<&str>) {
        self.should_fail.store(fail, Ordering::Relaxed);
        if let Some(msg) = message {
            *self.fail_message.write().await = msg.to_string();
        }
    }

    /// Fail the next `count` operations, then recover.
    pub fn set_transient_failures(&self, count: u32) {
        self.fail_count.store(count, Ordering::Relaxed);
        self.remaining_failures.store(count, Ordering::Relaxed);
    }

    /// Re-arm the previously configured transient failure count.
    pub fn reset_transient_failures(&self) {
        self.remaining_failures
            .store(self.fail_count.load(Ordering::Relaxed), Ordering::Relaxed);
    }

    /// Number of define calls received.
    pub fn define_count(&self) -> u32 {
        self.define_count.load(Ordering::Relaxed)
    }

    /// Number of write calls received.
    pub fn write_count(&self) -> u32 {
        self.write_count.load(Ordering::Relaxed)
    }

    /// Number of delete calls received.
    pub fn delete_count(&self) -> u32 {
        self.delete_count.load(Ordering::Relaxed)
    }

    /// Reset all call counters to zero.
    pub fn reset_counts(&self) {
        self.define_count.store(0, Ordering::Relaxed);
        self.write_count.store(0, Ordering::Relaxed);
        self.delete_count.store(0, Ordering::Relaxed);
    }

    /// Number of stored points.
    pub async fn len(&self) -> usize {
        self.points.read().await.len()
    }

    /// Whether the store holds no points.
    pub async fn is_empty(&self) -> bool {
        self.points.read().await.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn exists(&self, id: &PointId) -> Result<bool> {
        self.check_should_fail().await?;
        Ok(self.points.read().await.contains_key(id))
    }

    async fn define(&self, id: &PointId, meta: &PointMeta) -> Result<()> {
        self.check_should_fail().await?;
        self.define_count.fetch_add(1, Ordering::Relaxed);

        let mut points = self.points.write().await;
        points.entry(id.clone()).or_insert_with(|| StoredPoint {
            id: id.clone(),
            meta: meta.clone(),
            value: None,
            acknowledged: false,
            defined_at: OffsetDateTime::now_utc(),
            updated_at: None,
        });
        Ok(())
    }

    async fn write(&self, id: &PointId, value: &PointValue, acknowledged: bool) -> Result<()> {
        self.check_should_fail().await?;
        self.write_count.fetch_add(1, Ordering::Relaxed);

        let mut points = self.points.write().await;
        match points.get_mut(id) {
            Some(point) => {
                point.value = Some(value.clone());
                point.acknowledged = acknowledged;
                point.updated_at = Some(OffsetDateTime::now_utc());
                Ok(())
            }
            None => Err(Error::Undefined(id.clone())),
        }
    }

    async fn read(&self, id: &PointId) -> Result<Option<StoredPoint>> {
        self.check_should_fail().await?;
        Ok(self.points.read().await.get(id).cloned())
    }

    async fn ids(&self) -> Result<Vec<PointId>> {
        self.check_should_fail().await?;
        Ok(self.points.read().await.keys().cloned().collect())
    }

    async fn delete_subtree(&self, root: &PointId) -> Result<u64> {
        self.check_should_fail().await?;
        self.delete_count.fetch_add(1, Ordering::Relaxed);

        let mut points = self.points.write().await;
        let before = points.len();
        points.retain(|id, _| !root.contains(id));
        Ok((before - points.len()) as u64)
    }
}
