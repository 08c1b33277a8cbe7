//! Trait abstraction over state-tree store backends.
//!
//! This module provides the [`StateStore`] trait that abstracts over the
//! SQLite backend and the in-memory backend used for testing.

use async_trait::async_trait;

use meteotree_types::{PointId, PointMeta, PointValue};

use crate::error::Result;
use crate::models::StoredPoint;

/// Trait abstracting the persistent state tree of data points.
///
/// The synchronization engine drives every backend through these
/// primitives. `define` is the create-once half of the upsert path and
/// `write` the write-always half; `ids` and `delete_subtree` exist for the
/// reconciliation pass.
///
/// # Example
///
/// ```ignore
/// use meteotree_store::{Result, StateStore};
/// use meteotree_types::{PointId, PointValue};
///
/// async fn touch<S: StateStore>(store: &S, id: &PointId) -> Result<()> {
///     store.write(id, &PointValue::Number(1.0), true).await
/// }
/// ```
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Whether a point with this id has been defined.
    async fn exists(&self, id: &PointId) -> Result<bool>;

    /// Define a point's metadata.
    ///
    /// Create-once: when the point already exists the call is a no-op and
    /// the persisted metadata is left untouched, so repeating a definition
    /// after a restart is always safe.
    async fn define(&self, id: &PointId, meta: &PointMeta) -> Result<()>;

    /// Write a point's value together with its acknowledged flag.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Undefined`](crate::Error::Undefined) when the
    /// point was never defined.
    async fn write(&self, id: &PointId, value: &PointValue, acknowledged: bool) -> Result<()>;

    /// Read one point, when present.
    async fn read(&self, id: &PointId) -> Result<Option<StoredPoint>>;

    /// Every persisted point id, in ascending id order.
    async fn ids(&self) -> Result<Vec<PointId>>;

    /// Delete the point at `root` and every point beneath it.
    ///
    /// Returns the number of points removed; deleting an absent subtree
    /// removes zero and is not an error.
    async fn delete_subtree(&self, root: &PointId) -> Result<u64>;
}
