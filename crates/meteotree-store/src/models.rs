//! Data models for stored data points.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use meteotree_types::{PointId, PointMeta, PointValue};

/// A data point as persisted in the state tree.
///
/// The metadata half is written once through the create-once path; the
/// value half is overwritten on every sync cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPoint {
    /// Full dotted identifier.
    pub id: PointId,
    /// Point metadata (kind, role, unit, label).
    pub meta: PointMeta,
    /// Most recently written value, if any value was written yet.
    pub value: Option<PointValue>,
    /// Whether the last write was acknowledged (engine-written values
    /// always are).
    pub acknowledged: bool,
    /// When the point was first defined.
    #[serde(with = "time::serde::rfc3339")]
    pub defined_at: OffsetDateTime,
    /// When the value was last written.
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}
