//! In-memory snapshots of fetched location data.
//!
//! Snapshots are transient: they exist between a fetch and the sync pass
//! that projects them into the state tree, and are never persisted.

use time::{Date, UtcOffset};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::fields::{Field, FieldMap};
use crate::point::PointValue;

/// Everything fetched for one location in one cycle.
///
/// `hourly` and `air` are populated only when the corresponding location
/// flags are on. Field maps are ordered ([`FieldMap`]), so a snapshot
/// projects into the tree in a deterministic order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    /// UTC offset of the location's local time, used to render local
    /// times of day (moonrise, moonset).
    pub utc_offset: UtcOffset,
    /// Current weather conditions.
    pub current: FieldMap,
    /// Daily forecast entries, `day0` first.
    pub daily: Vec<DailyEntry>,
    /// Hourly forecast entries, `hour0` first.
    pub hourly: Vec<FieldMap>,
    /// Air-quality data, when the location requests it.
    pub air: Option<AirSnapshot>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            utc_offset: UtcOffset::UTC,
            current: FieldMap::new(),
            daily: Vec::new(),
            hourly: Vec::new(),
            air: None,
        }
    }
}

impl Snapshot {
    /// Create a builder for assembling a snapshot field by field.
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }
}

/// One forecast day with its calendar date.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DailyEntry {
    /// Local calendar date of the forecast day.
    pub date: Date,
    /// Daily aggregate fields.
    pub fields: FieldMap,
}

impl DailyEntry {
    /// An entry with no fields yet.
    pub fn new(date: Date) -> Self {
        Self {
            date,
            fields: FieldMap::new(),
        }
    }

    /// Add one field.
    #[must_use]
    pub fn with(mut self, field: Field, value: impl Into<PointValue>) -> Self {
        self.fields.insert(field, value.into());
        self
    }
}

/// Air-quality portion of a snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AirSnapshot {
    /// Current air-quality readings.
    pub current: FieldMap,
    /// Hourly air-quality entries, `hour0` first.
    pub hourly: Vec<FieldMap>,
}

/// Builder for [`Snapshot`], mainly used by tests and mock fetchers.
///
/// # Examples
///
/// ```
/// use meteotree_types::{Field, Snapshot};
///
/// let snapshot = Snapshot::builder()
///     .current(Field::Temperature2m, 20.0)
///     .current(Field::RelativeHumidity2m, 50.0)
///     .build();
/// assert_eq!(snapshot.current.len(), 2);
/// ```
#[derive(Debug, Default)]
#[must_use]
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    /// Set the local-time UTC offset.
    pub fn utc_offset(mut self, offset: UtcOffset) -> Self {
        self.snapshot.utc_offset = offset;
        self
    }

    /// Add one current-conditions field.
    pub fn current(mut self, field: Field, value: impl Into<PointValue>) -> Self {
        self.snapshot.current.insert(field, value.into());
        self
    }

    /// Append a forecast day.
    pub fn day(mut self, entry: DailyEntry) -> Self {
        self.snapshot.daily.push(entry);
        self
    }

    /// Append an hourly forecast entry.
    pub fn hour(mut self, fields: FieldMap) -> Self {
        self.snapshot.hourly.push(fields);
        self
    }

    /// Add one current air-quality field.
    pub fn air_current(mut self, field: Field, value: impl Into<PointValue>) -> Self {
        self.snapshot
            .air
            .get_or_insert_with(AirSnapshot::default)
            .current
            .insert(field, value.into());
        self
    }

    /// Append an hourly air-quality entry.
    pub fn air_hour(mut self, fields: FieldMap) -> Self {
        self.snapshot
            .air
            .get_or_insert_with(AirSnapshot::default)
            .hourly
            .push(fields);
        self
    }

    /// Build the `Snapshot`.
    #[must_use]
    pub fn build(self) -> Snapshot {
        self.snapshot
    }
}
