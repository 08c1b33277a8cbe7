//! Data-point naming.
//!
//! [`PointNamer`] turns a location slug, a tree section, and a field (raw or
//! derived) into the point's validated [`PointId`] plus its create-once
//! [`PointMeta`]. Units come from the exact per-field table in
//! `meteotree-types`; labels come from the translation tables, keyed by the
//! raw field key or, for derived points, by the point's own leaf name.

use meteotree_types::{Field, PointId, PointMeta, Role, UnitSystem, ValueKind};

use crate::error::Result;
use crate::i18n::Translator;

/// Tree section a point lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Current conditions: `<slug>.current`.
    Current,
    /// One forecast day: `<slug>.forecast.day<N>`.
    Day(u8),
    /// One forecast hour: `<slug>.hourly.hour<N>`.
    Hour(u16),
    /// Current air quality: `<slug>.air.current`.
    AirCurrent,
    /// One air-quality hour: `<slug>.air.hour<N>`.
    AirHour(u16),
}

impl Section {
    fn push_segments(&self, segments: &mut Vec<String>) {
        match self {
            Section::Current => segments.push("current".to_string()),
            Section::Day(n) => {
                segments.push("forecast".to_string());
                segments.push(format!("day{n}"));
            }
            Section::Hour(n) => {
                segments.push("hourly".to_string());
                segments.push(format!("hour{n}"));
            }
            Section::AirCurrent => {
                segments.push("air".to_string());
                segments.push("current".to_string());
            }
            Section::AirHour(n) => {
                segments.push("air".to_string());
                segments.push(format!("hour{n}"));
            }
        }
    }
}

/// Shape of a companion point computed from raw fields.
///
/// The `name` doubles as the id leaf and the translation key, which keeps
/// derived labels distinct from the raw field labels.
#[derive(Debug, Clone)]
pub struct DerivedSpec {
    /// Leaf segment of the point id.
    pub name: &'static str,
    /// Value kind the point carries.
    pub kind: ValueKind,
    /// Display role of the point.
    pub role: Role,
    /// Display unit, if any.
    pub unit: Option<String>,
}

impl DerivedSpec {
    /// A unitless text point.
    #[must_use]
    pub fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: ValueKind::Text,
            role: Role::Text,
            unit: None,
        }
    }

    /// An icon-path point.
    #[must_use]
    pub fn icon(name: &'static str) -> Self {
        Self {
            name,
            kind: ValueKind::Text,
            role: Role::Url,
            unit: None,
        }
    }

    /// A numeric point with an optional unit.
    #[must_use]
    pub fn number(name: &'static str, unit: Option<&str>) -> Self {
        Self {
            name,
            kind: ValueKind::Number,
            role: Role::Value,
            unit: unit.map(str::to_string),
        }
    }
}

/// Maps fields to point ids and metadata.
pub struct PointNamer<'a> {
    translator: &'a Translator,
    units: UnitSystem,
}

impl<'a> PointNamer<'a> {
    /// Create a namer for the given translator and unit system.
    #[must_use]
    pub fn new(translator: &'a Translator, units: UnitSystem) -> Self {
        Self { translator, units }
    }

    /// Id and metadata for a raw snapshot field.
    pub fn raw_point(&self, slug: &str, section: Section, field: Field) -> Result<(PointId, PointMeta)> {
        let id = self.point_id(slug, section, field.key())?;
        let label = self.translator.translate(field.key());
        let mut meta = PointMeta::new(field.kind(), Role::Value, label);
        if let Some(unit) = field.unit(self.units) {
            meta = meta.with_unit(unit);
        }
        Ok((id, meta))
    }

    /// Id and metadata for a derived companion point.
    pub fn derived_point(
        &self,
        slug: &str,
        section: Section,
        spec: &DerivedSpec,
    ) -> Result<(PointId, PointMeta)> {
        let id = self.point_id(slug, section, spec.name)?;
        let label = self.translator.translate(spec.name);
        let mut meta = PointMeta::new(spec.kind, spec.role, label);
        if let Some(unit) = &spec.unit {
            meta = meta.with_unit(unit.clone());
        }
        Ok((id, meta))
    }

    fn point_id(&self, slug: &str, section: Section, leaf: &str) -> Result<PointId> {
        let mut segments = Vec::with_capacity(4);
        segments.push(slug.to_string());
        section.push_segments(&mut segments);
        segments.push(leaf.to_string());
        Ok(PointId::new(&segments)?)
    }
}
