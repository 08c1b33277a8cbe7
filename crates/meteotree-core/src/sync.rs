//! State-tree synchronizer.
//!
//! [`Synchronizer::sync_location`] projects one location's snapshot onto the
//! persistent tree: every leaf field becomes a define-once/write-always data
//! point, and trigger fields emit derived companions (condition text and
//! icon, compass direction, gust severity, dew point, sunshine hours, pollen
//! severity) right after the raw write. Forecast days additionally carry
//! lunar points computed through the almanac.
//!
//! Iteration order is deterministic for a given snapshot: sections run in a
//! fixed sequence and field maps iterate in declaration order, so repeated
//! runs produce the same writes in the same order.

use meteotree_store::StateStore;
use meteotree_types::{
    DailyEntry, Field, FieldMap, LocationConfig, PointId, PointMeta, PointValue, Snapshot,
    UnitSystem,
};
use serde::Serialize;
use time::UtcOffset;
use tracing::{debug, warn};

use crate::astro::Almanac;
use crate::cache::DefinitionCache;
use crate::calc::{
    CompassPoint, GustBand, MoonPhase, PollenSeverity, PollenThresholds, dew_point,
    sunshine_hours,
};
use crate::codes::weather_code_info;
use crate::error::Result;
use crate::i18n::Translator;
use crate::naming::{DerivedSpec, PointNamer, Section};

/// Outcome of synchronizing one location.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// Location display name.
    pub location: String,
    /// Metadata definitions issued during this pass.
    pub points_defined: u32,
    /// Value writes issued during this pass.
    pub points_written: u32,
    /// Fields skipped because the payload kind contradicted the declared kind.
    pub fields_skipped: u32,
}

/// Projects snapshots onto the state tree.
///
/// Borrows the store, cache, almanac and translator from the controller; a
/// fresh one is cheap to construct per call.
pub struct Synchronizer<'a, S: StateStore + ?Sized, A: Almanac + ?Sized> {
    store: &'a S,
    cache: &'a DefinitionCache,
    almanac: &'a A,
    translator: &'a Translator,
    units: UnitSystem,
}

impl<'a, S, A> Synchronizer<'a, S, A>
where
    S: StateStore + ?Sized,
    A: Almanac + ?Sized,
{
    /// Create a synchronizer over the given collaborators.
    pub fn new(
        store: &'a S,
        cache: &'a DefinitionCache,
        almanac: &'a A,
        translator: &'a Translator,
        units: UnitSystem,
    ) -> Self {
        Self {
            store,
            cache,
            almanac,
            translator,
            units,
        }
    }

    /// Synchronize one location's snapshot into the tree.
    ///
    /// Sections run in a fixed order: current, forecast days (with lunar
    /// extras), hourly entries, then air quality. The hourly and air
    /// sections are written only when the corresponding location flag is
    /// set, and day/hour windows are clamped to the configured counts.
    pub async fn sync_location(
        &self,
        config: &LocationConfig,
        snapshot: &Snapshot,
    ) -> Result<SyncReport> {
        let slug = config.slug();
        let mut report = SyncReport {
            location: config.name.clone(),
            ..SyncReport::default()
        };

        self.sync_fields(&slug, Section::Current, &snapshot.current, &mut report)
            .await?;

        let days = (config.forecast_days as usize).min(snapshot.daily.len());
        for (index, entry) in snapshot.daily.iter().take(days).enumerate() {
            let section = Section::Day(index as u8);
            self.sync_fields(&slug, section, &entry.fields, &mut report)
                .await?;
            self.sync_lunar(&slug, section, entry, snapshot.utc_offset, config, &mut report)
                .await?;
        }

        if config.hourly_forecast {
            let hours = (config.forecast_hours as usize).min(snapshot.hourly.len());
            for (index, fields) in snapshot.hourly.iter().take(hours).enumerate() {
                self.sync_fields(&slug, Section::Hour(index as u16), fields, &mut report)
                    .await?;
            }
        }

        if config.air_quality {
            if let Some(air) = &snapshot.air {
                self.sync_fields(&slug, Section::AirCurrent, &air.current, &mut report)
                    .await?;
                let hours = (config.forecast_hours as usize).min(air.hourly.len());
                for (index, fields) in air.hourly.iter().take(hours).enumerate() {
                    self.sync_fields(&slug, Section::AirHour(index as u16), fields, &mut report)
                        .await?;
                }
            }
        }

        debug!(
            location = %config.name,
            defined = report.points_defined,
            written = report.points_written,
            skipped = report.fields_skipped,
            "location synchronized"
        );
        Ok(report)
    }

    fn namer(&self) -> PointNamer<'_> {
        PointNamer::new(self.translator, self.units)
    }

    async fn sync_fields(
        &self,
        slug: &str,
        section: Section,
        fields: &FieldMap,
        report: &mut SyncReport,
    ) -> Result<()> {
        for (field, value) in fields {
            if value.kind() != field.kind() {
                warn!(
                    "skipping {} in {}/{:?}: declared {}, payload carried {}",
                    field.key(),
                    slug,
                    section,
                    field.kind().as_str(),
                    value.kind().as_str()
                );
                report.fields_skipped += 1;
                continue;
            }

            let (id, meta) = self.namer().raw_point(slug, section, *field)?;
            self.upsert(&id, &meta, value, report).await?;
            self.emit_companions(slug, section, *field, value, fields, report)
                .await?;
        }
        Ok(())
    }

    /// Define-once, write-always. The definition is skipped when the cache
    /// already holds the id; the value write is unconditional.
    async fn upsert(
        &self,
        id: &PointId,
        meta: &PointMeta,
        value: &PointValue,
        report: &mut SyncReport,
    ) -> Result<()> {
        if !self.cache.has(id) {
            self.store.define(id, meta).await?;
            self.cache.mark(id);
            report.points_defined += 1;
        }
        self.store.write(id, value, true).await?;
        report.points_written += 1;
        Ok(())
    }

    async fn write_derived(
        &self,
        slug: &str,
        section: Section,
        spec: &DerivedSpec,
        value: PointValue,
        report: &mut SyncReport,
    ) -> Result<()> {
        let (id, meta) = self.namer().derived_point(slug, section, spec)?;
        self.upsert(&id, &meta, &value, report).await
    }

    /// Companion points triggered by a raw field that was just written.
    async fn emit_companions(
        &self,
        slug: &str,
        section: Section,
        field: Field,
        value: &PointValue,
        fields: &FieldMap,
        report: &mut SyncReport,
    ) -> Result<()> {
        match field {
            Field::WeatherCode => {
                let Some(code) = value.as_number() else {
                    return Ok(());
                };
                let info = weather_code_info(code as i64);
                let day = fields
                    .get(&Field::IsDay)
                    .and_then(PointValue::as_bool)
                    .unwrap_or(true);

                let text = self.translator.translate(info.label_key);
                self.write_derived(
                    slug,
                    section,
                    &DerivedSpec::text("weather_text"),
                    PointValue::from(text),
                    report,
                )
                .await?;
                self.write_derived(
                    slug,
                    section,
                    &DerivedSpec::icon("icon_url"),
                    PointValue::from(info.icon_path(day)),
                    report,
                )
                .await?;
            }

            Field::WindDirection10m | Field::WindDirection10mDominant => {
                let Some(point) = value.as_number().and_then(CompassPoint::from_degrees) else {
                    return Ok(());
                };
                let (text_name, icon_name) = if field == Field::WindDirection10m {
                    ("wind_direction_text", "wind_direction_icon")
                } else {
                    ("wind_direction_dominant_text", "wind_direction_dominant_icon")
                };

                self.write_derived(
                    slug,
                    section,
                    &DerivedSpec::text(text_name),
                    PointValue::from(point.abbreviation()),
                    report,
                )
                .await?;
                self.write_derived(
                    slug,
                    section,
                    &DerivedSpec::icon(icon_name),
                    PointValue::from(point.icon_path()),
                    report,
                )
                .await?;
            }

            Field::WindGusts10m | Field::WindGusts10mMax => {
                let band = value
                    .as_number()
                    .and_then(|speed| GustBand::from_speed(speed, self.units));
                let Some(band) = band else {
                    return Ok(());
                };
                let name = if field == Field::WindGusts10m {
                    "wind_gusts_icon"
                } else {
                    "wind_gusts_max_icon"
                };

                self.write_derived(
                    slug,
                    section,
                    &DerivedSpec::icon(name),
                    PointValue::from(band.icon_path()),
                    report,
                )
                .await?;
            }

            Field::Temperature2m => {
                let humidity = fields
                    .get(&Field::RelativeHumidity2m)
                    .and_then(PointValue::as_number);
                let dew = value
                    .as_number()
                    .zip(humidity)
                    .and_then(|(t, h)| dew_point(t, h, self.units));
                if let Some(dew) = dew {
                    let unit = Field::Temperature2m.unit(self.units);
                    self.write_derived(
                        slug,
                        section,
                        &DerivedSpec::number("dew_point_2m", unit),
                        PointValue::Number(dew),
                        report,
                    )
                    .await?;
                }
            }

            Field::SunshineDuration => {
                if let Some(hours) = value.as_number().and_then(sunshine_hours) {
                    self.write_derived(
                        slug,
                        section,
                        &DerivedSpec::number("sunshine_hours", Some("h")),
                        PointValue::Number(hours),
                        report,
                    )
                    .await?;
                }
            }

            field if field.is_pollen() => {
                let thresholds = if field == Field::BirchPollen {
                    PollenThresholds::birch()
                } else {
                    PollenThresholds::default()
                };
                let severity = value
                    .as_number()
                    .and_then(|c| PollenSeverity::classify(c, thresholds));
                if let Some(severity) = severity {
                    let text = self.translator.translate(severity.label_key());
                    self.write_derived(
                        slug,
                        section,
                        &DerivedSpec::text(pollen_text_name(field)),
                        PointValue::from(text),
                        report,
                    )
                    .await?;
                }
            }

            _ => {}
        }
        Ok(())
    }

    /// Lunar extras for one forecast day. These have no raw counterpart in
    /// the snapshot; they exist purely as derived points.
    async fn sync_lunar(
        &self,
        slug: &str,
        section: Section,
        entry: &DailyEntry,
        offset: UtcOffset,
        config: &LocationConfig,
        report: &mut SyncReport,
    ) -> Result<()> {
        let times =
            self.almanac
                .moon_times(entry.date, offset, config.latitude, config.longitude);
        // An absent event writes an empty string so yesterday's time never
        // lingers on a day without a rise or set.
        let rise = times
            .rise
            .map(|t| self.translator.format_time(t))
            .unwrap_or_default();
        let set = times
            .set
            .map(|t| self.translator.format_time(t))
            .unwrap_or_default();
        self.write_derived(
            slug,
            section,
            &DerivedSpec::text("moonrise"),
            PointValue::from(rise),
            report,
        )
        .await?;
        self.write_derived(
            slug,
            section,
            &DerivedSpec::text("moonset"),
            PointValue::from(set),
            report,
        )
        .await?;

        let fraction = self.almanac.moon_phase(entry.date);
        if let Some(phase) = MoonPhase::from_fraction(fraction) {
            self.write_derived(
                slug,
                section,
                &DerivedSpec::text("moon_phase"),
                PointValue::from(self.translator.translate(phase.label_key())),
                report,
            )
            .await?;
            self.write_derived(
                slug,
                section,
                &DerivedSpec::icon("moon_phase_icon"),
                PointValue::from(phase.icon_path()),
                report,
            )
            .await?;
            self.write_derived(
                slug,
                section,
                &DerivedSpec::number("moon_phase_fraction", None),
                PointValue::Number(fraction),
                report,
            )
            .await?;
        }

        let weekday = self.translator.weekday(entry.date.weekday());
        self.write_derived(
            slug,
            section,
            &DerivedSpec::text("weekday"),
            PointValue::from(weekday),
            report,
        )
        .await?;
        Ok(())
    }
}

fn pollen_text_name(field: Field) -> &'static str {
    match field {
        Field::AlderPollen => "alder_pollen_text",
        Field::BirchPollen => "birch_pollen_text",
        Field::GrassPollen => "grass_pollen_text",
        Field::MugwortPollen => "mugwort_pollen_text",
        Field::OlivePollen => "olive_pollen_text",
        _ => "ragweed_pollen_text",
    }
}
