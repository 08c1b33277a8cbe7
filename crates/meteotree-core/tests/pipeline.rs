//! End-to-end pipeline tests.
//!
//! These drive the public API only: a [`SyncController`] over an in-memory
//! store and a scripted fetcher, with assertions on the resulting state
//! tree. No network, no disk.

use std::sync::Arc;

use meteotree_core::i18n::Locale;
use meteotree_core::mock::{FixedAlmanac, MockFetcher};
use meteotree_core::{SyncController, SyncOptions};
use meteotree_store::{MemoryStore, StateStore, StoredPoint};
use meteotree_types::{
    DailyEntry, Field, FieldMap, LocationConfig, PointId, PointValue, Snapshot, UnitSystem,
};
use time::format_description::well_known::Rfc3339;
use time::{Date, Month, OffsetDateTime, Time};

fn date(year: i32, month: u8, day: u8) -> Date {
    Date::from_calendar_date(year, Month::try_from(month).unwrap(), day).unwrap()
}

fn hour_entry(temperature: f64, code: f64, day: bool) -> FieldMap {
    FieldMap::from([
        (Field::Temperature2m, PointValue::Number(temperature)),
        (Field::WeatherCode, PointValue::Number(code)),
        (Field::IsDay, PointValue::Bool(day)),
    ])
}

/// A snapshot touching every section of the tree.
fn full_snapshot() -> Snapshot {
    Snapshot::builder()
        .current(Field::Temperature2m, 20.0)
        .current(Field::RelativeHumidity2m, 50.0)
        .current(Field::WeatherCode, 3.0)
        .current(Field::IsDay, true)
        .current(Field::WindDirection10m, 90.0)
        .current(Field::WindGusts10m, 40.0)
        .day(
            DailyEntry::new(date(2026, 8, 21))
                .with(Field::Temperature2mMax, 27.5)
                .with(Field::Temperature2mMin, 14.2)
                .with(Field::WeatherCode, 61.0)
                .with(Field::SunshineDuration, 30_600.0)
                .with(Field::WindGusts10mMax, 55.0)
                .with(Field::WindDirection10mDominant, 225.0),
        )
        .day(
            DailyEntry::new(date(2026, 8, 22))
                .with(Field::Temperature2mMax, 24.0)
                .with(Field::WeatherCode, 0.0),
        )
        .hour(hour_entry(18.0, 2.0, false))
        .hour(hour_entry(17.1, 2.0, false))
        .air_current(Field::EuropeanAqi, 35.0)
        .air_current(Field::Pm10, 12.5)
        .air_current(Field::Pm2_5, 6.2)
        .air_current(Field::BirchPollen, 120.0)
        .air_current(Field::GrassPollen, 5.0)
        .air_hour(FieldMap::from([(
            Field::EuropeanAqi,
            PointValue::Number(30.0),
        )]))
        .build()
}

fn berlin() -> LocationConfig {
    LocationConfig::new("Berlin", 52.52, 13.405)
        .with_air_quality(true)
        .with_hourly_forecast(true)
        .with_forecast_days(2)
        .with_forecast_hours(2)
}

fn options(locations: Vec<LocationConfig>, units: UnitSystem, locale: Locale) -> SyncOptions {
    SyncOptions {
        locations,
        units,
        locale,
    }
}

async fn scripted_controller(
    store: Arc<MemoryStore>,
    options: SyncOptions,
) -> (
    SyncController<MemoryStore, MockFetcher, FixedAlmanac>,
    Arc<MockFetcher>,
) {
    let fetcher = Arc::new(MockFetcher::new());
    for location in &options.locations {
        fetcher.set_snapshot(&location.name, full_snapshot()).await;
    }
    let almanac =
        FixedAlmanac::new(0.5).with_times(Time::from_hms(19, 4, 0).ok(), None);
    let controller = SyncController::new(store, Arc::clone(&fetcher), options)
        .with_almanac(almanac);
    (controller, fetcher)
}

async fn point(store: &MemoryStore, id: &str) -> Option<StoredPoint> {
    let id = PointId::parse(id).expect("well-formed id");
    store.read(&id).await.expect("store read")
}

async fn number(store: &MemoryStore, id: &str) -> Option<f64> {
    point(store, id).await.and_then(|p| p.value).and_then(|v| v.as_number())
}

async fn text(store: &MemoryStore, id: &str) -> Option<String> {
    point(store, id)
        .await
        .and_then(|p| p.value)
        .and_then(|v| v.as_text().map(str::to_string))
}

#[tokio::test]
async fn test_full_cycle_builds_expected_tree() {
    let store = Arc::new(MemoryStore::new());
    let (controller, _fetcher) = scripted_controller(
        Arc::clone(&store),
        options(vec![berlin()], UnitSystem::Metric, Locale::En),
    )
    .await;

    let report = controller.run_cycle().await.unwrap();
    assert!(!report.skipped);
    assert_eq!(report.locations_synced, 1);
    assert_eq!(report.fields_skipped, 0);

    // Current conditions, raw and derived
    assert_eq!(number(&store, "Berlin.current.temperature_2m").await, Some(20.0));
    assert_eq!(
        text(&store, "Berlin.current.weather_text").await.as_deref(),
        Some("Overcast")
    );
    assert_eq!(
        text(&store, "Berlin.current.icon_url").await.as_deref(),
        Some("icons/weather/overcast-day.svg")
    );
    assert_eq!(number(&store, "Berlin.current.dew_point_2m").await, Some(9.3));
    assert_eq!(
        text(&store, "Berlin.current.wind_direction_text").await.as_deref(),
        Some("E")
    );
    assert_eq!(
        text(&store, "Berlin.current.wind_gusts_icon").await.as_deref(),
        Some("icons/gusts/strong-breeze.svg")
    );

    // Forecast day 0: raw aggregates, derived values, lunar points
    assert_eq!(
        number(&store, "Berlin.forecast.day0.temperature_2m_max").await,
        Some(27.5)
    );
    assert_eq!(
        text(&store, "Berlin.forecast.day0.weather_text").await.as_deref(),
        Some("Slight rain")
    );
    assert_eq!(
        text(&store, "Berlin.forecast.day0.icon_url").await.as_deref(),
        Some("icons/weather/rain-light-day.svg")
    );
    assert_eq!(
        number(&store, "Berlin.forecast.day0.sunshine_hours").await,
        Some(8.5)
    );
    assert_eq!(
        text(&store, "Berlin.forecast.day0.wind_gusts_max_icon").await.as_deref(),
        Some("icons/gusts/near-gale.svg")
    );
    assert_eq!(
        text(&store, "Berlin.forecast.day0.wind_direction_dominant_text")
            .await
            .as_deref(),
        Some("SW")
    );
    assert_eq!(
        text(&store, "Berlin.forecast.day0.moonrise").await.as_deref(),
        Some("7:04 PM")
    );
    assert_eq!(
        text(&store, "Berlin.forecast.day0.moonset").await.as_deref(),
        Some("")
    );
    assert_eq!(
        text(&store, "Berlin.forecast.day0.moon_phase").await.as_deref(),
        Some("Full moon")
    );
    assert_eq!(
        text(&store, "Berlin.forecast.day0.moon_phase_icon").await.as_deref(),
        Some("icons/moon/full.svg")
    );
    assert_eq!(
        text(&store, "Berlin.forecast.day0.weekday").await.as_deref(),
        Some("Friday")
    );
    assert_eq!(
        text(&store, "Berlin.forecast.day1.weekday").await.as_deref(),
        Some("Saturday")
    );

    // Hourly entries carry night icons when is_day is false
    assert_eq!(
        number(&store, "Berlin.hourly.hour0.temperature_2m").await,
        Some(18.0)
    );
    assert_eq!(
        text(&store, "Berlin.hourly.hour0.icon_url").await.as_deref(),
        Some("icons/weather/partly-cloudy-night.svg")
    );
    assert_eq!(
        number(&store, "Berlin.hourly.hour1.temperature_2m").await,
        Some(17.1)
    );

    // Air quality, current and hourly, with pollen severity texts
    assert_eq!(number(&store, "Berlin.air.current.european_aqi").await, Some(35.0));
    assert_eq!(
        text(&store, "Berlin.air.current.birch_pollen_text").await.as_deref(),
        Some("moderate")
    );
    assert_eq!(
        text(&store, "Berlin.air.current.grass_pollen_text").await.as_deref(),
        Some("low")
    );
    assert_eq!(number(&store, "Berlin.air.hour0.european_aqi").await, Some(30.0));

    // Cycle timestamp
    let stamp = text(&store, "info.last_sync").await.expect("timestamp");
    assert!(OffsetDateTime::parse(&stamp, &Rfc3339).is_ok());
}

#[tokio::test]
async fn test_repeat_cycles_update_without_redefining() {
    let store = Arc::new(MemoryStore::new());
    let (controller, fetcher) = scripted_controller(
        Arc::clone(&store),
        options(vec![berlin()], UnitSystem::Metric, Locale::En),
    )
    .await;

    controller.run_cycle().await.unwrap();
    let defines = store.define_count();

    // The next fetch returns a warmer reading
    let mut updated = full_snapshot();
    updated
        .current
        .insert(Field::Temperature2m, PointValue::Number(23.4));
    fetcher.set_snapshot("Berlin", updated).await;

    let report = controller.run_cycle().await.unwrap();
    assert_eq!(report.points_defined, 0);
    assert_eq!(store.define_count(), defines);
    assert_eq!(number(&store, "Berlin.current.temperature_2m").await, Some(23.4));
    // Derived points refresh alongside their sources
    assert_eq!(number(&store, "Berlin.current.dew_point_2m").await, Some(12.4));
}

#[tokio::test]
async fn test_narrowed_configuration_reconciles_tree() {
    let store = Arc::new(MemoryStore::new());
    let (wide, _fetcher) = scripted_controller(
        Arc::clone(&store),
        options(vec![berlin()], UnitSystem::Metric, Locale::En),
    )
    .await;
    wide.run_cycle().await.unwrap();
    assert!(number(&store, "Berlin.air.current.pm10").await.is_some());

    // Air quality off, forecast window shrunk to one day
    let narrow_config = LocationConfig::new("Berlin", 52.52, 13.405)
        .with_hourly_forecast(true)
        .with_forecast_days(1)
        .with_forecast_hours(2);
    let (narrow, _fetcher) = scripted_controller(
        Arc::clone(&store),
        options(vec![narrow_config], UnitSystem::Metric, Locale::En),
    )
    .await;

    let report = narrow.reconcile().await.unwrap();
    assert!(report.points_deleted > 0);

    assert!(number(&store, "Berlin.air.current.pm10").await.is_none());
    assert!(number(&store, "Berlin.forecast.day1.temperature_2m_max").await.is_none());
    // Everything the narrow configuration still produces survives
    assert!(number(&store, "Berlin.forecast.day0.temperature_2m_max").await.is_some());
    assert!(number(&store, "Berlin.hourly.hour0.temperature_2m").await.is_some());
    assert!(text(&store, "info.last_sync").await.is_some());
}

#[tokio::test]
async fn test_german_locale_translates_labels_and_texts() {
    let store = Arc::new(MemoryStore::new());
    let (controller, _fetcher) = scripted_controller(
        Arc::clone(&store),
        options(vec![berlin()], UnitSystem::Metric, Locale::De),
    )
    .await;
    controller.run_cycle().await.unwrap();

    assert_eq!(
        text(&store, "Berlin.current.weather_text").await.as_deref(),
        Some("Bedeckt")
    );
    let stored = point(&store, "Berlin.current.temperature_2m").await.unwrap();
    assert_eq!(stored.meta.label, "Temperatur");
    // Moonrise renders as a 24-hour clock in German
    assert_eq!(
        text(&store, "Berlin.forecast.day0.moonrise").await.as_deref(),
        Some("19:04")
    );
}

#[tokio::test]
async fn test_imperial_units_flow_into_metadata_and_bands() {
    let store = Arc::new(MemoryStore::new());
    let (controller, _fetcher) = scripted_controller(
        Arc::clone(&store),
        options(vec![berlin()], UnitSystem::Imperial, Locale::En),
    )
    .await;
    controller.run_cycle().await.unwrap();

    let stored = point(&store, "Berlin.current.temperature_2m").await.unwrap();
    assert_eq!(stored.meta.unit.as_deref(), Some("°F"));
    let gusts = point(&store, "Berlin.current.wind_gusts_10m").await.unwrap();
    assert_eq!(gusts.meta.unit.as_deref(), Some("mph"));
    // 40 mph is ~64 km/h, past the near-gale boundary
    assert_eq!(
        text(&store, "Berlin.current.wind_gusts_icon").await.as_deref(),
        Some("icons/gusts/gale.svg")
    );
}
