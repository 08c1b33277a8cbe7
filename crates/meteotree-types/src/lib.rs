//! Platform-agnostic types for the meteotree weather state-tree engine.
//!
//! This crate provides shared types that can be used by the engine
//! (meteotree-core), the store backends (meteotree-store), and hosts.
//!
//! # Features
//!
//! - Validated data-point identifiers and point values/metadata
//! - The closed enumeration of understood snapshot fields with exact
//!   key, kind, and unit tables
//! - Snapshot structures handed from fetchers to the synchronizer
//! - Location configuration and the unit system toggle
//!
//! # Example
//!
//! ```
//! use meteotree_types::{Field, LocationConfig, PointId, UnitSystem};
//!
//! let location = LocationConfig::new("Berlin", 52.52, 13.41);
//! let id = PointId::new([location.slug().as_str(), "current", Field::Temperature2m.key()]);
//! assert_eq!(id.unwrap().as_str(), "Berlin.current.temperature_2m");
//! assert_eq!(Field::Temperature2m.unit(UnitSystem::Metric), Some("°C"));
//! ```

pub mod error;
pub mod fields;
pub mod location;
pub mod point;
pub mod snapshot;

pub use error::{IdError, IdResult};
pub use fields::{Field, FieldMap};
pub use location::{LocationConfig, UnitSystem, MAX_FORECAST_DAYS, MAX_FORECAST_HOURS};
pub use point::{PointId, PointMeta, PointValue, Role, ValueKind};
pub use snapshot::{AirSnapshot, DailyEntry, Snapshot};

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u8, day: u8) -> time::Date {
        time::Date::from_calendar_date(year, time::Month::try_from(month).unwrap(), day).unwrap()
    }

    // --- PointId tests ---

    #[test]
    fn test_point_id_from_segments() {
        let id = PointId::new(["Berlin", "current", "temperature_2m"]).unwrap();
        assert_eq!(id.as_str(), "Berlin.current.temperature_2m");
        assert_eq!(id.root(), "Berlin");
        assert_eq!(id.segments().count(), 3);
        assert_eq!(id.to_string(), "Berlin.current.temperature_2m");
    }

    #[test]
    fn test_point_id_single_segment() {
        let id = PointId::new(["info"]).unwrap();
        assert_eq!(id.as_str(), "info");
        assert_eq!(id.root(), "info");
    }

    #[test]
    fn test_point_id_rejects_empty_list() {
        let segments: [&str; 0] = [];
        assert_eq!(PointId::new(segments), Err(IdError::Empty));
    }

    #[test]
    fn test_point_id_rejects_empty_segment() {
        let result = PointId::new(["Berlin", ""]);
        assert!(matches!(result, Err(IdError::EmptySegment(_))));
    }

    #[test]
    fn test_point_id_rejects_invalid_characters() {
        for bad in ["with space", "dash-ed", "dot.ted", "star*", "slash/"] {
            let result = PointId::new(["Berlin", bad]);
            assert!(
                matches!(result, Err(IdError::InvalidCharacter { .. })),
                "segment {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_point_id_parse_round_trip() {
        let id = PointId::parse("Berlin.forecast.day2.sunrise").unwrap();
        assert_eq!(id.segments().collect::<Vec<_>>(), [
            "Berlin", "forecast", "day2", "sunrise"
        ]);
        assert_eq!(PointId::parse(id.as_str()).unwrap(), id);
    }

    #[test]
    fn test_point_id_parse_rejects_malformed() {
        assert_eq!(PointId::parse(""), Err(IdError::Empty));
        assert!(PointId::parse(".leading").is_err());
        assert!(PointId::parse("trailing.").is_err());
        assert!(PointId::parse("double..dot").is_err());
        assert!(PointId::parse("bad segment.x").is_err());
    }

    #[test]
    fn test_point_id_join() {
        let base = PointId::new(["Berlin", "hourly"]).unwrap();
        let child = base.join("hour0").unwrap();
        assert_eq!(child.as_str(), "Berlin.hourly.hour0");
        assert!(base.join("not ok").is_err());
    }

    #[test]
    fn test_point_id_contains_respects_segment_boundaries() {
        let root: PointId = "Berlin.air".parse().unwrap();
        assert!(root.contains(&"Berlin.air".parse().unwrap()));
        assert!(root.contains(&"Berlin.air.current.pm10".parse().unwrap()));
        assert!(!root.contains(&"Berlin.airport.pm10".parse().unwrap()));
        assert!(!root.contains(&"Berlin".parse().unwrap()));
    }

    #[test]
    fn test_point_id_ordering_is_lexicographic() {
        let mut ids = vec![
            PointId::parse("b.current").unwrap(),
            PointId::parse("a.hourly.hour1").unwrap(),
            PointId::parse("a.current").unwrap(),
        ];
        ids.sort();
        assert_eq!(ids[0].as_str(), "a.current");
        assert_eq!(ids[1].as_str(), "a.hourly.hour1");
        assert_eq!(ids[2].as_str(), "b.current");
    }

    #[test]
    fn test_point_id_serde_round_trip() {
        let id = PointId::parse("Berlin.current.weather_code").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"Berlin.current.weather_code\"");
        let back: PointId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_point_id_serde_rejects_invalid() {
        let result: Result<PointId, _> = serde_json::from_str("\"not..valid\"");
        assert!(result.is_err());
    }

    // --- PointValue tests ---

    #[test]
    fn test_point_value_kinds_and_accessors() {
        let number = PointValue::Number(9.3);
        assert_eq!(number.kind(), ValueKind::Number);
        assert_eq!(number.as_number(), Some(9.3));
        assert_eq!(number.as_text(), None);

        let text = PointValue::from("cloudy");
        assert_eq!(text.kind(), ValueKind::Text);
        assert_eq!(text.as_text(), Some("cloudy"));
        assert_eq!(text.as_bool(), None);

        let flag = PointValue::Bool(true);
        assert_eq!(flag.kind(), ValueKind::Bool);
        assert_eq!(flag.as_bool(), Some(true));
        assert_eq!(flag.as_number(), None);
    }

    #[test]
    fn test_point_value_display() {
        assert_eq!(PointValue::Number(9.3).to_string(), "9.3");
        assert_eq!(PointValue::from("E").to_string(), "E");
        assert_eq!(PointValue::Bool(false).to_string(), "false");
    }

    #[test]
    fn test_point_value_serde_is_untagged() {
        assert_eq!(
            serde_json::to_string(&PointValue::Number(3.0)).unwrap(),
            "3.0"
        );
        assert_eq!(
            serde_json::to_string(&PointValue::from("NE")).unwrap(),
            "\"NE\""
        );
        assert_eq!(
            serde_json::to_string(&PointValue::Bool(true)).unwrap(),
            "true"
        );

        let number: PointValue = serde_json::from_str("21.5").unwrap();
        assert_eq!(number, PointValue::Number(21.5));
        let text: PointValue = serde_json::from_str("\"fog\"").unwrap();
        assert_eq!(text, PointValue::Text("fog".to_string()));
        let flag: PointValue = serde_json::from_str("false").unwrap();
        assert_eq!(flag, PointValue::Bool(false));
    }

    // --- PointMeta tests ---

    #[test]
    fn test_point_meta_construction() {
        let meta = PointMeta::new(ValueKind::Number, Role::Value, "Temperature").with_unit("°C");
        assert_eq!(meta.kind, ValueKind::Number);
        assert_eq!(meta.role, Role::Value);
        assert_eq!(meta.unit.as_deref(), Some("°C"));
        assert_eq!(meta.label, "Temperature");
    }

    #[test]
    fn test_point_meta_serde_skips_missing_unit() {
        let meta = PointMeta::new(ValueKind::Text, Role::Url, "Icon");
        let json = serde_json::to_string(&meta).unwrap();
        assert!(!json.contains("unit"));
        let back: PointMeta = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meta);
    }

    #[test]
    fn test_role_and_kind_names() {
        assert_eq!(Role::Value.as_str(), "value");
        assert_eq!(Role::Url.as_str(), "url");
        assert_eq!(Role::Date.as_str(), "date");
        assert_eq!(ValueKind::Bool.as_str(), "bool");
        assert_eq!(format!("{}", ValueKind::Number), "number");
    }

    // --- Field tests ---

    #[test]
    fn test_field_key_round_trip_for_every_field() {
        for field in Field::ALL {
            assert_eq!(
                Field::from_key(field.key()),
                Some(*field),
                "key {} must map back to its field",
                field.key()
            );
        }
    }

    #[test]
    fn test_field_keys_are_unique() {
        let mut keys: Vec<&str> = Field::ALL.iter().map(|f| f.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), Field::ALL.len());
    }

    #[test]
    fn test_field_unknown_key_is_skipped() {
        assert_eq!(Field::from_key("soil_temperature_0cm"), None);
        assert_eq!(Field::from_key(""), None);
        assert_eq!(Field::from_key("Temperature_2m"), None);
    }

    #[test]
    fn test_field_kinds() {
        assert_eq!(Field::Temperature2m.kind(), ValueKind::Number);
        assert_eq!(Field::IsDay.kind(), ValueKind::Bool);
        assert_eq!(Field::Sunrise.kind(), ValueKind::Text);
        assert_eq!(Field::Sunset.kind(), ValueKind::Text);
        assert_eq!(Field::WeatherCode.kind(), ValueKind::Number);
    }

    #[test]
    fn test_field_unit_table() {
        assert_eq!(Field::Temperature2m.unit(UnitSystem::Metric), Some("°C"));
        assert_eq!(Field::Temperature2m.unit(UnitSystem::Imperial), Some("°F"));
        assert_eq!(Field::Precipitation.unit(UnitSystem::Metric), Some("mm"));
        assert_eq!(Field::Precipitation.unit(UnitSystem::Imperial), Some("inch"));
        assert_eq!(Field::Snowfall.unit(UnitSystem::Metric), Some("cm"));
        assert_eq!(Field::WindSpeed10m.unit(UnitSystem::Imperial), Some("mph"));
        assert_eq!(Field::WindDirection10m.unit(UnitSystem::Metric), Some("°"));
        assert_eq!(Field::PressureMsl.unit(UnitSystem::Imperial), Some("hPa"));
        assert_eq!(Field::SunshineDuration.unit(UnitSystem::Metric), Some("s"));
        assert_eq!(Field::Pm2_5.unit(UnitSystem::Metric), Some("μg/m³"));
        assert_eq!(Field::BirchPollen.unit(UnitSystem::Metric), Some("grains/m³"));
        assert_eq!(Field::WeatherCode.unit(UnitSystem::Metric), None);
        assert_eq!(Field::EuropeanAqi.unit(UnitSystem::Imperial), None);
        assert_eq!(Field::IsDay.unit(UnitSystem::Metric), None);
    }

    #[test]
    fn test_field_unit_never_differs_only_for_unitless_fields() {
        for field in Field::ALL {
            let metric = field.unit(UnitSystem::Metric);
            let imperial = field.unit(UnitSystem::Imperial);
            assert_eq!(
                metric.is_some(),
                imperial.is_some(),
                "{} must have a unit in both systems or neither",
                field.key()
            );
        }
    }

    #[test]
    fn test_field_pollen_set() {
        assert!(Field::BirchPollen.is_pollen());
        assert!(Field::RagweedPollen.is_pollen());
        assert!(!Field::Pm10.is_pollen());
        assert_eq!(Field::ALL.iter().filter(|f| f.is_pollen()).count(), 6);
    }

    #[test]
    fn test_field_serde_uses_payload_key() {
        let json = serde_json::to_string(&Field::WindGusts10m).unwrap();
        assert_eq!(json, "\"wind_gusts_10m\"");
        let back: Field = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Field::WindGusts10m);
        let unknown: Result<Field, _> = serde_json::from_str("\"visibility_2m\"");
        assert!(unknown.is_err());
    }

    #[test]
    fn test_field_map_iterates_in_declaration_order() {
        let mut map = FieldMap::new();
        map.insert(Field::WeatherCode, PointValue::Number(3.0));
        map.insert(Field::Temperature2m, PointValue::Number(20.0));
        map.insert(Field::IsDay, PointValue::Bool(true));

        let order: Vec<Field> = map.keys().copied().collect();
        assert_eq!(
            order,
            [Field::Temperature2m, Field::IsDay, Field::WeatherCode]
        );
    }

    // --- LocationConfig tests ---

    #[test]
    fn test_location_defaults() {
        let loc = LocationConfig::new("Berlin", 52.52, 13.41);
        assert!(!loc.air_quality);
        assert!(!loc.hourly_forecast);
        assert_eq!(loc.forecast_days, 7);
        assert_eq!(loc.forecast_hours, 24);
        assert!(loc.timezone.is_none());
    }

    #[test]
    fn test_location_with_combinators() {
        let loc = LocationConfig::new("Oslo", 59.91, 10.75)
            .with_air_quality(true)
            .with_hourly_forecast(true)
            .with_forecast_days(3)
            .with_forecast_hours(48)
            .with_timezone("Europe/Oslo");
        assert!(loc.air_quality);
        assert!(loc.hourly_forecast);
        assert_eq!(loc.forecast_days, 3);
        assert_eq!(loc.forecast_hours, 48);
        assert_eq!(loc.timezone.as_deref(), Some("Europe/Oslo"));
    }

    #[test]
    fn test_location_slug_sanitizes() {
        assert_eq!(LocationConfig::new("Berlin", 0.0, 0.0).slug(), "Berlin");
        assert_eq!(
            LocationConfig::new("San Francisco", 0.0, 0.0).slug(),
            "San_Francisco"
        );
        assert_eq!(
            LocationConfig::new("Köln/Bonn", 0.0, 0.0).slug(),
            "Köln_Bonn"
        );
        assert_eq!(LocationConfig::new("A.B:C", 0.0, 0.0).slug(), "A_B_C");
        assert_eq!(LocationConfig::new("", 0.0, 0.0).slug(), "_");
    }

    #[test]
    fn test_location_slug_is_a_valid_id_segment() {
        for name in ["Berlin", "New York (JFK)", "São Paulo", "x y z"] {
            let slug = LocationConfig::new(name, 0.0, 0.0).slug();
            assert!(PointId::new([slug.as_str()]).is_ok(), "slug for {name:?}");
        }
    }

    #[test]
    fn test_location_serde_defaults_apply() {
        let loc: LocationConfig = serde_json::from_str(
            r#"{"name":"Bergen","latitude":60.39,"longitude":5.32}"#,
        )
        .unwrap();
        assert_eq!(loc.forecast_days, 7);
        assert_eq!(loc.forecast_hours, 24);
        assert!(!loc.air_quality);
    }

    // --- Snapshot tests ---

    #[test]
    fn test_snapshot_builder() {
        let snapshot = Snapshot::builder()
            .current(Field::Temperature2m, 20.0)
            .current(Field::IsDay, true)
            .day(
                DailyEntry::new(date(2026, 8, 23))
                    .with(Field::Temperature2mMax, 27.1)
                    .with(Field::Sunrise, "2026-08-23T06:14"),
            )
            .hour(FieldMap::from([(
                Field::Temperature2m,
                PointValue::Number(19.2),
            )]))
            .air_current(Field::Pm10, 12.0)
            .build();

        assert_eq!(snapshot.current.len(), 2);
        assert_eq!(snapshot.daily.len(), 1);
        assert_eq!(snapshot.daily[0].fields.len(), 2);
        assert_eq!(snapshot.hourly.len(), 1);
        let air = snapshot.air.expect("air snapshot");
        assert_eq!(air.current.len(), 1);
        assert!(air.hourly.is_empty());
    }

    #[test]
    fn test_snapshot_default_is_empty_utc() {
        let snapshot = Snapshot::default();
        assert_eq!(snapshot.utc_offset, time::UtcOffset::UTC);
        assert!(snapshot.current.is_empty());
        assert!(snapshot.daily.is_empty());
        assert!(snapshot.hourly.is_empty());
        assert!(snapshot.air.is_none());
    }

    #[test]
    fn test_snapshot_serde_round_trip() {
        let snapshot = Snapshot::builder()
            .utc_offset(time::UtcOffset::from_hms(2, 0, 0).unwrap())
            .current(Field::WeatherCode, 3.0)
            .day(DailyEntry::new(date(2026, 8, 23)).with(Field::SunshineDuration, 30600.0))
            .build();

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
