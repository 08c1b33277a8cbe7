//! Open-Meteo HTTP client.
//!
//! One forecast request per location per cycle, plus one air-quality request
//! when the location asks for it. Responses carry parallel arrays (one column
//! per field, one row per day or hour); the parse functions transpose them
//! into [`Snapshot`] entries. Payload keys outside the [`Field`] enumeration
//! are skipped, never iterated into the tree.

use std::time::Duration;

use async_trait::async_trait;
use meteotree_core::{FetchError, SnapshotFetcher};
use meteotree_types::{
    AirSnapshot, DailyEntry, Field, FieldMap, LocationConfig, PointValue, Snapshot, UnitSystem,
    ValueKind,
};
use serde::Deserialize;
use time::{Date, Month, UtcOffset};
use tracing::debug;

/// Default forecast endpoint.
const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Default air-quality endpoint.
const AIR_QUALITY_URL: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";

/// Fields requested in the current-conditions block.
const CURRENT_FIELDS: &[Field] = &[
    Field::Temperature2m,
    Field::RelativeHumidity2m,
    Field::ApparentTemperature,
    Field::IsDay,
    Field::Precipitation,
    Field::Rain,
    Field::Showers,
    Field::Snowfall,
    Field::WeatherCode,
    Field::CloudCover,
    Field::PressureMsl,
    Field::SurfacePressure,
    Field::WindSpeed10m,
    Field::WindDirection10m,
    Field::WindGusts10m,
];

/// Fields requested per forecast day.
const DAILY_FIELDS: &[Field] = &[
    Field::WeatherCode,
    Field::Temperature2mMax,
    Field::Temperature2mMin,
    Field::ApparentTemperatureMax,
    Field::ApparentTemperatureMin,
    Field::Sunrise,
    Field::Sunset,
    Field::DaylightDuration,
    Field::SunshineDuration,
    Field::UvIndexMax,
    Field::PrecipitationSum,
    Field::RainSum,
    Field::ShowersSum,
    Field::SnowfallSum,
    Field::PrecipitationHours,
    Field::PrecipitationProbabilityMax,
    Field::WindSpeed10mMax,
    Field::WindGusts10mMax,
    Field::WindDirection10mDominant,
];

/// Fields requested per hourly entry.
const HOURLY_FIELDS: &[Field] = &[
    Field::Temperature2m,
    Field::RelativeHumidity2m,
    Field::ApparentTemperature,
    Field::IsDay,
    Field::Precipitation,
    Field::PrecipitationProbability,
    Field::Rain,
    Field::Showers,
    Field::Snowfall,
    Field::WeatherCode,
    Field::CloudCover,
    Field::PressureMsl,
    Field::SurfacePressure,
    Field::Visibility,
    Field::WindSpeed10m,
    Field::WindDirection10m,
    Field::WindGusts10m,
    Field::UvIndex,
    Field::UvIndexClearSky,
];

/// Fields requested from the air-quality endpoint (current and hourly).
const AIR_FIELDS: &[Field] = &[
    Field::EuropeanAqi,
    Field::UsAqi,
    Field::Pm10,
    Field::Pm2_5,
    Field::CarbonMonoxide,
    Field::NitrogenDioxide,
    Field::SulphurDioxide,
    Field::Ozone,
    Field::AerosolOpticalDepth,
    Field::Dust,
    Field::Ammonia,
    Field::AlderPollen,
    Field::BirchPollen,
    Field::GrassPollen,
    Field::MugwortPollen,
    Field::OlivePollen,
    Field::RagweedPollen,
];

/// Fetches snapshots from the Open-Meteo forecast and air-quality APIs.
///
/// # Example
///
/// ```no_run
/// use meteotree_core::SnapshotFetcher;
/// use meteotree_service::OpenMeteoClient;
/// use meteotree_types::{LocationConfig, UnitSystem};
///
/// # async fn fetch() -> Result<(), Box<dyn std::error::Error>> {
/// let client = OpenMeteoClient::new(UnitSystem::Metric)?;
/// let berlin = LocationConfig::new("Berlin", 52.52, 13.405);
/// let snapshot = client.fetch(&berlin).await?;
/// println!("{} current fields", snapshot.current.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    forecast_url: String,
    air_url: String,
    units: UnitSystem,
}

impl OpenMeteoClient {
    /// Create a client against the public Open-Meteo endpoints.
    pub fn new(units: UnitSystem) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            forecast_url: FORECAST_URL.to_string(),
            air_url: AIR_QUALITY_URL.to_string(),
            units,
        })
    }

    /// Point the client at different endpoints, e.g. a self-hosted
    /// Open-Meteo instance.
    #[must_use]
    pub fn with_endpoints(
        mut self,
        forecast_url: impl Into<String>,
        air_url: impl Into<String>,
    ) -> Self {
        self.forecast_url = forecast_url.into();
        self.air_url = air_url.into();
        self
    }

    /// Query parameters for the forecast request.
    fn forecast_query(&self, location: &LocationConfig) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("timezone", timezone_param(location)),
            ("current", keys(CURRENT_FIELDS)),
            ("daily", keys(DAILY_FIELDS)),
            ("forecast_days", location.forecast_days.to_string()),
        ];
        if location.hourly_forecast {
            query.push(("hourly", keys(HOURLY_FIELDS)));
            query.push(("forecast_hours", location.forecast_hours.to_string()));
        }
        if self.units == UnitSystem::Imperial {
            query.push(("temperature_unit", "fahrenheit".to_string()));
            query.push(("wind_speed_unit", "mph".to_string()));
            query.push(("precipitation_unit", "inch".to_string()));
        }
        query
    }

    /// Query parameters for the air-quality request.
    fn air_query(&self, location: &LocationConfig) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("timezone", timezone_param(location)),
            ("current", keys(AIR_FIELDS)),
            ("hourly", keys(AIR_FIELDS)),
            ("forecast_hours", location.forecast_hours.to_string()),
        ]
    }

    async fn get_json<T>(
        &self,
        url: &str,
        query: Vec<(&'static str, String)>,
    ) -> Result<T, FetchError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .get(url)
            .query(&query)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Transport(format!("HTTP {status}: {body}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::Payload(e.to_string()))
    }
}

#[async_trait]
impl SnapshotFetcher for OpenMeteoClient {
    async fn fetch(&self, location: &LocationConfig) -> Result<Snapshot, FetchError> {
        let payload: ForecastPayload = self
            .get_json(&self.forecast_url, self.forecast_query(location))
            .await?;
        let mut snapshot = parse_forecast(&payload)?;

        if location.air_quality {
            let payload: AirPayload = self
                .get_json(&self.air_url, self.air_query(location))
                .await?;
            snapshot.air = Some(parse_air(&payload));
        }

        Ok(snapshot)
    }
}

/// Explicit IANA timezone when configured, provider-side lookup otherwise.
fn timezone_param(location: &LocationConfig) -> String {
    location
        .timezone
        .clone()
        .unwrap_or_else(|| "auto".to_string())
}

fn keys(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|field| field.key())
        .collect::<Vec<_>>()
        .join(",")
}

/// Forecast endpoint response, reduced to the blocks the snapshot needs.
#[derive(Debug, Deserialize)]
struct ForecastPayload {
    #[serde(default)]
    utc_offset_seconds: i32,
    #[serde(default)]
    current: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    daily: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    hourly: serde_json::Map<String, serde_json::Value>,
}

/// Air-quality endpoint response.
#[derive(Debug, Deserialize)]
struct AirPayload {
    #[serde(default)]
    current: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    hourly: serde_json::Map<String, serde_json::Value>,
}

fn parse_forecast(payload: &ForecastPayload) -> Result<Snapshot, FetchError> {
    let utc_offset = UtcOffset::from_whole_seconds(payload.utc_offset_seconds)
        .map_err(|e| FetchError::Payload(format!("utc_offset_seconds out of range: {e}")))?;
    Ok(Snapshot {
        utc_offset,
        current: parse_fields(&payload.current),
        daily: parse_daily(&payload.daily)?,
        hourly: parse_series(&payload.hourly),
        air: None,
    })
}

fn parse_air(payload: &AirPayload) -> AirSnapshot {
    AirSnapshot {
        current: parse_fields(&payload.current),
        hourly: parse_series(&payload.hourly),
    }
}

/// Convert a block of single values (the `current` objects) to a field map.
///
/// The `time` and `interval` bookkeeping keys and any key outside the
/// [`Field`] enumeration are skipped.
fn parse_fields(object: &serde_json::Map<String, serde_json::Value>) -> FieldMap {
    let mut fields = FieldMap::new();
    for (key, value) in object {
        if key == "time" || key == "interval" {
            continue;
        }
        let Some(field) = Field::from_key(key) else {
            debug!("ignoring unknown payload key '{}'", key);
            continue;
        };
        if let Some(value) = convert_value(field, value) {
            fields.insert(field, value);
        }
    }
    fields
}

/// Transpose the daily block's parallel arrays into dated entries.
///
/// The `time` axis is required here: it carries the calendar date each
/// derived lunar point is computed for.
fn parse_daily(
    object: &serde_json::Map<String, serde_json::Value>,
) -> Result<Vec<DailyEntry>, FetchError> {
    if object.is_empty() {
        return Ok(Vec::new());
    }
    let time = object
        .get("time")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| FetchError::Payload("daily block is missing its time axis".to_string()))?;

    let mut days = Vec::with_capacity(time.len());
    for value in time {
        let raw = value
            .as_str()
            .ok_or_else(|| FetchError::Payload(format!("daily date is not a string: {value}")))?;
        days.push(DailyEntry::new(parse_date(raw)?));
    }

    for (key, column) in object {
        if key == "time" {
            continue;
        }
        let Some(field) = Field::from_key(key) else {
            debug!("ignoring unknown payload key '{}'", key);
            continue;
        };
        let Some(column) = column.as_array() else {
            continue;
        };
        for (day, value) in days.iter_mut().zip(column) {
            if let Some(value) = convert_value(field, value) {
                day.fields.insert(field, value);
            }
        }
    }

    Ok(days)
}

/// Transpose an hourly block's parallel arrays into one field map per hour.
///
/// Entry count follows the `time` axis when present, else the longest
/// column; rows a column does not reach simply lack that field.
fn parse_series(object: &serde_json::Map<String, serde_json::Value>) -> Vec<FieldMap> {
    let len = object
        .get("time")
        .and_then(serde_json::Value::as_array)
        .map(Vec::len)
        .or_else(|| {
            object
                .values()
                .filter_map(serde_json::Value::as_array)
                .map(Vec::len)
                .max()
        })
        .unwrap_or(0);

    let mut entries = vec![FieldMap::new(); len];
    for (key, column) in object {
        if key == "time" {
            continue;
        }
        let Some(field) = Field::from_key(key) else {
            debug!("ignoring unknown payload key '{}'", key);
            continue;
        };
        let Some(column) = column.as_array() else {
            continue;
        };
        for (entry, value) in entries.iter_mut().zip(column) {
            if let Some(value) = convert_value(field, value) {
                entry.insert(field, value);
            }
        }
    }
    entries
}

/// Convert one JSON value to the kind the field declares.
///
/// Flags arrive as 0/1 numbers from Open-Meteo, so boolean fields accept
/// both JSON booleans and numbers. Nulls and kind mismatches yield `None`
/// and the field is left out of the entry.
fn convert_value(field: Field, value: &serde_json::Value) -> Option<PointValue> {
    match field.kind() {
        ValueKind::Bool => match value {
            serde_json::Value::Bool(flag) => Some(PointValue::Bool(*flag)),
            other => other.as_f64().map(|n| PointValue::Bool(n != 0.0)),
        },
        ValueKind::Text => value.as_str().map(PointValue::from),
        ValueKind::Number => value.as_f64().map(PointValue::from),
    }
}

/// Parse a `YYYY-MM-DD` payload date.
fn parse_date(raw: &str) -> Result<Date, FetchError> {
    let mut parts = raw.splitn(3, '-');
    let parsed = (|| {
        let year = parts.next()?.parse::<i32>().ok()?;
        let month = Month::try_from(parts.next()?.parse::<u8>().ok()?).ok()?;
        let day = parts.next()?.parse::<u8>().ok()?;
        Date::from_calendar_date(year, month, day).ok()
    })();
    parsed.ok_or_else(|| FetchError::Payload(format!("invalid calendar date '{raw}'")))
}
