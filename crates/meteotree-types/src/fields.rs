//! The closed enumeration of understood snapshot fields.
//!
//! Every raw payload key this system projects into the state tree is listed
//! here, together with its expected value kind and its display unit per unit
//! system. Payload keys not in this enumeration are skipped by the ingest
//! layer; nothing iterates dynamic payload objects.

use core::fmt;
use std::collections::BTreeMap;

use crate::location::UnitSystem;
use crate::point::{PointValue, ValueKind};

/// Fields of a location snapshot, keyed exactly by their payload name.
///
/// The variant order (and therefore the [`FieldMap`] iteration order) is
/// fixed, which keeps every sync cycle deterministic for a given snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    // Instantaneous weather, shared by the current block and hourly entries.
    /// Air temperature at 2 m.
    Temperature2m,
    /// Relative humidity at 2 m.
    RelativeHumidity2m,
    /// Apparent ("feels like") temperature.
    ApparentTemperature,
    /// Daylight flag.
    IsDay,
    /// Total precipitation.
    Precipitation,
    /// Rain fraction of precipitation.
    Rain,
    /// Shower fraction of precipitation.
    Showers,
    /// Snowfall amount.
    Snowfall,
    /// WMO weather interpretation code.
    WeatherCode,
    /// Total cloud cover.
    CloudCover,
    /// Mean sea-level pressure.
    PressureMsl,
    /// Surface pressure.
    SurfacePressure,
    /// Wind speed at 10 m.
    WindSpeed10m,
    /// Wind direction at 10 m.
    WindDirection10m,
    /// Wind gust speed at 10 m.
    WindGusts10m,
    /// Precipitation probability (hourly only).
    PrecipitationProbability,
    /// UV index.
    UvIndex,
    /// Clear-sky UV index.
    UvIndexClearSky,
    /// Horizontal visibility.
    Visibility,

    // Daily aggregates.
    /// Daily maximum temperature at 2 m.
    Temperature2mMax,
    /// Daily minimum temperature at 2 m.
    Temperature2mMin,
    /// Daily maximum apparent temperature.
    ApparentTemperatureMax,
    /// Daily minimum apparent temperature.
    ApparentTemperatureMin,
    /// Sunrise time (ISO 8601 local time).
    Sunrise,
    /// Sunset time (ISO 8601 local time).
    Sunset,
    /// Daylight duration.
    DaylightDuration,
    /// Sunshine duration.
    SunshineDuration,
    /// Daily maximum UV index.
    UvIndexMax,
    /// Precipitation sum.
    PrecipitationSum,
    /// Rain sum.
    RainSum,
    /// Shower sum.
    ShowersSum,
    /// Snowfall sum.
    SnowfallSum,
    /// Hours with precipitation.
    PrecipitationHours,
    /// Daily maximum precipitation probability.
    PrecipitationProbabilityMax,
    /// Daily maximum wind speed at 10 m.
    WindSpeed10mMax,
    /// Daily maximum wind gust speed at 10 m.
    WindGusts10mMax,
    /// Dominant wind direction at 10 m.
    WindDirection10mDominant,

    // Air quality.
    /// Particulate matter up to 10 µm.
    Pm10,
    /// Particulate matter up to 2.5 µm.
    Pm2_5,
    /// Carbon monoxide concentration.
    CarbonMonoxide,
    /// Nitrogen dioxide concentration.
    NitrogenDioxide,
    /// Sulphur dioxide concentration.
    SulphurDioxide,
    /// Ozone concentration.
    Ozone,
    /// Aerosol optical depth at 550 nm.
    AerosolOpticalDepth,
    /// Saharan dust concentration.
    Dust,
    /// Ammonia concentration.
    Ammonia,
    /// Alder pollen concentration.
    AlderPollen,
    /// Birch pollen concentration.
    BirchPollen,
    /// Grass pollen concentration.
    GrassPollen,
    /// Mugwort pollen concentration.
    MugwortPollen,
    /// Olive pollen concentration.
    OlivePollen,
    /// Ragweed pollen concentration.
    RagweedPollen,
    /// European air quality index.
    EuropeanAqi,
    /// United States air quality index.
    UsAqi,
}

/// Ordered map from field to value, as carried by snapshots.
pub type FieldMap = BTreeMap<Field, PointValue>;

impl Field {
    /// Every understood field, in [`FieldMap`] iteration order.
    pub const ALL: &'static [Field] = &[
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
        Field::PrecipitationProbability,
        Field::UvIndex,
        Field::UvIndexClearSky,
        Field::Visibility,
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
        Field::EuropeanAqi,
        Field::UsAqi,
    ];

    /// The exact payload key (also the id segment) of this field.
    ///
    /// # Examples
    ///
    /// ```
    /// use meteotree_types::Field;
    ///
    /// assert_eq!(Field::Temperature2m.key(), "temperature_2m");
    /// assert_eq!(Field::WindGusts10mMax.key(), "wind_gusts_10m_max");
    /// ```
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Field::Temperature2m => "temperature_2m",
            Field::RelativeHumidity2m => "relative_humidity_2m",
            Field::ApparentTemperature => "apparent_temperature",
            Field::IsDay => "is_day",
            Field::Precipitation => "precipitation",
            Field::Rain => "rain",
            Field::Showers => "showers",
            Field::Snowfall => "snowfall",
            Field::WeatherCode => "weather_code",
            Field::CloudCover => "cloud_cover",
            Field::PressureMsl => "pressure_msl",
            Field::SurfacePressure => "surface_pressure",
            Field::WindSpeed10m => "wind_speed_10m",
            Field::WindDirection10m => "wind_direction_10m",
            Field::WindGusts10m => "wind_gusts_10m",
            Field::PrecipitationProbability => "precipitation_probability",
            Field::UvIndex => "uv_index",
            Field::UvIndexClearSky => "uv_index_clear_sky",
            Field::Visibility => "visibility",
            Field::Temperature2mMax => "temperature_2m_max",
            Field::Temperature2mMin => "temperature_2m_min",
            Field::ApparentTemperatureMax => "apparent_temperature_max",
            Field::ApparentTemperatureMin => "apparent_temperature_min",
            Field::Sunrise => "sunrise",
            Field::Sunset => "sunset",
            Field::DaylightDuration => "daylight_duration",
            Field::SunshineDuration => "sunshine_duration",
            Field::UvIndexMax => "uv_index_max",
            Field::PrecipitationSum => "precipitation_sum",
            Field::RainSum => "rain_sum",
            Field::ShowersSum => "showers_sum",
            Field::SnowfallSum => "snowfall_sum",
            Field::PrecipitationHours => "precipitation_hours",
            Field::PrecipitationProbabilityMax => "precipitation_probability_max",
            Field::WindSpeed10mMax => "wind_speed_10m_max",
            Field::WindGusts10mMax => "wind_gusts_10m_max",
            Field::WindDirection10mDominant => "wind_direction_10m_dominant",
            Field::Pm10 => "pm10",
            Field::Pm2_5 => "pm2_5",
            Field::CarbonMonoxide => "carbon_monoxide",
            Field::NitrogenDioxide => "nitrogen_dioxide",
            Field::SulphurDioxide => "sulphur_dioxide",
            Field::Ozone => "ozone",
            Field::AerosolOpticalDepth => "aerosol_optical_depth",
            Field::Dust => "dust",
            Field::Ammonia => "ammonia",
            Field::AlderPollen => "alder_pollen",
            Field::BirchPollen => "birch_pollen",
            Field::GrassPollen => "grass_pollen",
            Field::MugwortPollen => "mugwort_pollen",
            Field::OlivePollen => "olive_pollen",
            Field::RagweedPollen => "ragweed_pollen",
            Field::EuropeanAqi => "european_aqi",
            Field::UsAqi => "us_aqi",
        }
    }

    /// Look up a field by its exact payload key.
    ///
    /// Unknown keys return `None`; the ingest layer skips them.
    ///
    /// # Examples
    ///
    /// ```
    /// use meteotree_types::Field;
    ///
    /// assert_eq!(Field::from_key("weather_code"), Some(Field::WeatherCode));
    /// assert_eq!(Field::from_key("soil_moisture_0_to_1cm"), None);
    /// ```
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Field::ALL.iter().copied().find(|field| field.key() == key)
    }

    /// The value kind this field is declared to carry.
    ///
    /// A payload value of a different runtime kind is rejected by the
    /// synchronizer rather than written.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Field::IsDay => ValueKind::Bool,
            Field::Sunrise | Field::Sunset => ValueKind::Text,
            _ => ValueKind::Number,
        }
    }

    /// Display unit under the given unit system, if the field has one.
    ///
    /// This is an exact per-field table; fields without a natural unit
    /// (codes, indices, flags, times) return `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use meteotree_types::{Field, UnitSystem};
    ///
    /// assert_eq!(Field::Temperature2m.unit(UnitSystem::Metric), Some("°C"));
    /// assert_eq!(Field::Temperature2m.unit(UnitSystem::Imperial), Some("°F"));
    /// assert_eq!(Field::WindGusts10m.unit(UnitSystem::Metric), Some("km/h"));
    /// assert_eq!(Field::WeatherCode.unit(UnitSystem::Metric), None);
    /// ```
    #[must_use]
    pub fn unit(&self, units: UnitSystem) -> Option<&'static str> {
        let metric = matches!(units, UnitSystem::Metric);
        match self {
            Field::Temperature2m
            | Field::ApparentTemperature
            | Field::Temperature2mMax
            | Field::Temperature2mMin
            | Field::ApparentTemperatureMax
            | Field::ApparentTemperatureMin => Some(if metric { "°C" } else { "°F" }),
            Field::RelativeHumidity2m
            | Field::CloudCover
            | Field::PrecipitationProbability
            | Field::PrecipitationProbabilityMax => Some("%"),
            Field::Precipitation
            | Field::Rain
            | Field::Showers
            | Field::PrecipitationSum
            | Field::RainSum
            | Field::ShowersSum => Some(if metric { "mm" } else { "inch" }),
            Field::Snowfall | Field::SnowfallSum => Some(if metric { "cm" } else { "inch" }),
            Field::PressureMsl | Field::SurfacePressure => Some("hPa"),
            Field::WindSpeed10m
            | Field::WindGusts10m
            | Field::WindSpeed10mMax
            | Field::WindGusts10mMax => Some(if metric { "km/h" } else { "mph" }),
            Field::WindDirection10m | Field::WindDirection10mDominant => Some("°"),
            Field::Visibility => Some(if metric { "m" } else { "ft" }),
            Field::DaylightDuration | Field::SunshineDuration => Some("s"),
            Field::PrecipitationHours => Some("h"),
            Field::Pm10
            | Field::Pm2_5
            | Field::CarbonMonoxide
            | Field::NitrogenDioxide
            | Field::SulphurDioxide
            | Field::Ozone
            | Field::Dust
            | Field::Ammonia => Some("μg/m³"),
            Field::AlderPollen
            | Field::BirchPollen
            | Field::GrassPollen
            | Field::MugwortPollen
            | Field::OlivePollen
            | Field::RagweedPollen => Some("grains/m³"),
            Field::IsDay
            | Field::WeatherCode
            | Field::UvIndex
            | Field::UvIndexClearSky
            | Field::UvIndexMax
            | Field::Sunrise
            | Field::Sunset
            | Field::AerosolOpticalDepth
            | Field::EuropeanAqi
            | Field::UsAqi => None,
        }
    }

    /// Whether this field is a pollen concentration.
    #[must_use]
    pub fn is_pollen(&self) -> bool {
        matches!(
            self,
            Field::AlderPollen
                | Field::BirchPollen
                | Field::GrassPollen
                | Field::MugwortPollen
                | Field::OlivePollen
                | Field::RagweedPollen
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Field {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.key())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Field {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let key = String::deserialize(deserializer)?;
        Field::from_key(&key)
            .ok_or_else(|| serde::de::Error::custom(format_args!("unknown field key {key:?}")))
    }
}
