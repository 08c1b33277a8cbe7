//! WMO weather interpretation code tables.
//!
//! Open-Meteo reports conditions as WMO 4677-derived codes. This module maps
//! each code to a translation key and an icon stem; unrecognized codes fall
//! back to an explicit `unknown` entry instead of failing.

/// Lookup result for one WMO weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherCodeInfo {
    /// Translation key for the human-readable condition text.
    pub label_key: &'static str,
    /// Icon file stem; day/night variants are derived from it.
    pub icon: &'static str,
}

impl WeatherCodeInfo {
    /// Relative icon path for the day or night variant.
    #[must_use]
    pub fn icon_path(&self, day: bool) -> String {
        let variant = if day { "day" } else { "night" };
        format!("icons/weather/{}-{}.svg", self.icon, variant)
    }
}

/// Fallback entry for codes outside the published WMO set.
pub const UNKNOWN_WEATHER: WeatherCodeInfo = WeatherCodeInfo {
    label_key: "wmo_unknown",
    icon: "unknown",
};

/// Resolve a WMO weather code to its text key and icon stem.
///
/// # Examples
///
/// ```
/// use meteotree_core::codes::{weather_code_info, UNKNOWN_WEATHER};
///
/// assert_eq!(weather_code_info(3).label_key, "wmo_3");
/// assert_eq!(weather_code_info(3).icon_path(true), "icons/weather/overcast-day.svg");
/// assert_eq!(weather_code_info(42), UNKNOWN_WEATHER);
/// ```
#[must_use]
pub fn weather_code_info(code: i64) -> WeatherCodeInfo {
    let (label_key, icon) = match code {
        0 => ("wmo_0", "clear"),
        1 => ("wmo_1", "mainly-clear"),
        2 => ("wmo_2", "partly-cloudy"),
        3 => ("wmo_3", "overcast"),
        45 => ("wmo_45", "fog"),
        48 => ("wmo_48", "rime-fog"),
        51 => ("wmo_51", "drizzle-light"),
        53 => ("wmo_53", "drizzle"),
        55 => ("wmo_55", "drizzle-dense"),
        56 => ("wmo_56", "freezing-drizzle-light"),
        57 => ("wmo_57", "freezing-drizzle"),
        61 => ("wmo_61", "rain-light"),
        63 => ("wmo_63", "rain"),
        65 => ("wmo_65", "rain-heavy"),
        66 => ("wmo_66", "freezing-rain-light"),
        67 => ("wmo_67", "freezing-rain"),
        71 => ("wmo_71", "snow-light"),
        73 => ("wmo_73", "snow"),
        75 => ("wmo_75", "snow-heavy"),
        77 => ("wmo_77", "snow-grains"),
        80 => ("wmo_80", "showers-light"),
        81 => ("wmo_81", "showers"),
        82 => ("wmo_82", "showers-violent"),
        85 => ("wmo_85", "snow-showers-light"),
        86 => ("wmo_86", "snow-showers"),
        95 => ("wmo_95", "thunderstorm"),
        96 => ("wmo_96", "thunderstorm-hail-light"),
        99 => ("wmo_99", "thunderstorm-hail"),
        _ => return UNKNOWN_WEATHER,
    };
    WeatherCodeInfo { label_key, icon }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(weather_code_info(0).icon, "clear");
        assert_eq!(weather_code_info(3).label_key, "wmo_3");
        assert_eq!(weather_code_info(95).icon, "thunderstorm");
        assert_eq!(weather_code_info(99).label_key, "wmo_99");
    }

    #[test]
    fn test_unknown_code_falls_back() {
        assert_eq!(weather_code_info(-1), UNKNOWN_WEATHER);
        assert_eq!(weather_code_info(42), UNKNOWN_WEATHER);
        assert_eq!(weather_code_info(1000), UNKNOWN_WEATHER);
        assert_eq!(
            UNKNOWN_WEATHER.icon_path(false),
            "icons/weather/unknown-night.svg"
        );
    }

    #[test]
    fn test_day_night_variants() {
        let info = weather_code_info(2);
        assert_eq!(info.icon_path(true), "icons/weather/partly-cloudy-day.svg");
        assert_eq!(info.icon_path(false), "icons/weather/partly-cloudy-night.svg");
    }
}
