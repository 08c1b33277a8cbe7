//! Translation tables for point labels and derived texts.
//!
//! Lookup is a three-step fallback: the configured locale first, then
//! English, then the raw key itself. Missing translations therefore surface
//! as keys in the tree rather than failing the sync.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Time, Weekday};

/// Supported display locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English (default).
    #[default]
    En,
    /// German.
    De,
}

/// Error for locale strings outside the supported set.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported locale '{0}', expected one of: en, de")]
pub struct UnknownLocale(pub String);

impl Locale {
    /// Lowercase language tag.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::De => "de",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "de" => Ok(Locale::De),
            other => Err(UnknownLocale(other.to_string())),
        }
    }
}

/// Resolves translation keys against the static per-locale tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct Translator {
    locale: Locale,
}

impl Translator {
    /// Create a translator for the given locale.
    #[must_use]
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// The configured locale.
    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Translate a key, falling back to English and then to the key itself.
    #[must_use]
    pub fn translate(&self, key: &str) -> String {
        lookup(self.locale, key)
            .or_else(|| lookup(Locale::En, key))
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }

    /// Translated weekday name.
    #[must_use]
    pub fn weekday(&self, weekday: Weekday) -> String {
        self.translate(weekday_key(weekday))
    }

    /// Locale-typical time-of-day rendering: 12-hour clock for English,
    /// 24-hour for German.
    #[must_use]
    pub fn format_time(&self, time: Time) -> String {
        match self.locale {
            Locale::De => format!("{:02}:{:02}", time.hour(), time.minute()),
            Locale::En => {
                let (hour, period) = match time.hour() {
                    0 => (12, "AM"),
                    hour @ 1..=11 => (hour, "AM"),
                    12 => (12, "PM"),
                    hour => (hour - 12, "PM"),
                };
                format!("{}:{:02} {}", hour, time.minute(), period)
            }
        }
    }
}

fn weekday_key(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "monday",
        Weekday::Tuesday => "tuesday",
        Weekday::Wednesday => "wednesday",
        Weekday::Thursday => "thursday",
        Weekday::Friday => "friday",
        Weekday::Saturday => "saturday",
        Weekday::Sunday => "sunday",
    }
}

fn lookup(locale: Locale, key: &str) -> Option<&'static str> {
    match locale {
        Locale::En => english(key),
        Locale::De => german(key),
    }
}

fn english(key: &str) -> Option<&'static str> {
    let text = match key {
        // Raw snapshot fields
        "temperature_2m" => "Temperature",
        "relative_humidity_2m" => "Relative humidity",
        "apparent_temperature" => "Feels like",
        "is_day" => "Daylight",
        "precipitation" => "Precipitation",
        "rain" => "Rain",
        "showers" => "Showers",
        "snowfall" => "Snowfall",
        "weather_code" => "Weather code",
        "cloud_cover" => "Cloud cover",
        "pressure_msl" => "Sea-level pressure",
        "surface_pressure" => "Surface pressure",
        "wind_speed_10m" => "Wind speed",
        "wind_direction_10m" => "Wind direction",
        "wind_gusts_10m" => "Wind gusts",
        "precipitation_probability" => "Precipitation probability",
        "uv_index" => "UV index",
        "uv_index_clear_sky" => "Clear-sky UV index",
        "visibility" => "Visibility",
        "temperature_2m_max" => "Maximum temperature",
        "temperature_2m_min" => "Minimum temperature",
        "apparent_temperature_max" => "Maximum feels like",
        "apparent_temperature_min" => "Minimum feels like",
        "sunrise" => "Sunrise",
        "sunset" => "Sunset",
        "daylight_duration" => "Daylight duration",
        "sunshine_duration" => "Sunshine duration",
        "uv_index_max" => "Maximum UV index",
        "precipitation_sum" => "Precipitation sum",
        "rain_sum" => "Rain sum",
        "showers_sum" => "Showers sum",
        "snowfall_sum" => "Snowfall sum",
        "precipitation_hours" => "Precipitation hours",
        "precipitation_probability_max" => "Maximum precipitation probability",
        "wind_speed_10m_max" => "Maximum wind speed",
        "wind_gusts_10m_max" => "Maximum wind gusts",
        "wind_direction_10m_dominant" => "Dominant wind direction",
        "pm10" => "Particulate matter (PM10)",
        "pm2_5" => "Particulate matter (PM2.5)",
        "carbon_monoxide" => "Carbon monoxide",
        "nitrogen_dioxide" => "Nitrogen dioxide",
        "sulphur_dioxide" => "Sulphur dioxide",
        "ozone" => "Ozone",
        "aerosol_optical_depth" => "Aerosol optical depth",
        "dust" => "Dust",
        "ammonia" => "Ammonia",
        "alder_pollen" => "Alder pollen",
        "birch_pollen" => "Birch pollen",
        "grass_pollen" => "Grass pollen",
        "mugwort_pollen" => "Mugwort pollen",
        "olive_pollen" => "Olive pollen",
        "ragweed_pollen" => "Ragweed pollen",
        "european_aqi" => "European AQI",
        "us_aqi" => "US AQI",

        // Derived points
        "weather_text" => "Conditions",
        "icon_url" => "Weather icon",
        "wind_direction_text" => "Wind direction",
        "wind_direction_icon" => "Wind direction icon",
        "wind_direction_dominant_text" => "Dominant wind direction",
        "wind_direction_dominant_icon" => "Dominant wind direction icon",
        "wind_gusts_icon" => "Wind gusts icon",
        "wind_gusts_max_icon" => "Maximum wind gusts icon",
        "dew_point_2m" => "Dew point",
        "sunshine_hours" => "Sunshine hours",
        "moonrise" => "Moonrise",
        "moonset" => "Moonset",
        "moon_phase" => "Moon phase",
        "moon_phase_icon" => "Moon phase icon",
        "moon_phase_fraction" => "Moon cycle position",
        "weekday" => "Weekday",
        "alder_pollen_text" => "Alder pollen severity",
        "birch_pollen_text" => "Birch pollen severity",
        "grass_pollen_text" => "Grass pollen severity",
        "mugwort_pollen_text" => "Mugwort pollen severity",
        "olive_pollen_text" => "Olive pollen severity",
        "ragweed_pollen_text" => "Ragweed pollen severity",
        "last_sync" => "Last successful sync",

        // WMO condition texts
        "wmo_0" => "Clear sky",
        "wmo_1" => "Mainly clear",
        "wmo_2" => "Partly cloudy",
        "wmo_3" => "Overcast",
        "wmo_45" => "Fog",
        "wmo_48" => "Depositing rime fog",
        "wmo_51" => "Light drizzle",
        "wmo_53" => "Moderate drizzle",
        "wmo_55" => "Dense drizzle",
        "wmo_56" => "Light freezing drizzle",
        "wmo_57" => "Dense freezing drizzle",
        "wmo_61" => "Slight rain",
        "wmo_63" => "Moderate rain",
        "wmo_65" => "Heavy rain",
        "wmo_66" => "Light freezing rain",
        "wmo_67" => "Heavy freezing rain",
        "wmo_71" => "Slight snowfall",
        "wmo_73" => "Moderate snowfall",
        "wmo_75" => "Heavy snowfall",
        "wmo_77" => "Snow grains",
        "wmo_80" => "Slight rain showers",
        "wmo_81" => "Moderate rain showers",
        "wmo_82" => "Violent rain showers",
        "wmo_85" => "Slight snow showers",
        "wmo_86" => "Heavy snow showers",
        "wmo_95" => "Thunderstorm",
        "wmo_96" => "Thunderstorm with slight hail",
        "wmo_99" => "Thunderstorm with heavy hail",
        "wmo_unknown" => "Unknown conditions",

        // Moon phases
        "moon_new" => "New moon",
        "moon_waxing_crescent" => "Waxing crescent",
        "moon_first_quarter" => "First quarter",
        "moon_waxing_gibbous" => "Waxing gibbous",
        "moon_full" => "Full moon",
        "moon_waning_gibbous" => "Waning gibbous",
        "moon_last_quarter" => "Last quarter",
        "moon_waning_crescent" => "Waning crescent",

        // Pollen severities
        "pollen_none" => "none",
        "pollen_low" => "low",
        "pollen_moderate" => "moderate",
        "pollen_high" => "high",

        // Weekdays
        "monday" => "Monday",
        "tuesday" => "Tuesday",
        "wednesday" => "Wednesday",
        "thursday" => "Thursday",
        "friday" => "Friday",
        "saturday" => "Saturday",
        "sunday" => "Sunday",

        _ => return None,
    };
    Some(text)
}

fn german(key: &str) -> Option<&'static str> {
    let text = match key {
        // Raw snapshot fields
        "temperature_2m" => "Temperatur",
        "relative_humidity_2m" => "Relative Luftfeuchtigkeit",
        "apparent_temperature" => "Gefühlte Temperatur",
        "is_day" => "Tageslicht",
        "precipitation" => "Niederschlag",
        "rain" => "Regen",
        "showers" => "Schauer",
        "snowfall" => "Schneefall",
        "weather_code" => "Wettercode",
        "cloud_cover" => "Bewölkung",
        "pressure_msl" => "Luftdruck (Meereshöhe)",
        "surface_pressure" => "Luftdruck (Boden)",
        "wind_speed_10m" => "Windgeschwindigkeit",
        "wind_direction_10m" => "Windrichtung",
        "wind_gusts_10m" => "Windböen",
        "precipitation_probability" => "Niederschlagswahrscheinlichkeit",
        "uv_index" => "UV-Index",
        "uv_index_clear_sky" => "UV-Index (wolkenlos)",
        "visibility" => "Sichtweite",
        "temperature_2m_max" => "Höchsttemperatur",
        "temperature_2m_min" => "Tiefsttemperatur",
        "apparent_temperature_max" => "Gefühlte Höchsttemperatur",
        "apparent_temperature_min" => "Gefühlte Tiefsttemperatur",
        "sunrise" => "Sonnenaufgang",
        "sunset" => "Sonnenuntergang",
        "daylight_duration" => "Tageslichtdauer",
        "sunshine_duration" => "Sonnenscheindauer",
        "uv_index_max" => "Maximaler UV-Index",
        "precipitation_sum" => "Niederschlagssumme",
        "rain_sum" => "Regensumme",
        "showers_sum" => "Schauersumme",
        "snowfall_sum" => "Schneefallsumme",
        "precipitation_hours" => "Niederschlagsstunden",
        "precipitation_probability_max" => "Maximale Niederschlagswahrscheinlichkeit",
        "wind_speed_10m_max" => "Maximale Windgeschwindigkeit",
        "wind_gusts_10m_max" => "Maximale Windböen",
        "wind_direction_10m_dominant" => "Vorherrschende Windrichtung",
        "pm10" => "Feinstaub (PM10)",
        "pm2_5" => "Feinstaub (PM2,5)",
        "carbon_monoxide" => "Kohlenmonoxid",
        "nitrogen_dioxide" => "Stickstoffdioxid",
        "sulphur_dioxide" => "Schwefeldioxid",
        "ozone" => "Ozon",
        "aerosol_optical_depth" => "Aerosol-optische Dichte",
        "dust" => "Staub",
        "ammonia" => "Ammoniak",
        "alder_pollen" => "Erlenpollen",
        "birch_pollen" => "Birkenpollen",
        "grass_pollen" => "Gräserpollen",
        "mugwort_pollen" => "Beifußpollen",
        "olive_pollen" => "Olivenpollen",
        "ragweed_pollen" => "Ambrosiapollen",
        "european_aqi" => "Europäischer Luftqualitätsindex",
        "us_aqi" => "US-Luftqualitätsindex",

        // Derived points
        "weather_text" => "Wetterlage",
        "icon_url" => "Wettersymbol",
        "wind_direction_text" => "Windrichtung",
        "wind_direction_icon" => "Windrichtungssymbol",
        "wind_direction_dominant_text" => "Vorherrschende Windrichtung",
        "wind_direction_dominant_icon" => "Symbol der vorherrschenden Windrichtung",
        "wind_gusts_icon" => "Windböensymbol",
        "wind_gusts_max_icon" => "Symbol der maximalen Windböen",
        "dew_point_2m" => "Taupunkt",
        "sunshine_hours" => "Sonnenstunden",
        "moonrise" => "Mondaufgang",
        "moonset" => "Monduntergang",
        "moon_phase" => "Mondphase",
        "moon_phase_icon" => "Mondphasensymbol",
        "moon_phase_fraction" => "Mondzyklusposition",
        "weekday" => "Wochentag",
        "alder_pollen_text" => "Erlenpollen-Belastung",
        "birch_pollen_text" => "Birkenpollen-Belastung",
        "grass_pollen_text" => "Gräserpollen-Belastung",
        "mugwort_pollen_text" => "Beifußpollen-Belastung",
        "olive_pollen_text" => "Olivenpollen-Belastung",
        "ragweed_pollen_text" => "Ambrosiapollen-Belastung",
        "last_sync" => "Letzte erfolgreiche Synchronisierung",

        // WMO condition texts
        "wmo_0" => "Klarer Himmel",
        "wmo_1" => "Überwiegend klar",
        "wmo_2" => "Teilweise bewölkt",
        "wmo_3" => "Bedeckt",
        "wmo_45" => "Nebel",
        "wmo_48" => "Raureifnebel",
        "wmo_51" => "Leichter Nieselregen",
        "wmo_53" => "Mäßiger Nieselregen",
        "wmo_55" => "Starker Nieselregen",
        "wmo_56" => "Leichter gefrierender Nieselregen",
        "wmo_57" => "Starker gefrierender Nieselregen",
        "wmo_61" => "Leichter Regen",
        "wmo_63" => "Mäßiger Regen",
        "wmo_65" => "Starker Regen",
        "wmo_66" => "Leichter gefrierender Regen",
        "wmo_67" => "Starker gefrierender Regen",
        "wmo_71" => "Leichter Schneefall",
        "wmo_73" => "Mäßiger Schneefall",
        "wmo_75" => "Starker Schneefall",
        "wmo_77" => "Schneegriesel",
        "wmo_80" => "Leichte Regenschauer",
        "wmo_81" => "Mäßige Regenschauer",
        "wmo_82" => "Heftige Regenschauer",
        "wmo_85" => "Leichte Schneeschauer",
        "wmo_86" => "Starke Schneeschauer",
        "wmo_95" => "Gewitter",
        "wmo_96" => "Gewitter mit leichtem Hagel",
        "wmo_99" => "Gewitter mit starkem Hagel",
        "wmo_unknown" => "Unbekannte Bedingungen",

        // Moon phases
        "moon_new" => "Neumond",
        "moon_waxing_crescent" => "Zunehmende Sichel",
        "moon_first_quarter" => "Erstes Viertel",
        "moon_waxing_gibbous" => "Zunehmender Mond",
        "moon_full" => "Vollmond",
        "moon_waning_gibbous" => "Abnehmender Mond",
        "moon_last_quarter" => "Letztes Viertel",
        "moon_waning_crescent" => "Abnehmende Sichel",

        // Pollen severities
        "pollen_none" => "keine",
        "pollen_low" => "niedrig",
        "pollen_moderate" => "mäßig",
        "pollen_high" => "hoch",

        // Weekdays
        "monday" => "Montag",
        "tuesday" => "Dienstag",
        "wednesday" => "Mittwoch",
        "thursday" => "Donnerstag",
        "friday" => "Freitag",
        "saturday" => "Samstag",
        "sunday" => "Sonntag",

        _ => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_parsing() {
        assert_eq!("en".parse(), Ok(Locale::En));
        assert_eq!("DE".parse(), Ok(Locale::De));
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_translate_known_keys() {
        let en = Translator::new(Locale::En);
        let de = Translator::new(Locale::De);
        assert_eq!(en.translate("wmo_3"), "Overcast");
        assert_eq!(de.translate("wmo_3"), "Bedeckt");
        assert_eq!(en.translate("pollen_low"), "low");
        assert_eq!(de.translate("pollen_low"), "niedrig");
        assert_eq!(en.translate("temperature_2m"), "Temperature");
    }

    #[test]
    fn test_translate_unknown_key_returns_key() {
        let de = Translator::new(Locale::De);
        assert_eq!(de.translate("soil_temperature_0cm"), "soil_temperature_0cm");
    }

    #[test]
    fn test_every_weather_key_translated_in_both_locales() {
        for code in [
            0, 1, 2, 3, 45, 48, 51, 53, 55, 56, 57, 61, 63, 65, 66, 67, 71, 73, 75, 77, 80,
            81, 82, 85, 86, 95, 96, 99,
        ] {
            let key = crate::codes::weather_code_info(code).label_key;
            assert!(english(key).is_some(), "missing en entry for {key}");
            assert!(german(key).is_some(), "missing de entry for {key}");
        }
    }

    #[test]
    fn test_every_field_label_translated_in_both_locales() {
        for field in meteotree_types::Field::ALL {
            let key = field.key();
            assert!(english(key).is_some(), "missing en entry for {key}");
            assert!(german(key).is_some(), "missing de entry for {key}");
        }
    }

    #[test]
    fn test_weekday_names() {
        let en = Translator::new(Locale::En);
        let de = Translator::new(Locale::De);
        assert_eq!(en.weekday(Weekday::Wednesday), "Wednesday");
        assert_eq!(de.weekday(Weekday::Wednesday), "Mittwoch");
    }

    #[test]
    fn test_time_formatting() {
        let en = Translator::new(Locale::En);
        let de = Translator::new(Locale::De);
        let morning = Time::from_hms(6, 5, 0).unwrap();
        let evening = Time::from_hms(18, 45, 0).unwrap();
        let midnight = Time::from_hms(0, 30, 0).unwrap();

        assert_eq!(en.format_time(morning), "6:05 AM");
        assert_eq!(en.format_time(evening), "6:45 PM");
        assert_eq!(en.format_time(midnight), "12:30 AM");
        assert_eq!(de.format_time(morning), "06:05");
        assert_eq!(de.format_time(evening), "18:45");
    }
}
