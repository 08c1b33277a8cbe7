//! Derived metric calculations.
//!
//! Pure functions that turn raw snapshot readings into human-facing values:
//! dew point, compass direction, wind-gust severity bands, pollen severity,
//! and lunar phase buckets. No state, no I/O.
//!
//! # Example
//!
//! ```
//! use meteotree_core::calc::{dew_point, CompassPoint};
//! use meteotree_types::UnitSystem;
//!
//! assert_eq!(dew_point(20.0, 50.0, UnitSystem::Metric), Some(9.3));
//! assert_eq!(CompassPoint::from_degrees(90.0), Some(CompassPoint::East));
//! ```

use meteotree_types::UnitSystem;

/// Magnus approximation coefficients.
const MAGNUS_A: f64 = 17.625;
const MAGNUS_B: f64 = 243.04;

/// Kilometres per mile, used to scale km/h thresholds for imperial input.
const KM_PER_MILE: f64 = 1.60934;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Dew point from air temperature and relative humidity, rounded to one
/// decimal in the input temperature unit.
///
/// Imperial temperatures are converted to Celsius for the Magnus formula and
/// back afterwards. Returns `None` for non-finite inputs or a humidity of
/// zero or below; the caller skips the derived point instead of writing a
/// sentinel.
#[must_use]
pub fn dew_point(temperature: f64, relative_humidity: f64, units: UnitSystem) -> Option<f64> {
    if !temperature.is_finite() || !relative_humidity.is_finite() || relative_humidity <= 0.0 {
        return None;
    }

    let temp_c = match units {
        UnitSystem::Metric => temperature,
        UnitSystem::Imperial => (temperature - 32.0) * 5.0 / 9.0,
    };

    let alpha = (relative_humidity / 100.0).ln() + MAGNUS_A * temp_c / (MAGNUS_B + temp_c);
    let dew_c = MAGNUS_B * alpha / (MAGNUS_A - alpha);

    let dew = match units {
        UnitSystem::Metric => dew_c,
        UnitSystem::Imperial => dew_c * 9.0 / 5.0 + 32.0,
    };

    if !dew.is_finite() {
        return None;
    }
    Some(round1(dew))
}

/// Sunshine duration converted from seconds to hours, one decimal.
#[must_use]
pub fn sunshine_hours(seconds: f64) -> Option<f64> {
    if !seconds.is_finite() {
        return None;
    }
    Some(round1(seconds / 3600.0))
}

/// Eight-point compass rose.
///
/// Directions are 45° sectors starting at north: `[0°, 45°)` is north,
/// `[45°, 90°)` is north-east, and so on. Inputs outside `[0, 360)` are
/// normalized first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompassPoint {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl CompassPoint {
    /// All points in rose order, north first.
    pub const ALL: [CompassPoint; 8] = [
        CompassPoint::North,
        CompassPoint::NorthEast,
        CompassPoint::East,
        CompassPoint::SouthEast,
        CompassPoint::South,
        CompassPoint::SouthWest,
        CompassPoint::West,
        CompassPoint::NorthWest,
    ];

    /// Classify a wind direction in degrees.
    ///
    /// Returns `None` only for non-finite input.
    #[must_use]
    pub fn from_degrees(degrees: f64) -> Option<Self> {
        if !degrees.is_finite() {
            return None;
        }
        let normalized = degrees.rem_euclid(360.0);
        let index = (normalized / 45.0) as usize % 8;
        Some(Self::ALL[index])
    }

    /// Position on the rose, north = 0.
    #[must_use]
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|p| p == self).unwrap_or(0)
    }

    /// Short label, e.g. `"NE"`.
    #[must_use]
    pub fn abbreviation(&self) -> &'static str {
        match self {
            CompassPoint::North => "N",
            CompassPoint::NorthEast => "NE",
            CompassPoint::East => "E",
            CompassPoint::SouthEast => "SE",
            CompassPoint::South => "S",
            CompassPoint::SouthWest => "SW",
            CompassPoint::West => "W",
            CompassPoint::NorthWest => "NW",
        }
    }

    /// Relative icon path for this direction.
    #[must_use]
    pub fn icon_path(&self) -> &'static str {
        match self {
            CompassPoint::North => "icons/wind/n.svg",
            CompassPoint::NorthEast => "icons/wind/ne.svg",
            CompassPoint::East => "icons/wind/e.svg",
            CompassPoint::SouthEast => "icons/wind/se.svg",
            CompassPoint::South => "icons/wind/s.svg",
            CompassPoint::SouthWest => "icons/wind/sw.svg",
            CompassPoint::West => "icons/wind/w.svg",
            CompassPoint::NorthWest => "icons/wind/nw.svg",
        }
    }
}

/// Wind-gust severity bands.
///
/// Band boundaries follow the Beaufort gale thresholds in km/h
/// (39/50/62/75/89); a speed exactly at a threshold belongs to the higher
/// band. Imperial speeds are compared against the thresholds divided by
/// 1.60934.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GustBand {
    /// Below strong-breeze strength.
    Light,
    /// 39–50 km/h.
    StrongBreeze,
    /// 50–62 km/h.
    NearGale,
    /// 62–75 km/h.
    Gale,
    /// 75–89 km/h.
    StrongGale,
    /// 89 km/h and above.
    Storm,
}

/// Gust band thresholds in km/h, calmest boundary first.
const GUST_THRESHOLDS_KMH: [f64; 5] = [39.0, 50.0, 62.0, 75.0, 89.0];

impl GustBand {
    /// All bands, calmest first.
    pub const ALL: [GustBand; 6] = [
        GustBand::Light,
        GustBand::StrongBreeze,
        GustBand::NearGale,
        GustBand::Gale,
        GustBand::StrongGale,
        GustBand::Storm,
    ];

    /// Classify a gust speed in the given unit system.
    ///
    /// Returns `None` only for non-finite input.
    #[must_use]
    pub fn from_speed(speed: f64, units: UnitSystem) -> Option<Self> {
        if !speed.is_finite() {
            return None;
        }
        let divisor = match units {
            UnitSystem::Metric => 1.0,
            UnitSystem::Imperial => KM_PER_MILE,
        };
        let mut band = 0;
        for (i, threshold) in GUST_THRESHOLDS_KMH.iter().enumerate() {
            if speed >= threshold / divisor {
                band = i + 1;
            }
        }
        Some(Self::ALL[band])
    }

    /// Band position, calmest = 0.
    #[must_use]
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|b| b == self).unwrap_or(0)
    }

    /// Relative icon path for this band.
    #[must_use]
    pub fn icon_path(&self) -> &'static str {
        match self {
            GustBand::Light => "icons/gusts/light.svg",
            GustBand::StrongBreeze => "icons/gusts/strong-breeze.svg",
            GustBand::NearGale => "icons/gusts/near-gale.svg",
            GustBand::Gale => "icons/gusts/gale.svg",
            GustBand::StrongGale => "icons/gusts/strong-gale.svg",
            GustBand::Storm => "icons/gusts/storm.svg",
        }
    }
}

/// Pollen concentration thresholds in grains/m³.
///
/// Three ascending boundaries: at or above the first is [`PollenSeverity::Low`],
/// the second [`PollenSeverity::Moderate`], the third [`PollenSeverity::High`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollenThresholds([f64; 3]);

impl Default for PollenThresholds {
    fn default() -> Self {
        Self([1.0, 10.0, 50.0])
    }
}

impl PollenThresholds {
    /// Birch releases far more grains than other species; its boundaries
    /// sit an order of magnitude higher.
    #[must_use]
    pub fn birch() -> Self {
        Self([10.0, 100.0, 500.0])
    }
}

/// Pollen severity classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PollenSeverity {
    None,
    Low,
    Moderate,
    High,
}

impl PollenSeverity {
    /// Classify a concentration against the given thresholds.
    ///
    /// Returns `None` only for non-finite input.
    #[must_use]
    pub fn classify(concentration: f64, thresholds: PollenThresholds) -> Option<Self> {
        if !concentration.is_finite() {
            return None;
        }
        let [low, moderate, high] = thresholds.0;
        Some(if concentration >= high {
            PollenSeverity::High
        } else if concentration >= moderate {
            PollenSeverity::Moderate
        } else if concentration >= low {
            PollenSeverity::Low
        } else {
            PollenSeverity::None
        })
    }

    /// Translation key for the severity text.
    #[must_use]
    pub fn label_key(&self) -> &'static str {
        match self {
            PollenSeverity::None => "pollen_none",
            PollenSeverity::Low => "pollen_low",
            PollenSeverity::Moderate => "pollen_moderate",
            PollenSeverity::High => "pollen_high",
        }
    }
}

/// Lunar phase buckets over the synodic cycle.
///
/// The cycle fraction (0 = new moon, 0.5 = full moon) is divided into eight
/// contiguous buckets with boundaries at 0.03, 0.22, 0.28, 0.47, 0.53, 0.72,
/// 0.78 and 0.97; fractions at or above 0.97 wrap back to new.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    /// Classify a cycle fraction.
    ///
    /// Inputs outside `[0, 1)` are normalized; `None` only for non-finite
    /// input.
    #[must_use]
    pub fn from_fraction(fraction: f64) -> Option<Self> {
        if !fraction.is_finite() {
            return None;
        }
        let f = fraction.rem_euclid(1.0);
        Some(if f < 0.03 {
            MoonPhase::New
        } else if f < 0.22 {
            MoonPhase::WaxingCrescent
        } else if f < 0.28 {
            MoonPhase::FirstQuarter
        } else if f < 0.47 {
            MoonPhase::WaxingGibbous
        } else if f < 0.53 {
            MoonPhase::Full
        } else if f < 0.72 {
            MoonPhase::WaningGibbous
        } else if f < 0.78 {
            MoonPhase::LastQuarter
        } else if f < 0.97 {
            MoonPhase::WaningCrescent
        } else {
            MoonPhase::New
        })
    }

    /// Translation key for the phase label.
    #[must_use]
    pub fn label_key(&self) -> &'static str {
        match self {
            MoonPhase::New => "moon_new",
            MoonPhase::WaxingCrescent => "moon_waxing_crescent",
            MoonPhase::FirstQuarter => "moon_first_quarter",
            MoonPhase::WaxingGibbous => "moon_waxing_gibbous",
            MoonPhase::Full => "moon_full",
            MoonPhase::WaningGibbous => "moon_waning_gibbous",
            MoonPhase::LastQuarter => "moon_last_quarter",
            MoonPhase::WaningCrescent => "moon_waning_crescent",
        }
    }

    /// Relative icon path for this phase.
    #[must_use]
    pub fn icon_path(&self) -> &'static str {
        match self {
            MoonPhase::New => "icons/moon/new.svg",
            MoonPhase::WaxingCrescent => "icons/moon/waxing-crescent.svg",
            MoonPhase::FirstQuarter => "icons/moon/first-quarter.svg",
            MoonPhase::WaxingGibbous => "icons/moon/waxing-gibbous.svg",
            MoonPhase::Full => "icons/moon/full.svg",
            MoonPhase::WaningGibbous => "icons/moon/waning-gibbous.svg",
            MoonPhase::LastQuarter => "icons/moon/last-quarter.svg",
            MoonPhase::WaningCrescent => "icons/moon/waning-crescent.svg",
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every finite direction classifies to exactly one rose point.
        #[test]
        fn compass_total_over_finite_input(degrees in -1000.0f64..1000.0) {
            let point = CompassPoint::from_degrees(degrees);
            prop_assert!(point.is_some());
        }

        /// Band index never decreases as gust speed increases.
        #[test]
        fn gust_band_monotonic(a in 0.0f64..300.0, b in 0.0f64..300.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo_band = GustBand::from_speed(lo, UnitSystem::Metric).unwrap();
            let hi_band = GustBand::from_speed(hi, UnitSystem::Metric).unwrap();
            prop_assert!(lo_band.index() <= hi_band.index());
        }

        /// Severity never decreases as the concentration rises.
        #[test]
        fn pollen_monotonic(a in 0.0f64..1000.0, b in 0.0f64..1000.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo_sev = PollenSeverity::classify(lo, PollenThresholds::default()).unwrap();
            let hi_sev = PollenSeverity::classify(hi, PollenThresholds::default()).unwrap();
            prop_assert!(lo_sev <= hi_sev);
        }

        /// Every finite fraction lands in exactly one bucket.
        #[test]
        fn moon_phase_total_over_unit_interval(fraction in 0.0f64..1.0) {
            prop_assert!(MoonPhase::from_fraction(fraction).is_some());
        }
    }
}
