//! Astronomical almanac for lunar data.
//!
//! The synchronizer emits per-day moonrise/moonset times and the lunar cycle
//! position as derived points. Those come from an [`Almanac`], a pure
//! calculator with no side effects. [`StandardAlmanac`] implements the
//! classic low-precision lunar ephemeris; tests script exact values through
//! [`FixedAlmanac`](crate::mock::FixedAlmanac) instead.

use time::{Date, Duration, OffsetDateTime, Time, UtcOffset};

/// Moonrise and moonset for one civil day, in local time.
///
/// Either event can be absent: the moon rises about 50 minutes later each
/// day, so roughly once a month a civil day contains no rise (or no set).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoonTimes {
    /// Local moonrise time, if the moon rises on this day.
    pub rise: Option<Time>,
    /// Local moonset time, if the moon sets on this day.
    pub set: Option<Time>,
}

/// Provider of lunar rise/set times and cycle position.
///
/// Implementations must be pure functions of their inputs.
pub trait Almanac: Send + Sync {
    /// Moonrise and moonset for the civil day `date` at the given
    /// coordinates, expressed in the day's local `offset`.
    fn moon_times(&self, date: Date, offset: UtcOffset, latitude: f64, longitude: f64)
    -> MoonTimes;

    /// Position in the synodic cycle at midday of `date`:
    /// 0 = new moon, 0.5 = full moon, always in `[0, 1)`.
    fn moon_phase(&self, date: Date) -> f64;
}

/// Low-precision lunar ephemeris.
///
/// Positions use the truncated ecliptic series (largest perturbation term
/// per element), good to a fraction of a degree. Rise and set are found by
/// scanning the day's altitude curve in ten-minute steps and interpolating
/// the horizon crossings; accuracy is within a few minutes, which is ample
/// for display.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardAlmanac;

/// Julian day of a reference new moon (2000-01-06 18:14 UTC).
const NEW_MOON_EPOCH_JD: f64 = 2451550.26;

/// Mean length of the synodic month in days.
const SYNODIC_MONTH: f64 = 29.530588853;

/// Altitude of the lunar disc center at rise/set, degrees. Combines
/// refraction, semidiameter, and parallax.
const RISE_SET_ALTITUDE_DEG: f64 = 0.133;

/// Altitude scan resolution.
const SCAN_STEP_MINUTES: i64 = 10;

fn julian_day(at: OffsetDateTime) -> f64 {
    at.unix_timestamp() as f64 / 86400.0 + 2440587.5
}

fn sin_deg(degrees: f64) -> f64 {
    degrees.to_radians().sin()
}

/// Geocentric right ascension and declination of the Moon, radians.
fn moon_equatorial(jd: f64) -> (f64, f64) {
    let t = (jd - 2451545.0) / 36525.0;

    // Mean elements in degrees
    let mean_longitude = 218.316 + 481267.8813 * t;
    let mean_anomaly = 134.963 + 477198.8676 * t;
    let arg_latitude = 93.272 + 483202.0175 * t;

    let lambda = (mean_longitude + 6.289 * sin_deg(mean_anomaly)).to_radians();
    let beta = (5.128 * sin_deg(arg_latitude)).to_radians();

    // Obliquity of the ecliptic
    let epsilon = 23.4393_f64.to_radians();

    let ra = (lambda.sin() * epsilon.cos() - beta.tan() * epsilon.sin()).atan2(lambda.cos());
    let dec = (beta.sin() * epsilon.cos() + beta.cos() * epsilon.sin() * lambda.sin()).asin();
    (ra, dec)
}

/// Altitude of the Moon above the horizon, radians.
fn moon_altitude(jd: f64, latitude_rad: f64, longitude_deg: f64) -> f64 {
    let (ra, dec) = moon_equatorial(jd);
    let days = jd - 2451545.0;
    let sidereal = (280.16 + 360.9856235 * days + longitude_deg).to_radians();
    let hour_angle = sidereal - ra;
    (latitude_rad.sin() * dec.sin() + latitude_rad.cos() * dec.cos() * hour_angle.cos()).asin()
}

/// Linear interpolation of the horizon crossing inside one scan step.
fn crossing(before: OffsetDateTime, prev: f64, current: f64, step: Duration) -> OffsetDateTime {
    let fraction = prev / (prev - current);
    let offset_seconds = step.whole_seconds() as f64 * fraction;
    before + Duration::seconds(offset_seconds as i64)
}

impl Almanac for StandardAlmanac {
    fn moon_times(
        &self,
        date: Date,
        offset: UtcOffset,
        latitude: f64,
        longitude: f64,
    ) -> MoonTimes {
        let latitude_rad = latitude.to_radians();
        let horizon = RISE_SET_ALTITUDE_DEG.to_radians();
        let start = OffsetDateTime::new_in_offset(date, Time::MIDNIGHT, offset);
        let step = Duration::minutes(SCAN_STEP_MINUTES);
        let steps = 24 * 60 / SCAN_STEP_MINUTES;

        let mut rise = None;
        let mut set = None;
        let mut prev = moon_altitude(julian_day(start), latitude_rad, longitude) - horizon;

        for i in 1..=steps {
            let at = start + step * i as i32;
            let current = moon_altitude(julian_day(at), latitude_rad, longitude) - horizon;

            if prev < 0.0 && current >= 0.0 && rise.is_none() {
                rise = Some(crossing(at - step, prev, current, step));
            } else if prev >= 0.0 && current < 0.0 && set.is_none() {
                set = Some(crossing(at - step, prev, current, step));
            }
            prev = current;
        }

        MoonTimes {
            rise: rise.map(|at| at.to_offset(offset).time()),
            set: set.map(|at| at.to_offset(offset).time()),
        }
    }

    fn moon_phase(&self, date: Date) -> f64 {
        // Midday Julian date of the civil day
        let jd = date.to_julian_day() as f64;
        ((jd - NEW_MOON_EPOCH_JD) / SYNODIC_MONTH).rem_euclid(1.0)
    }
}
