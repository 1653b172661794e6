//! Sunrise & sunset ephemeris (sunrise equation, NOAA low-precision form)
//!
//! Accuracy: about a minute at mid latitudes; degrades near the polar
//! circles. Uses the standard −0.833° apparent horizon (refraction plus the
//! solar semi-diameter). References: Meeus, *Astronomical Algorithms* ch. 15,
//! and the NOAA solar calculator notes.

use chrono::{DateTime, Duration, Utc};

/// Source of sunrise/sunset instants.
///
/// Implementations return the first event strictly after `from`, or `None`
/// when the sun does not cross the horizon near that date (polar day/night).
pub trait Ephemeris {
    fn sunrise_utc(&self, lat: f64, lon: f64, from: DateTime<Utc>) -> Option<DateTime<Utc>>;
    fn sunset_utc(&self, lat: f64, lon: f64, from: DateTime<Utc>) -> Option<DateTime<Utc>>;
}

/// Bundled [`Ephemeris`] based on the sunrise equation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolarEphemeris;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Rise,
    Set,
}

impl Ephemeris for SolarEphemeris {
    fn sunrise_utc(&self, lat: f64, lon: f64, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        next_event(Event::Rise, lat, lon, from)
    }

    fn sunset_utc(&self, lat: f64, lon: f64, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        next_event(Event::Set, lat, lon, from)
    }
}

/// Julian date of the Unix epoch.
const JD_UNIX_EPOCH: f64 = 2_440_587.5;
/// Julian date of J2000.0.
const JD_J2000: f64 = 2_451_545.0;

fn next_event(event: Event, lat: f64, lon: f64, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let day0 = from.date_naive().and_hms_opt(0, 0, 0)?.and_utc();
    // Far east/west longitudes shift the event across the UTC date line,
    // so look one day either side.
    (-1..=2)
        .filter_map(|offset| solar_event(event, lat, lon, day0 + Duration::days(offset)))
        .find(|instant| *instant > from)
}

/// Event on the solar day whose transit is nearest UTC noon of `day`.
fn solar_event(event: Event, lat: f64, lon: f64, day: DateTime<Utc>) -> Option<DateTime<Utc>> {
    // ---------- 1. Days since J2000 at UTC noon --------------------------------
    let n = (day.timestamp() as f64 / 86_400.0 + JD_UNIX_EPOCH + 0.5 - JD_J2000).round();

    // ---------- 2. Mean solar time (east longitude positive) ------------------
    let j_star = n - lon / 360.0;

    // ---------- 3. Solar mean anomaly & equation of the centre ----------------
    let m = (357.5291 + 0.985_600_28 * j_star).rem_euclid(360.0);
    let m_rad = m.to_radians();
    let c = 1.9148 * m_rad.sin() + 0.0200 * (2.0 * m_rad).sin() + 0.0003 * (3.0 * m_rad).sin();

    // ---------- 4. Ecliptic longitude & solar transit ------------------------
    let lambda = (m + c + 180.0 + 102.9372).rem_euclid(360.0);
    let lambda_rad = lambda.to_radians();
    let j_transit =
        JD_J2000 + j_star + 0.0053 * m_rad.sin() - 0.0069 * (2.0 * lambda_rad).sin();

    // ---------- 5. Declination & hour angle ----------------------------------
    let sin_decl = lambda_rad.sin() * 23.4397_f64.to_radians().sin();
    let cos_decl = sin_decl.asin().cos();
    let lat_rad = lat.to_radians();
    let cos_omega =
        ((-0.833_f64).to_radians().sin() - lat_rad.sin() * sin_decl) / (lat_rad.cos() * cos_decl);
    if !(-1.0..=1.0).contains(&cos_omega) {
        return None; // polar day or night
    }
    let omega = cos_omega.acos().to_degrees();

    let jd = match event {
        Event::Rise => j_transit - omega / 360.0,
        Event::Set => j_transit + omega / 360.0,
    };
    let unix = ((jd - JD_UNIX_EPOCH) * 86_400.0).round() as i64;
    DateTime::<Utc>::from_timestamp(unix, 0)
}
