//! Estimates how fast the vehicle moves between two samples.

use crate::Sample;

/// Mean radius of the Earth
pub const EARTH_RADIUS_KM: f64 = 6371.0;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Great-circle distance between two samples, using the haversine formula.
pub fn haversine_km(p1: &Sample, p2: &Sample) -> f64 {
    let d_lat = (p2.lat - p1.lat).to_radians();
    let d_lng = (p2.lng - p1.lng).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + p1.lat.to_radians().cos() * p2.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Ground speed in km/h from `p1` to the following sample `p2`.
///
/// Samples sharing a timestamp (or anything else producing NaN or infinity) yield 0, never an
/// error. Out-of-order samples aren't corrected; they produce a negative speed.
pub fn speed_kmh(p1: &Sample, p2: &Sample) -> f64 {
    let distance = haversine_km(p1, p2);
    let hours = (p2.timestamp - p1.timestamp).num_milliseconds() as f64 / MILLIS_PER_HOUR;
    let speed = distance / hours;
    // Also maps -0.0 to 0.0
    if speed.is_finite() && speed != 0.0 {
        speed
    } else {
        0.0
    }
}
