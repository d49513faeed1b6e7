//! Haversine great-circle distance
//!
//! Reference:
//! Sinnott, R.W. (1984). Virtues of the Haversine. Sky and Telescope, 68(2).

use distweight_core::Coordinate;

use super::deg_to_rad;

/// Mean Earth radius in meters (IUGG R1), used by every spherical computation
pub const EARTH_MEAN_RADIUS: f64 = 6_371_008.8;

/// Great-circle distance in meters between two lon/lat coordinates in degrees.
///
/// ```text
/// a = sin²(Δφ/2) + cos φ1 · cos φ2 · sin²(Δλ/2)
/// c = 2 · atan2(√a, √(1−a))
/// d = R · c
/// ```
///
/// `a` is clamped to [0, 1] so rounding near antipodes cannot push the
/// square roots out of their domain.
pub fn haversine(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = deg_to_rad(a.lat);
    let lat2 = deg_to_rad(b.lat);
    let d_lat = deg_to_rad(b.lat - a.lat);
    let d_lon = deg_to_rad(b.lon - a.lon);

    let sin_dlat = (d_lat / 2.0).sin();
    let sin_dlon = (d_lon / 2.0).sin();

    let h = (sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon).clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_MEAN_RADIUS * c
}
