//! Great-circle distance.

use std::f64::consts::PI;

use crate::point::GeoPoint;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance between two points, in kilometers.
///
/// Longitudes on either side of the ±180° meridian need no special
/// handling; the `sin²(Δlon/2)` term is periodic.
#[must_use]
pub fn haversine_distance_km(p1: GeoPoint, p2: GeoPoint) -> f64 {
    let d_lat = (p2.latitude - p1.latitude) * PI / 180.0;
    let d_lon = (p2.longitude - p1.longitude) * PI / 180.0;
    let lat1 = p1.latitude * PI / 180.0;
    let lat2 = p2.latitude * PI / 180.0;

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1 near antipodes. NaN passes through.
    let a = if a > 1.0 { 1.0 } else { a };
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}
