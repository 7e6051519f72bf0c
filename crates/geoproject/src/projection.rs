//! Geographic to Cartesian projection and its inverse.

use std::f64::consts::PI;

use crate::error::{Error, Result};
use crate::point::{CartesianPoint, GeoPoint};

/// Project a latitude/longitude (degrees) onto a sphere.
///
/// `height` is added to `radius` along the outward normal, so markers can
/// float above the surface. The axis convention matches an equirectangular
/// texture wrapped with its seam at longitude ±180°:
///
/// - `phi = (90 - lat) * π / 180` (colatitude)
/// - `theta = (lon + 180) * π / 180`
/// - `x = -(r + h) sin(phi) cos(theta)`
/// - `y = (r + h) cos(phi)`
/// - `z = (r + h) sin(phi) sin(theta)`
///
/// Inputs are not clamped; out-of-range angles produce a valid but
/// meaningless point.
#[must_use]
pub fn forward(lat: f64, lon: f64, radius: f64, height: f64) -> CartesianPoint {
    let phi = (90.0 - lat) * PI / 180.0;
    let theta = (lon + 180.0) * PI / 180.0;
    let r = radius + height;

    CartesianPoint::new(
        -r * phi.sin() * theta.cos(),
        r * phi.cos(),
        r * phi.sin() * theta.sin(),
    )
}

/// Recover the latitude/longitude whose projection points along `point`.
///
/// The vector does not need to lie on the sphere; only its direction
/// matters. Longitude is returned in `[-180, 180]`.
///
/// # Errors
///
/// Returns [`Error::DegenerateVector`] if `point` has zero or non-finite
/// length.
pub fn inverse(point: CartesianPoint) -> Result<GeoPoint> {
    let n = normalized(point)?;
    let lat = n.y.clamp(-1.0, 1.0).asin() * 180.0 / PI;
    // Undo the +180° offset of `forward`: atan2(z, -x) - 180°.
    let lon = (-n.z).atan2(n.x) * 180.0 / PI;
    Ok(GeoPoint::new_unchecked(lat, lon))
}

/// Azimuth of `point` in the texture frame, in degrees.
///
/// This is `atan2(z, -x)`, i.e. the `theta` angle of [`forward`] wrapped
/// into `[-180, 180]`. It differs from the geographic longitude by 180°.
///
/// # Errors
///
/// Returns [`Error::DegenerateVector`] if `point` has zero or non-finite
/// length.
pub fn texture_azimuth(point: CartesianPoint) -> Result<f64> {
    let n = normalized(point)?;
    Ok(n.z.atan2(-n.x) * 180.0 / PI)
}

fn normalized(point: CartesianPoint) -> Result<CartesianPoint> {
    let length = point.length();
    if !length.is_finite() || length == 0.0 {
        return Err(Error::DegenerateVector { length });
    }
    Ok(point / length)
}

/// A sphere of fixed radius to project markers onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoProjector {
    /// Sphere radius in scene units.
    pub radius: f64,
}

impl GeoProjector {
    /// The unit sphere.
    pub const UNIT: Self = Self { radius: 1.0 };

    /// Create a projector for a sphere of the given radius.
    #[must_use]
    pub const fn new(radius: f64) -> Self {
        Self { radius }
    }

    /// Position of `point` lifted `height` above the surface.
    #[must_use]
    pub fn project(&self, point: GeoPoint, height: f64) -> CartesianPoint {
        forward(point.latitude, point.longitude, self.radius, height)
    }

    /// Geographic position under a point on or near the sphere.
    pub fn unproject(&self, point: CartesianPoint) -> Result<GeoPoint> {
        inverse(point)
    }
}

impl Default for GeoProjector {
    fn default() -> Self {
        Self::UNIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-6;

    /// Longitude difference modulo 360°, so that -180 and 180 compare equal.
    fn lon_delta(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d)
    }

    #[test]
    fn test_round_trip_grid() {
        for lat_step in -18..=18 {
            for lon_step in -36..=36 {
                let lat = f64::from(lat_step) * 5.0;
                let lon = f64::from(lon_step) * 5.0;

                let back = inverse(forward(lat, lon, 1.0, 0.0)).unwrap();

                assert!(
                    (back.latitude - lat).abs() < EPS,
                    "latitude mismatch at ({lat}, {lon}): {back:?}"
                );
                // Every longitude collapses onto the poles.
                if lat.abs() < 90.0 {
                    assert!(
                        lon_delta(back.longitude, lon) < EPS,
                        "longitude mismatch at ({lat}, {lon}): {back:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_north_pole_collapses() {
        for lon in [-180.0, -90.0, 0.0, 45.0, 180.0] {
            let p = forward(90.0, lon, 1.0, 0.0);
            assert!(p.x.abs() < 1e-12, "x at lon {lon}: {p}");
            assert!((p.y - 1.0).abs() < 1e-12, "y at lon {lon}: {p}");
            assert!(p.z.abs() < 1e-12, "z at lon {lon}: {p}");
        }
    }

    #[test]
    fn test_prime_meridian_orientation() {
        // lat 0 / lon 0 sits on +X, lon 90 on -Z, lon ±180 on -X.
        let p = forward(0.0, 0.0, 1.0, 0.0);
        assert!((p - CartesianPoint::X).length() < 1e-12, "{p}");

        let p = forward(0.0, 90.0, 1.0, 0.0);
        assert!((p + CartesianPoint::Z).length() < 1e-12, "{p}");

        let p = forward(0.0, 180.0, 1.0, 0.0);
        assert!((p + CartesianPoint::X).length() < 1e-12, "{p}");
    }

    #[test]
    fn test_height_offset() {
        let surface = forward(48.8566, 2.3522, 1.0, 0.0);
        let lifted = forward(48.8566, 2.3522, 1.0, 0.04);
        assert!((lifted.length() - 1.04).abs() < 1e-12);
        assert!((lifted.normalize() - surface).length() < 1e-12);
    }

    #[test]
    fn test_inverse_ignores_magnitude() {
        let p = forward(-33.8688, 151.2093, 1.0, 0.0);
        let a = inverse(p).unwrap();
        let b = inverse(p * 6371.0).unwrap();
        assert!((a.latitude - b.latitude).abs() < 1e-9);
        assert!(lon_delta(a.longitude, b.longitude) < 1e-9);
    }

    #[test]
    fn test_inverse_degenerate() {
        assert_eq!(
            inverse(CartesianPoint::ZERO),
            Err(Error::DegenerateVector { length: 0.0 })
        );
        assert!(matches!(
            inverse(CartesianPoint::new(f64::INFINITY, 0.0, 0.0)),
            Err(Error::DegenerateVector { .. })
        ));
        assert!(matches!(
            texture_azimuth(CartesianPoint::ZERO),
            Err(Error::DegenerateVector { .. })
        ));
    }

    #[test]
    fn test_texture_azimuth_is_offset_by_half_turn() {
        let lon = 30.0;
        let azimuth = texture_azimuth(forward(10.0, lon, 1.0, 0.0)).unwrap();
        assert!(lon_delta(azimuth, lon + 180.0) < EPS, "{azimuth}");
    }

    #[test]
    fn test_projector_matches_free_functions() {
        let projector = GeoProjector::new(2.5);
        let nice = GeoPoint::new(43.7102, 7.2620).unwrap();
        let p = projector.project(nice, 0.1);
        assert_eq!(p, forward(nice.latitude, nice.longitude, 2.5, 0.1));

        let back = projector.unproject(p).unwrap();
        assert!((back.latitude - nice.latitude).abs() < EPS);
        assert!(lon_delta(back.longitude, nice.longitude) < EPS);
    }

    #[test]
    fn test_nan_propagates() {
        let p = forward(f64::NAN, 0.0, 1.0, 0.0);
        assert!(p.x.is_nan() && p.y.is_nan() && p.z.is_nan());
    }

    proptest! {
        #[test]
        fn prop_radius_scaling(
            lat in -90.0f64..=90.0,
            lon in -180.0f64..=180.0,
            radius in 1e-3f64..1e4,
        ) {
            let p = forward(lat, lon, radius, 0.0);
            prop_assert!((p.length() - radius).abs() <= radius * 1e-12);
        }

        #[test]
        fn prop_round_trip(
            lat in -89.9f64..=89.9,
            lon in -179.9f64..=179.9,
            radius in 1e-3f64..1e4,
            height_ratio in -0.9f64..2.0,
        ) {
            let back = inverse(forward(lat, lon, radius, radius * height_ratio)).unwrap();
            prop_assert!((back.latitude - lat).abs() < EPS);
            prop_assert!(lon_delta(back.longitude, lon) < EPS);
        }
    }
}
