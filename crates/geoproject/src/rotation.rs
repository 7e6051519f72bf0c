//! Rotations derived from geographic positions and device sensors.

use std::f64::consts::PI;

use crate::point::GeoPoint;

/// Fraction of the latitude applied as globe tilt when facing a point.
///
/// Tilting by the full latitude flips the globe over near the poles.
pub const GLOBE_TILT_FACTOR: f64 = 0.3;

/// Euler rotation of the globe mesh, in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlobeRotation {
    /// Tilt around the horizontal screen axis.
    pub x: f64,
    /// Spin around the polar axis.
    pub y: f64,
}

impl GlobeRotation {
    /// Add a drag or animation delta.
    #[must_use]
    pub fn rotated(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Rotation that turns `point` towards a camera looking down -Z.
#[must_use]
pub fn globe_rotation_towards(point: GeoPoint) -> GlobeRotation {
    let y = -point.longitude * PI / 180.0;
    let x = point.latitude * PI / 180.0;
    GlobeRotation {
        x: -x * GLOBE_TILT_FACTOR,
        y,
    }
}

/// A reading from the device orientation sensor, in degrees.
///
/// Each angle is optional because browsers report `null` for axes the
/// hardware does not provide.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DeviceOrientation {
    /// Rotation around the Z axis (compass heading), `[0, 360)`.
    pub alpha: Option<f64>,
    /// Front-to-back tilt, `[-180, 180)`.
    pub beta: Option<f64>,
    /// Left-to-right tilt, `[-90, 90)`.
    pub gamma: Option<f64>,
}

/// Camera Euler angles in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraRotation {
    /// Rotation around the camera's X axis.
    pub pitch: f64,
    /// Rotation around the camera's Y axis.
    pub yaw: f64,
}

impl DeviceOrientation {
    /// Camera rotation for a phone held upright: `beta = 90` looks at the
    /// horizon.
    ///
    /// Returns `None` if alpha or beta is missing. Gamma is not used.
    #[must_use]
    pub fn camera_rotation(&self) -> Option<CameraRotation> {
        let alpha = self.alpha?;
        let beta = self.beta?;
        Some(CameraRotation {
            pitch: (beta - 90.0).to_radians(),
            yaw: alpha.to_radians(),
        })
    }
}
