//! Convert between geographic coordinates and positions on a sphere.
//!
//! This crate provides the pure math used to place markers on a textured
//! globe, to turn a pointer hit on that globe back into a latitude and
//! longitude, and to measure great-circle distances between two places.
//!
//! # Design principles
//!
//! - **Synchronous**: No async, no threading primitives
//! - **Stateless**: Every function is a pure mapping of its inputs
//! - **Web-compatible**: Compiles to WASM
//!
//! # Example
//!
//! ```
//! use geoproject::{GeoPoint, forward, inverse};
//!
//! let paris = GeoPoint::new(48.8566, 2.3522)?;
//! let marker = forward(paris.latitude, paris.longitude, 1.0, 0.04);
//! let back = inverse(marker)?;
//! assert!((back.latitude - paris.latitude).abs() < 1e-9);
//! # Ok::<(), geoproject::Error>(())
//! ```

mod distance;
mod error;
mod point;
mod projection;
mod rotation;

pub use distance::{EARTH_RADIUS_KM, haversine_distance_km};
pub use error::{Error, Result};
pub use point::{CartesianPoint, GeoPoint};
pub use projection::{GeoProjector, forward, inverse, texture_azimuth};
pub use rotation::{
    CameraRotation, DeviceOrientation, GLOBE_TILT_FACTOR, GlobeRotation, globe_rotation_towards,
};
