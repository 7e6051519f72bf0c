//! Coordinate value types.

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A position relative to the sphere's center, in a right-handed frame.
pub type CartesianPoint = DVec3;

/// A latitude/longitude pair in degrees.
///
/// Deserialization goes through [`GeoPoint::new`], so decoded points are
/// always in range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point, rejecting values outside the geographic ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::LatitudeOutOfRange(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create a point without range checks.
    ///
    /// Out-of-range values still go through the projection math, they just
    /// don't describe a meaningful place.
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Deserialize)]
struct RawGeoPoint {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = Error;

    fn try_from(raw: RawGeoPoint) -> Result<Self> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}°, {:.4}°", self.latitude, self.longitude)
    }
}

/// Parses `"lat,lon"`, with optional whitespace around either number.
impl FromStr for GeoPoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parse_err = |detail: String| Error::ParseCoordinate {
            input: s.to_string(),
            detail,
        };

        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| parse_err("expected LAT,LON".to_string()))?;
        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|e| parse_err(format!("invalid latitude: {e}")))?;
        let lon = lon
            .trim()
            .parse::<f64>()
            .map_err(|e| parse_err(format!("invalid longitude: {e}")))?;

        Self::new(lat, lon)
    }
}
