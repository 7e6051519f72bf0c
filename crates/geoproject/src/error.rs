//! Error types for projection operations.

use std::fmt;

/// Errors that can occur when building or inverting coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The vector to invert has no usable direction.
    DegenerateVector {
        /// Length of the rejected vector.
        length: f64,
    },
    /// Latitude outside `[-90, 90]` degrees or not finite.
    LatitudeOutOfRange(f64),
    /// Longitude outside `[-180, 180]` degrees or not finite.
    LongitudeOutOfRange(f64),
    /// Text could not be parsed as a `lat,lon` pair.
    ParseCoordinate {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        detail: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateVector { length } => {
                write!(f, "cannot invert vector of length {length}")
            }
            Self::LatitudeOutOfRange(lat) => {
                write!(f, "latitude {lat} out of range [-90, 90]")
            }
            Self::LongitudeOutOfRange(lon) => {
                write!(f, "longitude {lon} out of range [-180, 180]")
            }
            Self::ParseCoordinate { input, detail } => {
                write!(f, "invalid coordinate '{input}': {detail}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, Error>;
