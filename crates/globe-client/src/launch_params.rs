//! Launch parameter parsing for the command-line front end.

use clap::{Parser, Subcommand};
use geoproject::GeoPoint;

use crate::countries::DEFAULT_BASE_URL;
use crate::{departements, routes};

/// Default sphere radius, in scene units.
const DEFAULT_RADIUS: f64 = 1.0;

/// Places that can be named instead of typing coordinates.
const NAMED_PLACES: [(&str, GeoPoint); 3] = [
    ("paris", GeoPoint::new_unchecked(48.8566, 2.3522)),
    ("nice", GeoPoint::new_unchecked(43.7102, 7.2620)),
    ("marseille", GeoPoint::new_unchecked(43.2965, 5.3698)),
];

/// Parse either a named place or a `LAT,LON` pair.
pub fn parse_place(s: &str) -> Result<GeoPoint, String> {
    let key = s.trim().to_ascii_lowercase();
    if let Some((_, point)) = NAMED_PLACES.iter().find(|(name, _)| *name == key) {
        return Ok(*point);
    }
    s.parse::<GeoPoint>().map_err(|e| e.to_string())
}

/// Launch parameters.
#[derive(Parser, Debug)]
#[command(about = "Project coordinates onto a globe and measure distances")]
pub struct LaunchParams {
    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Project a latitude/longitude onto the globe.
    Project {
        /// Latitude in degrees.
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees.
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Sphere radius.
        #[arg(long, default_value_t = DEFAULT_RADIUS)]
        radius: f64,
        /// Offset above the surface.
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        height: f64,
    },
    /// Recover the latitude/longitude under a point in globe space.
    Unproject {
        /// X coordinate in globe space.
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        /// Y coordinate (up, toward the north pole).
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
        /// Z coordinate in globe space.
        #[arg(long, allow_hyphen_values = true)]
        z: f64,
    },
    /// Great-circle distance between two places.
    Distance {
        /// Start: a named place (paris, nice, marseille) or LAT,LON.
        #[arg(long, value_parser = parse_place, allow_hyphen_values = true)]
        from: GeoPoint,
        /// End: a named place or LAT,LON.
        #[arg(long, value_parser = parse_place, allow_hyphen_values = true)]
        to: GeoPoint,
    },
    /// Fetch the country dataset and list marker positions.
    Countries {
        /// Only list the first N countries.
        #[arg(long)]
        limit: Option<usize>,
        /// Also print the distance from this place.
        #[arg(long, value_parser = parse_place, allow_hyphen_values = true)]
        from: Option<GeoPoint>,
        /// Sphere radius.
        #[arg(long, default_value_t = DEFAULT_RADIUS)]
        radius: f64,
        /// Dataset base URL.
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },
    /// Fetch a driving route and print its length and travel time.
    Route {
        /// Start: a named place or LAT,LON.
        #[arg(long, value_parser = parse_place, allow_hyphen_values = true)]
        from: GeoPoint,
        /// End: a named place or LAT,LON.
        #[arg(long, value_parser = parse_place, default_value = "nice", allow_hyphen_values = true)]
        to: GeoPoint,
        /// Routing server base URL.
        #[arg(long, default_value = routes::DEFAULT_BASE_URL)]
        base_url: String,
    },
    /// Fetch French département outlines and list them.
    Departements {
        /// GeoJSON source URL.
        #[arg(long, default_value = departements::DEFAULT_URL)]
        url: String,
    },
}

/// Parse launch parameters from the process arguments.
#[must_use]
pub fn parse() -> LaunchParams {
    LaunchParams::parse()
}
