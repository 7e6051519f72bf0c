//! French département outlines from a GeoJSON feature collection.

use geoproject::GeoPoint;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::http;

/// Default source for département outlines.
pub const DEFAULT_URL: &str =
    "https://raw.githubusercontent.com/gregoiredavid/france-geojson/master/departements.geojson";

/// Code shown for features that don't carry one.
pub const NO_CODE: &str = "N/A";

/// One département.
#[derive(Debug, Clone, PartialEq)]
pub struct Departement {
    /// Name (`nom` property).
    pub name: String,
    /// INSEE code, or [`NO_CODE`].
    pub code: String,
    /// Outer and inner rings of every polygon, as closed polylines.
    pub rings: Vec<Vec<GeoPoint>>,
}

impl Departement {
    /// South-west and north-east corners of the outline.
    #[must_use]
    pub fn bounds(&self) -> Option<(GeoPoint, GeoPoint)> {
        let mut points = self.rings.iter().flatten();
        let first = *points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| {
            (
                GeoPoint::new_unchecked(min.latitude.min(p.latitude), min.longitude.min(p.longitude)),
                GeoPoint::new_unchecked(max.latitude.max(p.latitude), max.longitude.max(p.longitude)),
            )
        });
        Some((min, max))
    }
}

#[derive(Debug, Deserialize)]
struct RawCollection {
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: Option<RawProperties>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
}

#[derive(Debug, Deserialize)]
struct RawProperties {
    #[serde(default)]
    nom: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// GeoJSON positions are `[lon, lat]`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum RawGeometry {
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<[f64; 2]>>> },
    #[serde(other)]
    Unsupported,
}

fn ring_to_points(ring: &[[f64; 2]]) -> geoproject::Result<Vec<GeoPoint>> {
    ring.iter().map(|[lon, lat]| GeoPoint::new(*lat, *lon)).collect()
}

impl RawFeature {
    fn into_departement(self) -> Result<Option<Departement>> {
        let Some(RawProperties {
            nom: Some(name),
            code,
        }) = self.properties
        else {
            return Ok(None);
        };

        let rings = match self.geometry {
            Some(RawGeometry::Polygon { coordinates }) => coordinates,
            Some(RawGeometry::MultiPolygon { coordinates }) => {
                coordinates.into_iter().flatten().collect()
            }
            Some(RawGeometry::Unsupported) | None => Vec::new(),
        };
        let rings = rings
            .iter()
            .map(|ring| ring_to_points(ring))
            .collect::<geoproject::Result<Vec<_>>>()?;

        Ok(Some(Departement {
            name,
            code: code.unwrap_or_else(|| NO_CODE.to_string()),
            rings,
        }))
    }
}

/// Decode a GeoJSON feature collection of départements.
///
/// Features without a `nom` property are skipped.
pub fn decode_departements(body: &[u8]) -> Result<Vec<Departement>> {
    let raw: RawCollection = serde_json::from_slice(body).map_err(|e| Error::InvalidData {
        context: "departements",
        detail: e.to_string(),
    })?;

    let mut departements = Vec::with_capacity(raw.features.len());
    for feature in raw.features {
        if let Some(departement) = feature.into_departement()? {
            departements.push(departement);
        }
    }
    Ok(departements)
}

/// HTTP client for département outlines.
pub struct DepartementClient {
    http: reqwest::Client,
    url: String,
}

impl DepartementClient {
    /// Create a client for the default dataset.
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: http::build_client(DEFAULT_URL)?,
            url: DEFAULT_URL.to_string(),
        })
    }

    /// Fetch from a different GeoJSON file.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Fetch and decode every département.
    pub async fn fetch_all(&self) -> Result<Vec<Departement>> {
        let body = http::fetch_bytes(&self.http, &self.url).await?;
        let departements = decode_departements(&body)?;
        tracing::debug!(count = departements.len(), "decoded departements");
        Ok(departements)
    }
}
