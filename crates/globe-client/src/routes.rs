//! Driving routes from an OSRM server.

use geoproject::GeoPoint;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::http;

/// Base URL for the public OSRM demo server.
pub const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org/";

/// A driving route between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Route length in kilometers.
    pub distance_km: f64,
    /// Estimated travel time in whole minutes.
    pub duration_min: u32,
    /// Polyline from start to end.
    pub path: Vec<GeoPoint>,
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    /// Meters.
    distance: f64,
    /// Seconds.
    duration: f64,
    geometry: RawGeometry,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    /// GeoJSON order: `[lon, lat]`.
    coordinates: Vec<[f64; 2]>,
}

/// Decode an OSRM `route` response body, keeping the first route.
pub fn decode_route(body: &[u8]) -> Result<Route> {
    let raw: RawResponse = serde_json::from_slice(body).map_err(|e| Error::InvalidData {
        context: "route",
        detail: e.to_string(),
    })?;

    let route = raw.routes.into_iter().next().ok_or_else(|| Error::InvalidData {
        context: "route",
        detail: "no route found".to_string(),
    })?;

    let path = route
        .geometry
        .coordinates
        .iter()
        .map(|[lon, lat]| GeoPoint::new(*lat, *lon))
        .collect::<geoproject::Result<Vec<_>>>()?;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let duration_min = (route.duration / 60.0).round().max(0.0) as u32;

    Ok(Route {
        distance_km: route.distance / 1000.0,
        duration_min,
        path,
    })
}

/// HTTP client for driving routes.
pub struct RouteClient {
    http: reqwest::Client,
    base_url: String,
}

impl RouteClient {
    /// Create a client for the public OSRM server.
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: http::build_client(DEFAULT_BASE_URL)?,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Set a custom base URL, e.g. a self-hosted OSRM instance.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// URL for a driving route. OSRM takes `lon,lat` pairs.
    #[must_use]
    pub fn route_url(&self, from: GeoPoint, to: GeoPoint) -> String {
        http::join(
            &self.base_url,
            &format!(
                "route/v1/driving/{},{};{},{}?overview=full&geometries=geojson",
                from.longitude, from.latitude, to.longitude, to.latitude
            ),
        )
    }

    /// Fetch the fastest driving route from `from` to `to`.
    pub async fn fetch_route(&self, from: GeoPoint, to: GeoPoint) -> Result<Route> {
        let body = http::fetch_bytes(&self.http, &self.route_url(from, to)).await?;
        let route = decode_route(&body)?;
        tracing::debug!(
            distance_km = route.distance_km,
            duration_min = route.duration_min,
            points = route.path.len(),
            "decoded route"
        );
        Ok(route)
    }
}
