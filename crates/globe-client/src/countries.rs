//! Country dataset used to place flag markers.
//!
//! Countries come from the public RestCountries v3.1 API. Only the fields
//! needed for markers and popups are requested.

use geoproject::GeoPoint;
use serde::Deserialize;

use crate::error::Result;
use crate::http;

/// Base URL for the RestCountries API.
pub const DEFAULT_BASE_URL: &str = "https://restcountries.com/v3.1/";

/// Fields requested from the API.
const FIELDS: &str = "name,latlng,flags,capital,population";

/// Capital shown for countries that don't list one.
pub const NO_CAPITAL: &str = "N/A";

/// A country with a usable position.
#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    /// Common English name.
    pub name: String,
    /// Representative point, usually near the geographic center.
    pub position: GeoPoint,
    /// PNG flag image, empty if none was listed.
    pub flag_url: String,
    /// First listed capital, or [`NO_CAPITAL`].
    pub capital: String,
    /// Population, 0 if unknown.
    pub population: u64,
}

#[derive(Debug, Deserialize)]
struct RawCountry {
    name: RawName,
    #[serde(default)]
    latlng: Option<Vec<f64>>,
    #[serde(default)]
    flags: Option<RawFlags>,
    #[serde(default)]
    capital: Option<Vec<String>>,
    #[serde(default)]
    population: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawName {
    common: String,
}

#[derive(Debug, Deserialize)]
struct RawFlags {
    #[serde(default)]
    png: Option<String>,
}

impl RawCountry {
    fn into_country(self) -> Option<Country> {
        let latlng = self.latlng?;
        let [lat, lon] = latlng.as_slice() else {
            return None;
        };
        let position = match GeoPoint::new(*lat, *lon) {
            Ok(position) => position,
            Err(e) => {
                tracing::warn!(country = %self.name.common, "skipping country: {e}");
                return None;
            }
        };

        Some(Country {
            name: self.name.common,
            position,
            flag_url: self.flags.and_then(|f| f.png).unwrap_or_default(),
            capital: self
                .capital
                .and_then(|c| c.into_iter().next())
                .unwrap_or_else(|| NO_CAPITAL.to_string()),
            population: self.population.unwrap_or(0),
        })
    }
}

/// Decode a RestCountries response body.
///
/// Records without a two-element `latlng` are dropped.
pub fn decode_countries(body: &[u8]) -> Result<Vec<Country>> {
    let raw: Vec<RawCountry> = serde_json::from_slice(body)?;
    let total = raw.len();
    let countries: Vec<Country> = raw.into_iter().filter_map(RawCountry::into_country).collect();
    tracing::debug!(total, kept = countries.len(), "decoded countries");
    Ok(countries)
}

/// HTTP client for the country dataset.
pub struct CountryClient {
    http: reqwest::Client,
    base_url: String,
}

impl CountryClient {
    /// Create a client for the public API.
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: http::build_client(DEFAULT_BASE_URL)?,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Set a custom base URL, e.g. a mirror or a local test server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// URL for the full country list.
    #[must_use]
    pub fn all_url(&self) -> String {
        http::join(&self.base_url, &format!("all?fields={FIELDS}"))
    }

    /// Fetch every country with a usable position.
    pub async fn fetch_all(&self) -> Result<Vec<Country>> {
        let body = http::fetch_bytes(&self.http, &self.all_url()).await?;
        decode_countries(&body)
    }
}
