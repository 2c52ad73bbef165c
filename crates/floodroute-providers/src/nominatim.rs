use async_trait::async_trait;
use floodroute_core::error::{FloodRouteError, Result};
use floodroute_core::models::Coordinate;
use floodroute_core::ports::Geocoder;
use serde::Deserialize;

use crate::http::{join_url, read_json};

const PROVIDER: &str = "nominatim";

/// Nominatim (OpenStreetMap) geocoder
pub struct NominatimGeocoder {
    /// Base URL, e.g. "https://nominatim.openstreetmap.org"
    base_url: String,

    client: reqwest::Client,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self { base_url: base_url.into(), client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, query: &str) -> reqwest::RequestBuilder {
        self.client
            .get(join_url(&self.base_url, "search"))
            .query(&[("format", "json"), ("q", query)])
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Vec<Coordinate>> {
        tracing::debug!(provider = PROVIDER, query = %query, "Geocoding address");

        let response = self
            .request(query)
            .send()
            .await
            .map_err(|e| FloodRouteError::provider(PROVIDER, e))?;

        let places: Vec<NominatimPlace> = read_json(PROVIDER, response).await?;
        parse_places(places)
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

/// One search hit; Nominatim encodes coordinates as strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

fn parse_places(places: Vec<NominatimPlace>) -> Result<Vec<Coordinate>> {
    places
        .into_iter()
        .map(|place| {
            let lat: f64 = place.lat.parse().map_err(|_| {
                FloodRouteError::provider(PROVIDER, format!("Bad latitude '{}'", place.lat))
            })?;
            let lon: f64 = place.lon.parse().map_err(|_| {
                FloodRouteError::provider(PROVIDER, format!("Bad longitude '{}'", place.lon))
            })?;
            Coordinate::new(lat, lon).map_err(|e| FloodRouteError::provider(PROVIDER, e))
        })
        .collect()
}
