//! Shared HTTP plumbing for the provider adapters.

use floodroute_core::config::LayeredConfig;
use floodroute_core::error::{FloodRouteError, Result};
use serde::de::DeserializeOwned;

use crate::{NominatimGeocoder, OpenMeteoPrecipitation, OsrmRouter, OverpassWaterSource};

/// Build the HTTP client shared by all adapters.
///
/// Public OSM services reject requests without an identifying User-Agent.
/// Per-call deadlines are applied by the pipeline, not here.
pub fn build_client(user_agent: &str) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(|e| FloodRouteError::provider("http", format!("Failed to build client: {}", e)))
}

/// Decode a JSON body, turning non-2xx statuses and malformed bodies into provider errors
pub(crate) async fn read_json<T: DeserializeOwned>(
    provider: &str,
    response: reqwest::Response,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(FloodRouteError::provider(
            provider,
            format!("HTTP {}: {}", status, truncate(&body, 200)),
        ));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| FloodRouteError::provider(provider, format!("Malformed response: {}", e)))
}

pub(crate) fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// The four adapters wired from one configuration
pub struct Providers {
    pub geocoder: NominatimGeocoder,
    pub router: OsrmRouter,
    pub water: OverpassWaterSource,
    pub precipitation: OpenMeteoPrecipitation,
}

impl Providers {
    pub fn from_config(config: &LayeredConfig) -> Result<Self> {
        let client = build_client(&config.user_agent.value)?;

        tracing::debug!(
            geocoder = %config.geocoder_url.value,
            router = %config.router_url.value,
            overpass = %config.overpass_url.value,
            weather = %config.weather_url.value,
            "Configured providers"
        );

        Ok(Self {
            geocoder: NominatimGeocoder::new(config.geocoder_url.value.clone(), client.clone()),
            router: OsrmRouter::new(config.router_url.value.clone(), client.clone()),
            water: OverpassWaterSource::new(config.overpass_url.value.clone(), client.clone()),
            precipitation: OpenMeteoPrecipitation::new(config.weather_url.value.clone(), client),
        })
    }
}
