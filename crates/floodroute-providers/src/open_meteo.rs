use async_trait::async_trait;
use floodroute_core::error::{FloodRouteError, Result};
use floodroute_core::models::Coordinate;
use floodroute_core::ports::PrecipitationSource;
use serde::Deserialize;

use crate::http::{join_url, read_json};

const PROVIDER: &str = "open-meteo";

/// Open-Meteo hourly precipitation client
pub struct OpenMeteoPrecipitation {
    /// Base URL, e.g. "https://api.open-meteo.com"
    base_url: String,

    client: reqwest::Client,
}

impl OpenMeteoPrecipitation {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self { base_url: base_url.into(), client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Hourly precipitation for the `window_hours` hours up to now, with no forecast hours
    fn request(&self, point: Coordinate, window_hours: u32) -> reqwest::RequestBuilder {
        self.client.get(join_url(&self.base_url, "v1/forecast")).query(&[
            ("latitude", point.latitude.to_string()),
            ("longitude", point.longitude.to_string()),
            ("hourly", "precipitation".to_string()),
            ("past_hours", window_hours.to_string()),
            ("forecast_hours", "0".to_string()),
            ("timezone", "UTC".to_string()),
        ])
    }
}

#[async_trait]
impl PrecipitationSource for OpenMeteoPrecipitation {
    async fn recent_rainfall_mm(&self, point: Coordinate, window_hours: u32) -> Result<f64> {
        let response = self
            .request(point, window_hours)
            .send()
            .await
            .map_err(|e| FloodRouteError::provider(PROVIDER, e))?;

        let payload: ForecastResponse = read_json(PROVIDER, response).await?;
        trailing_sum(payload, window_hours)
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: Option<HourlySeries>,
}

#[derive(Debug, Deserialize)]
struct HourlySeries {
    #[serde(default)]
    precipitation: Option<Vec<Option<f64>>>,
}

/// Sum the last `window_hours` entries of the series.
///
/// The request already bounds the series to the recent window; taking the
/// tail keeps the sum correct if the service pads it with extra hours.
///
/// Null hours count as dry and negative values are clamped to zero.
fn trailing_sum(payload: ForecastResponse, window_hours: u32) -> Result<f64> {
    let series = payload
        .hourly
        .and_then(|h| h.precipitation)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| FloodRouteError::provider(PROVIDER, "Missing hourly precipitation series"))?;

    Ok(series
        .iter()
        .rev()
        .take(window_hours as usize)
        .map(|v| v.unwrap_or(0.0).max(0.0))
        .sum())
}
