use async_trait::async_trait;
use floodroute_core::error::{FloodRouteError, Result};
use floodroute_core::models::Coordinate;
use floodroute_core::ports::WaterFeatureSource;
use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::http::read_json;

const PROVIDER: &str = "overpass";

/// Server-side budget for one query, in seconds
const QUERY_TIMEOUT_S: u32 = 25;

/// Overpass API client checking for mapped water around a point
pub struct OverpassWaterSource {
    /// Interpreter endpoint, e.g. "https://overpass-api.de/api/interpreter"
    base_url: String,

    client: reqwest::Client,
}

impl OverpassWaterSource {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self { base_url: base_url.into(), client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl WaterFeatureSource for OverpassWaterSource {
    async fn has_water_within(&self, point: Coordinate, radius_m: f64) -> Result<bool> {
        let query = water_query(point, radius_m);

        let response = self
            .client
            .post(&self.base_url)
            .form(&[("data", query.as_str())])
            .send()
            .await
            .map_err(|e| FloodRouteError::provider(PROVIDER, e))?;

        let payload: OverpassResponse = read_json(PROVIDER, response).await?;

        tracing::trace!(
            provider = PROVIDER,
            lat = point.latitude,
            lon = point.longitude,
            elements = payload.elements.len(),
            "Water query answered"
        );

        interpret(payload)
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

/// Overpass QL for water areas, riverbanks, water relations, water nodes and
/// reservoirs within `radius_m` of `point`. Only ids are requested since the
/// caller needs nothing but "any match".
fn water_query(point: Coordinate, radius_m: f64) -> String {
    let around = format!("(around:{},{},{})", radius_m, point.latitude, point.longitude);
    format!(
        "[out:json][timeout:{QUERY_TIMEOUT_S}];\n(\n  \
         way[\"natural\"=\"water\"]{around};\n  \
         way[\"waterway\"=\"riverbank\"]{around};\n  \
         relation[\"natural\"=\"water\"]{around};\n  \
         node[\"natural\"=\"water\"]{around};\n  \
         way[\"landuse\"=\"reservoir\"]{around};\n\
         );\nout ids;"
    )
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<IgnoredAny>,

    /// Set when the server aborted the query; the element list is then partial
    #[serde(default)]
    remark: Option<String>,
}

/// Overpass answers timeouts and memory exhaustion with HTTP 200 and a
/// `runtime error` remark, so an empty element list alone is not a clean result.
fn interpret(payload: OverpassResponse) -> Result<bool> {
    match payload.remark {
        Some(remark) if remark.trim_start().starts_with("runtime error") => {
            Err(FloodRouteError::provider(PROVIDER, remark))
        }
        _ => Ok(!payload.elements.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_covers_all_water_tags() {
        let q = water_query(Coordinate::new(12.5, 77.25).unwrap(), 60.0);

        assert!(q.starts_with("[out:json][timeout:25];"));
        assert!(q.contains("way[\"natural\"=\"water\"](around:60,12.5,77.25);"));
        assert!(q.contains("way[\"waterway\"=\"riverbank\"](around:60,12.5,77.25);"));
        assert!(q.contains("relation[\"natural\"=\"water\"](around:60,12.5,77.25);"));
        assert!(q.contains("node[\"natural\"=\"water\"](around:60,12.5,77.25);"));
        assert!(q.contains("way[\"landuse\"=\"reservoir\"](around:60,12.5,77.25);"));
        assert!(q.ends_with("out ids;"));
    }

    fn decode(body: &str) -> Result<bool> {
        interpret(serde_json::from_str(body).unwrap())
    }

    #[test]
    fn test_any_element_means_water() {
        let body = r#"{
            "version": 0.6,
            "generator": "Overpass API",
            "elements": [{"type": "way", "id": 4242}, {"type": "node", "id": 7}]
        }"#;
        assert!(decode(body).unwrap());
    }

    #[test]
    fn test_missing_elements_means_no_water() {
        assert!(!decode(r#"{"version": 0.6}"#).unwrap());
        assert!(!decode(r#"{"version": 0.6, "elements": []}"#).unwrap());
    }

    #[test]
    fn test_runtime_error_remark_is_provider_error() {
        let body = r#"{
            "version": 0.6,
            "elements": [],
            "remark": "runtime error: Query timed out in \"query\" at line 3 after 26 seconds."
        }"#;

        let err = decode(body).unwrap_err();
        assert!(err.is_provider_error());
        assert!(err.to_string().contains("Query timed out"));
    }

    #[test]
    fn test_runtime_error_discards_partial_elements() {
        let body = r#"{
            "elements": [{"type": "way", "id": 1}],
            "remark": "runtime error: Query run out of memory using about 2048 MB of RAM."
        }"#;
        assert!(decode(body).unwrap_err().is_provider_error());
    }

    #[test]
    fn test_informational_remark_is_ignored() {
        let body = r#"{"elements": [], "remark": "note: results truncated for display"}"#;
        assert!(!decode(body).unwrap());
    }
}
