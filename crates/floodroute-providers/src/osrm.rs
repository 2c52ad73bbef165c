use async_trait::async_trait;
use floodroute_core::error::{FloodRouteError, Result};
use floodroute_core::models::{Coordinate, PathGeometry};
use floodroute_core::ports::RouteProvider;
use serde::Deserialize;

use crate::http::{join_url, truncate};

const PROVIDER: &str = "osrm";

/// OSRM driving-route client
pub struct OsrmRouter {
    /// Base URL, e.g. "https://router.project-osrm.org"
    base_url: String,

    client: reqwest::Client,
}

impl OsrmRouter {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self { base_url: base_url.into(), client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// OSRM expects `lon,lat;lon,lat` in the path
    fn route_url(&self, from: Coordinate, to: Coordinate) -> String {
        join_url(
            &self.base_url,
            &format!(
                "route/v1/driving/{},{};{},{}",
                from.longitude, from.latitude, to.longitude, to.latitude
            ),
        )
    }
}

#[async_trait]
impl RouteProvider for OsrmRouter {
    async fn route(&self, from: Coordinate, to: Coordinate) -> Result<PathGeometry> {
        tracing::debug!(provider = PROVIDER, from = %from, to = %to, "Requesting route");

        let response = self
            .client
            .get(self.route_url(from, to))
            .query(&[("overview", "full"), ("geometries", "geojson"), ("alternatives", "false")])
            .send()
            .await
            .map_err(|e| FloodRouteError::provider(PROVIDER, e))?;

        // OSRM reports NoRoute and friends with a 400 and a JSON body, so the
        // body has to be read before the status decides anything.
        let status = response.status();
        let body = response.text().await.map_err(|e| FloodRouteError::provider(PROVIDER, e))?;

        match serde_json::from_str::<OsrmResponse>(&body) {
            Ok(parsed) => interpret(parsed),
            Err(_) if !status.is_success() => Err(FloodRouteError::provider(
                PROVIDER,
                format!("HTTP {}: {}", status, truncate(&body, 200)),
            )),
            Err(e) => {
                Err(FloodRouteError::provider(PROVIDER, format!("Malformed response: {}", e)))
            }
        }
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

/// Keep only the first (best) route; alternates are ignored
fn interpret(response: OsrmResponse) -> Result<PathGeometry> {
    let reason = || response.message.clone().unwrap_or_else(|| response.code.clone());

    match response.code.as_str() {
        "Ok" => {}
        "NoRoute" | "NoSegment" => return Err(FloodRouteError::NoRouteFound { reason: reason() }),
        _ => {
            return Err(FloodRouteError::provider(
                PROVIDER,
                format!("{}: {}", response.code, reason()),
            ))
        }
    }

    let route = response.routes.into_iter().next().ok_or_else(|| {
        FloodRouteError::NoRouteFound { reason: "Router returned no routes".to_string() }
    })?;

    let vertices = route
        .geometry
        .coordinates
        .into_iter()
        .map(|position| {
            Coordinate::from_lon_lat(position).map_err(|e| FloodRouteError::provider(PROVIDER, e))
        })
        .collect::<Result<Vec<_>>>()?;

    if vertices.is_empty() {
        return Err(FloodRouteError::NoRouteFound {
            reason: "Route geometry is empty".to_string(),
        });
    }

    Ok(PathGeometry::new(vertices))
}
