//! Port trait definitions
//!
//! These traits define the interfaces that provider adapters must implement.
//! They report failures as errors; turning failures into soft defaults is the
//! pipeline's decision, not the adapter's.

use crate::error::Result;
use crate::models::{Coordinate, PathGeometry};
use async_trait::async_trait;

/// Port for free-text geocoding
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Look up an address, returning candidates best-first.
    ///
    /// An empty vector means the provider answered but found nothing.
    async fn geocode(&self, query: &str) -> Result<Vec<Coordinate>>;

    /// Provider name used in logs and errors
    fn name(&self) -> &str;
}

/// Port for driving-route geometry
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Full-detail geometry of the best driving route.
    ///
    /// Fails with `NoRouteFound` when the provider reports no viable route.
    async fn route(&self, from: Coordinate, to: Coordinate) -> Result<PathGeometry>;

    fn name(&self) -> &str;
}

/// Port for mapped water features
#[async_trait]
pub trait WaterFeatureSource: Send + Sync {
    /// Whether any water feature lies within `radius_m` of `point`
    async fn has_water_within(&self, point: Coordinate, radius_m: f64) -> Result<bool>;

    fn name(&self) -> &str;
}

/// Port for hourly precipitation series
#[async_trait]
pub trait PrecipitationSource: Send + Sync {
    /// Sum of the trailing `window_hours` hourly values, in millimeters
    async fn recent_rainfall_mm(&self, point: Coordinate, window_hours: u32) -> Result<f64>;

    fn name(&self) -> &str;
}
