use floodroute_core::error::{FloodRouteError, Result};
use floodroute_core::models::{Coordinate, LocationInput};
use floodroute_core::ports::Geocoder;

/// Turns a [`LocationInput`] into a coordinate
///
/// Pinned coordinates are returned unchanged without touching the geocoder.
/// Address text costs exactly one geocoder call; the first candidate wins.
pub struct GeoResolver<G: Geocoder> {
    geocoder: G,
}

impl<G: Geocoder> GeoResolver<G> {
    pub fn new(geocoder: G) -> Self {
        Self { geocoder }
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    pub async fn resolve(&self, input: &LocationInput) -> Result<Coordinate> {
        match input {
            LocationInput::Pinned(coordinate) => Ok(*coordinate),
            LocationInput::Address(text) => {
                let candidates = self.geocoder.geocode(text).await?;
                let first = candidates
                    .into_iter()
                    .next()
                    .ok_or_else(|| FloodRouteError::NotFound { query: text.clone() })?;

                tracing::debug!(query = %text, resolved = %first, "Resolved address");
                Ok(first)
            }
        }
    }
}
