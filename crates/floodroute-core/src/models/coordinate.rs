//! WGS 84 coordinate value type.

use crate::error::{FloodRouteError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A latitude/longitude pair in decimal degrees
///
/// Compared by value only. Construct through [`Coordinate::new`] to get range
/// validation; providers that already guarantee valid output may use the
/// fields directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a validated coordinate
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        if !valid {
            return Err(FloodRouteError::InvalidCoordinate { latitude, longitude });
        }

        Ok(Self { latitude, longitude })
    }

    /// Build from a GeoJSON-ordered `[lon, lat]` position
    pub fn from_lon_lat(position: [f64; 2]) -> Result<Self> {
        Self::new(position[1], position[0])
    }

    /// GeoJSON-ordered `[lon, lat]` position
    pub fn to_lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

/// Parses `"lat,lon"`, the format used for pinned points.
impl FromStr for Coordinate {
    type Err = FloodRouteError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || FloodRouteError::InvalidInput {
            reason: format!("Expected 'lat,lon' but got '{}'", s),
        };

        let (lat, lon) = s.split_once(',').ok_or_else(invalid)?;
        let latitude: f64 = lat.trim().parse().map_err(|_| invalid())?;
        let longitude: f64 = lon.trim().parse().map_err(|_| invalid())?;

        Self::new(latitude, longitude)
    }
}

impl From<Coordinate> for geo::Point<f64> {
    fn from(c: Coordinate) -> Self {
        geo::Point::new(c.longitude, c.latitude)
    }
}

impl From<Coordinate> for geo::Coord<f64> {
    fn from(c: Coordinate) -> Self {
        geo::Coord { x: c.longitude, y: c.latitude }
    }
}
