//! Route geometry and per-sample findings.

use crate::models::Coordinate;
use serde::{Deserialize, Serialize};

/// Ordered polyline of a route, immutable once obtained
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathGeometry {
    vertices: Vec<Coordinate>,
}

impl PathGeometry {
    pub fn new(vertices: Vec<Coordinate>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Coordinate] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn first(&self) -> Option<&Coordinate> {
        self.vertices.first()
    }

    pub fn last(&self) -> Option<&Coordinate> {
        self.vertices.last()
    }

    /// Convert to a `geo` line string (x = longitude, y = latitude)
    pub fn to_line_string(&self) -> geo::LineString<f64> {
        self.vertices.iter().map(|c| geo::Coord::from(*c)).collect()
    }
}

impl From<Vec<Coordinate>> for PathGeometry {
    fn from(vertices: Vec<Coordinate>) -> Self {
        Self::new(vertices)
    }
}

/// How a path is thinned into sample points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    /// Every n-th vertex starting at index 0, ignoring real distances
    VertexStride(usize),
    /// First vertex, then each vertex at least `spacing_m` along the path
    /// from the previously selected one
    Distance { spacing_m: f64 },
}

impl Default for SamplingMode {
    fn default() -> Self {
        SamplingMode::VertexStride(10)
    }
}

/// Result of a check that falls back to a default when it cannot complete
///
/// `checked == false` means the provider failed (transport, parse, timeout)
/// and `value` is the conservative default, not an observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome<T> {
    pub value: T,
    pub checked: bool,
}

impl<T> CheckOutcome<T> {
    /// A value actually reported by the provider
    pub fn confirmed(value: T) -> Self {
        Self { value, checked: true }
    }

    /// A default substituted because the check failed
    pub fn defaulted(value: T) -> Self {
        Self { value, checked: false }
    }
}

/// One route point selected for hazard checking
///
/// Created empty, filled in visiting order, never mutated after the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub coordinate: Coordinate,
    pub water: Option<CheckOutcome<bool>>,
    pub rain_mm: Option<CheckOutcome<f64>>,
}

impl Sample {
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate, water: None, rain_mm: None }
    }

    /// Water finding for aggregation; unknown counts as no water
    pub fn has_water(&self) -> bool {
        self.water.map(|w| w.value).unwrap_or(false)
    }

    /// Rain finding for aggregation; unknown counts as zero
    pub fn rain_value_mm(&self) -> f64 {
        self.rain_mm.map(|r| r.value).unwrap_or(0.0)
    }

    /// Both checks ran and reported real values
    pub fn fully_checked(&self) -> bool {
        self.water.is_some_and(|w| w.checked) && self.rain_mm.is_some_and(|r| r.checked)
    }
}
