//! Thinning a route polyline into sample points.
//!
//! Two strategies are available through [`SamplingMode`]:
//!
//! - `VertexStride(n)` takes every n-th vertex starting at index 0. It ignores
//!   real distances, so dense urban geometry gets many samples per kilometer
//!   and long straight highway segments very few.
//! - `Distance { spacing_m }` walks the path and keeps a vertex once the
//!   along-path haversine distance from the last kept vertex reaches
//!   `spacing_m`. Vertices are never interpolated, so actual spacing is
//!   `>= spacing_m` whenever the geometry is sparser than the target.
//!
//! Both always keep the first vertex, never emit more points than the path
//! has, and preserve path order.

use crate::distance::distance;
use floodroute_core::models::{Coordinate, PathGeometry, SamplingMode};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PathSampler {
    mode: SamplingMode,
}

impl PathSampler {
    pub fn new(mode: SamplingMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> SamplingMode {
        self.mode
    }

    /// Select sample points from `path`
    pub fn sample(&self, path: &PathGeometry) -> Vec<Coordinate> {
        match self.mode {
            SamplingMode::VertexStride(stride) => by_stride(path.vertices(), stride),
            SamplingMode::Distance { spacing_m } => by_distance(path.vertices(), spacing_m),
        }
    }
}

fn by_stride(vertices: &[Coordinate], stride: usize) -> Vec<Coordinate> {
    vertices.iter().step_by(stride.max(1)).copied().collect()
}

fn by_distance(vertices: &[Coordinate], spacing_m: f64) -> Vec<Coordinate> {
    let Some(&first) = vertices.first() else {
        return Vec::new();
    };

    // Non-positive spacing degenerates to keeping every vertex
    if !(spacing_m > 0.0) {
        return vertices.to_vec();
    }

    let mut samples = vec![first];
    let mut travelled = 0.0;

    for pair in vertices.windows(2) {
        travelled += distance(pair[0], pair[1]);
        if travelled >= spacing_m {
            samples.push(pair[1]);
            travelled = 0.0;
        }
    }

    samples
}
