//! FloodRoute Geo - Distance, path sampling, and GeoJSON export
//!
//! Pure functions over route geometry. Nothing in this crate performs I/O.

pub mod distance;
pub mod export;
pub mod sampler;

pub use distance::{distance, path_length_m, EARTH_RADIUS_M};
pub use export::route_feature_collection;
pub use sampler::PathSampler;
