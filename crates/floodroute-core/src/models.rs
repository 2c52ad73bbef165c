pub mod assessment;
pub mod coordinate;
pub mod location;
pub mod route;

pub use assessment::{RiskLevel, RunState};
pub use coordinate::Coordinate;
pub use location::LocationInput;
pub use route::{CheckOutcome, PathGeometry, Sample, SamplingMode};
