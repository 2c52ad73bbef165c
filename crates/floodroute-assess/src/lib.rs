//! FloodRoute Assess - The route risk assessment pipeline
//!
//! This crate implements the assessment use case: resolve both endpoints,
//! fetch the route, sample it, check every sample for nearby water and recent
//! rain, and aggregate the findings into one risk level.

pub mod aggregator;
pub mod calls;
pub mod cancel;
pub mod checks;
pub mod models;
pub mod pipeline;
pub mod resolver;
pub mod settings;

pub use aggregator::{classify, RouteFindings};
pub use cancel::CancelToken;
pub use checks::{PrecipitationChecker, WaterProximityChecker};
pub use models::{AssessmentReport, PipelineRunContext, RunEvent};
pub use pipeline::RouteAssessmentPipeline;
pub use resolver::GeoResolver;
pub use settings::PipelineSettings;
