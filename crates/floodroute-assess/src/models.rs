use chrono::{DateTime, Utc};
use floodroute_core::models::{Coordinate, PathGeometry, RiskLevel, RunState, Sample};
use serde::Serialize;
use uuid::Uuid;

use crate::aggregator::RouteFindings;
use crate::cancel::CancelToken;

/// Per-run scratch state
///
/// Owned by exactly one run; discarded when the run settles. A newer run gets
/// its own context, so a superseded run can never leak its samples into it.
#[derive(Debug, Clone)]
pub struct PipelineRunContext {
    pub run_id: Uuid,
    pub generation: u64,
    pub token: CancelToken,
    pub samples: Vec<Sample>,
    pub started_at: DateTime<Utc>,
}

impl PipelineRunContext {
    pub fn new(generation: u64, token: CancelToken) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generation,
            token,
            samples: Vec::new(),
            started_at: Utc::now(),
        }
    }
}

/// Progress notifications for whoever renders a run
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    StateChanged { run_id: Uuid, state: RunState, message: String },
    RouteReady { run_id: Uuid, path: PathGeometry },
    SampleChecked { run_id: Uuid, index: usize, total: usize, sample: Sample },
    Finished { run_id: Uuid, report: Box<AssessmentReport> },
    Failed { run_id: Uuid, message: String },
}

impl RunEvent {
    pub fn run_id(&self) -> Uuid {
        match self {
            RunEvent::StateChanged { run_id, .. }
            | RunEvent::RouteReady { run_id, .. }
            | RunEvent::SampleChecked { run_id, .. }
            | RunEvent::Finished { run_id, .. }
            | RunEvent::Failed { run_id, .. } => *run_id,
        }
    }
}

/// Final result of a completed run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentReport {
    pub run_id: Uuid,
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub risk: RiskLevel,
    pub any_water_detected: bool,
    pub max_rain_mm: f64,
    pub samples: Vec<Sample>,
    /// Samples whose water check failed and was defaulted to "no water"
    pub water_unchecked: usize,
    /// Samples whose rain check failed and was defaulted to 0 mm
    pub rain_unchecked: usize,
    pub route_vertices: usize,
    pub route_length_m: f64,
    pub path: PathGeometry,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl AssessmentReport {
    pub(crate) fn from_findings(
        context: &PipelineRunContext,
        origin: Coordinate,
        destination: Coordinate,
        path: PathGeometry,
        findings: RouteFindings,
    ) -> Self {
        let route_length_m = floodroute_geo::path_length_m(&path);

        Self {
            run_id: context.run_id,
            origin,
            destination,
            risk: findings.risk(),
            any_water_detected: findings.any_water_detected,
            max_rain_mm: findings.max_rain_mm,
            samples: context.samples.clone(),
            water_unchecked: findings.water_unchecked,
            rain_unchecked: findings.rain_unchecked,
            route_vertices: path.len(),
            route_length_m,
            path,
            started_at: context.started_at,
            finished_at: Utc::now(),
        }
    }

    /// One-line status, e.g. `Risk Level: High | Water nearby: yes | Max rainfall: 12.0 mm`
    pub fn summary(&self) -> String {
        format!(
            "Risk Level: {} | Water nearby: {} | Max rainfall: {:.1} mm",
            self.risk,
            if self.any_water_detected { "yes" } else { "no" },
            self.max_rain_mm
        )
    }

    /// No check on any sample fell back to its default
    pub fn is_fully_checked(&self) -> bool {
        self.water_unchecked == 0 && self.rain_unchecked == 0
    }
}
