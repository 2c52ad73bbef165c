use floodroute_core::models::{RiskLevel, Sample};
use serde::Serialize;

/// Rain above this, together with nearby water, is High risk
pub const HIGH_RAIN_MM: f64 = 10.0;

/// Rain above this alone is Medium risk
pub const MEDIUM_RAIN_MM: f64 = 5.0;

/// Classify a route from its aggregated findings.
///
/// | water | max rain  | risk   |
/// |-------|-----------|--------|
/// | yes   | > 10      | High   |
/// | any   | > 5       | Medium |
/// | yes   | <= 5      | Medium |
/// | no    | <= 5      | Low    |
pub fn classify(any_water_detected: bool, max_rain_mm: f64) -> RiskLevel {
    if any_water_detected && max_rain_mm > HIGH_RAIN_MM {
        RiskLevel::High
    } else if max_rain_mm > MEDIUM_RAIN_MM || any_water_detected {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Running OR/MAX accumulator over checked samples
///
/// Both reductions are commutative, so the result does not depend on the
/// order samples are recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RouteFindings {
    pub any_water_detected: bool,
    pub max_rain_mm: f64,
    pub samples: usize,
    pub water_unchecked: usize,
    pub rain_unchecked: usize,
}

impl RouteFindings {
    pub fn record(&mut self, sample: &Sample) {
        self.samples += 1;
        self.any_water_detected |= sample.has_water();
        self.max_rain_mm = self.max_rain_mm.max(sample.rain_value_mm());

        if !sample.water.is_some_and(|w| w.checked) {
            self.water_unchecked += 1;
        }
        if !sample.rain_mm.is_some_and(|r| r.checked) {
            self.rain_unchecked += 1;
        }
    }

    pub fn risk(&self) -> RiskLevel {
        classify(self.any_water_detected, self.max_rain_mm)
    }

    /// Every check on every sample came back with a real answer
    pub fn fully_checked(&self) -> bool {
        self.water_unchecked == 0 && self.rain_unchecked == 0
    }
}
