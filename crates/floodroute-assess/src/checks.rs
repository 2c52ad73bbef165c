//! Per-sample hazard checks with soft-failure defaults.
//!
//! A failed or timed-out check yields the "no hazard" default (no water, 0 mm)
//! with `checked = false`, so callers can tell a clean result from a missing one.

use floodroute_core::models::{CheckOutcome, Coordinate};
use floodroute_core::ports::{PrecipitationSource, WaterFeatureSource};
use std::time::Duration;

use crate::calls::soft_call;

pub struct WaterProximityChecker<W: WaterFeatureSource> {
    source: W,
    radius_m: f64,
    timeout: Duration,
}

impl<W: WaterFeatureSource> WaterProximityChecker<W> {
    pub fn new(source: W, radius_m: f64, timeout: Duration) -> Self {
        Self { source, radius_m, timeout }
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    pub async fn has_nearby_water(&self, point: Coordinate) -> CheckOutcome<bool> {
        soft_call(
            self.source.name(),
            self.timeout,
            false,
            self.source.has_water_within(point, self.radius_m),
        )
        .await
    }
}

pub struct PrecipitationChecker<P: PrecipitationSource> {
    source: P,
    window_hours: u32,
    timeout: Duration,
}

impl<P: PrecipitationSource> PrecipitationChecker<P> {
    pub fn new(source: P, window_hours: u32, timeout: Duration) -> Self {
        Self { source, window_hours, timeout }
    }

    pub fn window_hours(&self) -> u32 {
        self.window_hours
    }

    /// Rainfall over the window, never negative
    pub async fn recent_rainfall_mm(&self, point: Coordinate) -> CheckOutcome<f64> {
        let outcome = soft_call(
            self.source.name(),
            self.timeout,
            0.0,
            self.source.recent_rainfall_mm(point, self.window_hours),
        )
        .await;

        if !outcome.value.is_finite() {
            tracing::warn!(
                provider = self.source.name(),
                value = outcome.value,
                "Non-finite rainfall, using default"
            );
            return CheckOutcome::defaulted(0.0);
        }

        CheckOutcome { value: outcome.value.max(0.0), checked: outcome.checked }
    }
}
