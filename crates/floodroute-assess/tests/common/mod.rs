//! In-memory ports with call counters, scripted failures and delays

#![allow(dead_code)]

use async_trait::async_trait;
use floodroute_core::error::{FloodRouteError, Result};
use floodroute_core::models::{Coordinate, PathGeometry};
use floodroute_core::ports::{Geocoder, PrecipitationSource, RouteProvider, WaterFeatureSource};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub fn coord(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}

/// Shared call counter that survives moving a fake into the pipeline
#[derive(Debug, Clone, Default)]
pub struct Calls(Arc<AtomicUsize>);

impl Calls {
    fn hit(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst)
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct FakeGeocoder {
    places: HashMap<String, Coordinate>,
    pub calls: Calls,
}

impl FakeGeocoder {
    pub fn with(mut self, query: &str, coordinate: Coordinate) -> Self {
        self.places.insert(query.to_string(), coordinate);
        self
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn geocode(&self, query: &str) -> Result<Vec<Coordinate>> {
        self.calls.hit();
        Ok(self.places.get(query).copied().into_iter().collect())
    }

    fn name(&self) -> &str {
        "fake-geocoder"
    }
}

pub enum RouteScript {
    Path(Vec<Coordinate>),
    NoRoute,
    Failure,
}

pub struct FakeRouter {
    script: RouteScript,
    /// Applied to the first call only
    first_delay: Duration,
    pub calls: Calls,
}

impl FakeRouter {
    pub fn new(script: RouteScript) -> Self {
        Self { script, first_delay: Duration::ZERO, calls: Calls::default() }
    }

    pub fn path(vertices: Vec<Coordinate>) -> Self {
        Self::new(RouteScript::Path(vertices))
    }

    pub fn slow_first(mut self, delay: Duration) -> Self {
        self.first_delay = delay;
        self
    }
}

#[async_trait]
impl RouteProvider for FakeRouter {
    async fn route(&self, _from: Coordinate, _to: Coordinate) -> Result<PathGeometry> {
        if self.calls.hit() == 0 && !self.first_delay.is_zero() {
            tokio::time::sleep(self.first_delay).await;
        }

        match &self.script {
            RouteScript::Path(vertices) => Ok(PathGeometry::new(vertices.clone())),
            RouteScript::NoRoute => {
                Err(FloodRouteError::NoRouteFound { reason: "NoRoute".to_string() })
            }
            RouteScript::Failure => Err(FloodRouteError::provider("fake-router", "HTTP 502")),
        }
    }

    fn name(&self) -> &str {
        "fake-router"
    }
}

pub struct FakeWater {
    /// None fails every call
    answer: Option<bool>,
    delay: Duration,
    /// Longer delays for points nearer the equator, to scramble completion order
    staggered: bool,
    pub calls: Calls,
}

impl FakeWater {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer: Some(answer),
            delay: Duration::ZERO,
            staggered: false,
            calls: Calls::default(),
        }
    }

    pub fn failing() -> Self {
        Self { answer: None, delay: Duration::ZERO, staggered: false, calls: Calls::default() }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn staggered(mut self) -> Self {
        self.staggered = true;
        self
    }
}

#[async_trait]
impl WaterFeatureSource for FakeWater {
    async fn has_water_within(&self, point: Coordinate, _radius_m: f64) -> Result<bool> {
        self.calls.hit();

        let delay = if self.staggered {
            Duration::from_millis((10.0 - point.latitude).max(0.0) as u64 * 10)
        } else {
            self.delay
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.answer.ok_or_else(|| FloodRouteError::provider("fake-water", "HTTP 429"))
    }

    fn name(&self) -> &str {
        "fake-water"
    }
}

pub struct FakeRain {
    answer: Option<f64>,
    pub calls: Calls,
}

impl FakeRain {
    pub fn answering(mm: f64) -> Self {
        Self { answer: Some(mm), calls: Calls::default() }
    }

    pub fn failing() -> Self {
        Self { answer: None, calls: Calls::default() }
    }
}

#[async_trait]
impl PrecipitationSource for FakeRain {
    async fn recent_rainfall_mm(&self, _point: Coordinate, _window_hours: u32) -> Result<f64> {
        self.calls.hit();
        self.answer.ok_or_else(|| FloodRouteError::provider("fake-rain", "missing hourly series"))
    }

    fn name(&self) -> &str {
        "fake-rain"
    }
}

/// `n` vertices stepping north along longitude 77
pub fn straight_path(n: usize) -> Vec<Coordinate> {
    (0..n).map(|i| coord(i as f64 * 0.001, 77.0)).collect()
}
