mod common;

use common::*;
use floodroute_assess::{PipelineSettings, RouteAssessmentPipeline, RunEvent};
use floodroute_core::error::FloodRouteError;
use floodroute_core::models::{LocationInput, RiskLevel, RunState, SamplingMode};
use std::time::Duration;
use tokio::sync::mpsc;

fn address(text: &str) -> LocationInput {
    LocationInput::Address(text.to_string())
}

fn pin(lat: f64, lon: f64) -> LocationInput {
    LocationInput::Pinned(coord(lat, lon))
}

fn fast_settings() -> PipelineSettings {
    PipelineSettings {
        request_timeout: Duration::from_millis(200),
        retry_backoff: Duration::from_millis(1),
        ..PipelineSettings::default()
    }
}

fn drain(rx: &mut mpsc::UnboundedReceiver<RunEvent>) -> Vec<RunEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn states(events: &[RunEvent]) -> Vec<RunState> {
    events
        .iter()
        .filter_map(|event| match event {
            RunEvent::StateChanged { state, .. } => Some(*state),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_five_vertex_route_with_water_and_heavy_rain_is_high() {
    let geocoder =
        FakeGeocoder::default().with("A", coord(19.0, 72.8)).with("B", coord(19.1, 72.9));
    let router = FakeRouter::path(straight_path(5));
    let water = FakeWater::answering(true);
    let rain = FakeRain::answering(12.0);
    let (water_calls, rain_calls) = (water.calls.clone(), rain.calls.clone());

    let (tx, mut rx) = mpsc::unbounded_channel();
    let pipeline = RouteAssessmentPipeline::new(geocoder, router, water, rain, fast_settings())
        .with_events(tx);

    let report = pipeline.run(address("A"), address("B")).await.unwrap();

    // Stride 10 over 5 vertices keeps only the first vertex
    assert_eq!(report.samples.len(), 1);
    assert_eq!(report.samples[0].coordinate, straight_path(5)[0]);
    assert_eq!(report.risk, RiskLevel::High);
    assert!(report.summary().starts_with("Risk Level: High"));
    assert_eq!(report.summary(), "Risk Level: High | Water nearby: yes | Max rainfall: 12.0 mm");
    assert!(report.is_fully_checked());
    assert_eq!(water_calls.count(), 1);
    assert_eq!(rain_calls.count(), 1);
    assert_eq!(pipeline.state(), RunState::Done);

    let events = drain(&mut rx);
    assert_eq!(
        states(&events),
        vec![
            RunState::ResolvingLocations,
            RunState::FetchingRoute,
            RunState::Sampling,
            RunState::Done,
        ]
    );
    assert!(events.iter().any(|event| matches!(
        event,
        RunEvent::StateChanged { state: RunState::Sampling, message, .. }
            if message == "Checking 1 sample points..."
    )));
    assert!(matches!(
        events.last(),
        Some(RunEvent::Finished { report: finished, .. }) if finished.risk == RiskLevel::High
    ));
    assert!(events.iter().all(|event| event.run_id() == report.run_id));
}

#[tokio::test]
async fn test_all_soft_checks_failing_still_completes_low() {
    let router = FakeRouter::path(straight_path(25));
    let pipeline = RouteAssessmentPipeline::new(
        FakeGeocoder::default(),
        router,
        FakeWater::failing(),
        FakeRain::failing(),
        fast_settings(),
    );

    let report = pipeline.run(pin(12.97, 77.59), pin(12.99, 77.61)).await.unwrap();

    assert_eq!(pipeline.state(), RunState::Done);
    assert_eq!(report.risk, RiskLevel::Low);
    assert!(!report.any_water_detected);
    assert_eq!(report.max_rain_mm, 0.0);
    // Indices 0, 10, 20
    assert_eq!(report.samples.len(), 3);
    assert_eq!(report.water_unchecked, 3);
    assert_eq!(report.rain_unchecked, 3);
    assert!(!report.is_fully_checked());
}

#[tokio::test]
async fn test_unresolvable_destination_stops_before_routing() {
    let geocoder = FakeGeocoder::default().with("Home", coord(51.5, -0.12));
    let geocoder_calls = geocoder.calls.clone();
    let router = FakeRouter::path(straight_path(3));
    let water = FakeWater::answering(true);
    let rain = FakeRain::answering(1.0);
    let (router_calls, water_calls, rain_calls) =
        (router.calls.clone(), water.calls.clone(), rain.calls.clone());

    let (tx, mut rx) = mpsc::unbounded_channel();
    let pipeline = RouteAssessmentPipeline::new(geocoder, router, water, rain, fast_settings())
        .with_events(tx);

    let err = pipeline.run(address("Home"), address("Nowhere")).await.unwrap_err();

    assert!(matches!(err, FloodRouteError::NotFound { ref query } if query == "Nowhere"));
    assert_eq!(pipeline.state(), RunState::Error);
    assert_eq!(geocoder_calls.count(), 2);
    assert_eq!(router_calls.count(), 0);
    assert_eq!(water_calls.count(), 0);
    assert_eq!(rain_calls.count(), 0);

    let events = drain(&mut rx);
    assert_eq!(states(&events), vec![RunState::ResolvingLocations, RunState::Error]);
    assert!(matches!(
        events.last(),
        Some(RunEvent::Failed { message, .. }) if message.contains("Nowhere")
    ));
}

#[tokio::test]
async fn test_no_route_ends_in_error() {
    let router = FakeRouter::new(RouteScript::NoRoute);
    let water = FakeWater::answering(false);
    let water_calls = water.calls.clone();
    let pipeline = RouteAssessmentPipeline::new(
        FakeGeocoder::default(),
        router,
        water,
        FakeRain::answering(0.0),
        fast_settings(),
    );

    let err = pipeline.run(pin(0.0, 0.0), pin(0.5, 0.5)).await.unwrap_err();

    assert!(matches!(err, FloodRouteError::NoRouteFound { .. }));
    assert_eq!(pipeline.state(), RunState::Error);
    assert_ne!(pipeline.state(), RunState::FetchingRoute);
    assert_eq!(water_calls.count(), 0);
}

#[tokio::test]
async fn test_empty_route_geometry_is_no_route() {
    let pipeline = RouteAssessmentPipeline::new(
        FakeGeocoder::default(),
        FakeRouter::path(vec![]),
        FakeWater::answering(false),
        FakeRain::answering(0.0),
        fast_settings(),
    );

    let err = pipeline.run(pin(0.0, 0.0), pin(0.5, 0.5)).await.unwrap_err();
    assert!(matches!(err, FloodRouteError::NoRouteFound { .. }));
    assert_eq!(pipeline.state(), RunState::Error);
}

#[tokio::test]
async fn test_router_failure_is_retried_then_surfaced() {
    let router = FakeRouter::new(RouteScript::Failure);
    let router_calls = router.calls.clone();
    let settings = PipelineSettings { provider_retries: 2, ..fast_settings() };
    let pipeline = RouteAssessmentPipeline::new(
        FakeGeocoder::default(),
        router,
        FakeWater::answering(false),
        FakeRain::answering(0.0),
        settings,
    );

    let err = pipeline.run(pin(0.0, 0.0), pin(0.5, 0.5)).await.unwrap_err();

    assert!(matches!(err, FloodRouteError::Provider { .. }));
    assert_eq!(router_calls.count(), 3);
    assert_eq!(pipeline.state(), RunState::Error);
}

#[tokio::test]
async fn test_pinned_endpoints_skip_geocoder() {
    let geocoder = FakeGeocoder::default();
    let geocoder_calls = geocoder.calls.clone();
    let pipeline = RouteAssessmentPipeline::new(
        geocoder,
        FakeRouter::path(straight_path(2)),
        FakeWater::answering(false),
        FakeRain::answering(6.0),
        fast_settings(),
    );

    let first = pipeline.run(pin(1.0, 2.0), pin(1.5, 2.5)).await.unwrap();
    let second = pipeline.run(pin(1.0, 2.0), pin(1.5, 2.5)).await.unwrap();

    assert_eq!(geocoder_calls.count(), 0);
    assert_eq!(first.origin, second.origin);
    assert_eq!(first.risk, RiskLevel::Medium);
    assert_ne!(first.run_id, second.run_id);
}

#[tokio::test]
async fn test_hung_router_times_out() {
    let router = FakeRouter::path(straight_path(3)).slow_first(Duration::from_secs(5));
    let settings =
        PipelineSettings { request_timeout: Duration::from_millis(50), ..fast_settings() };
    let pipeline = RouteAssessmentPipeline::new(
        FakeGeocoder::default(),
        router,
        FakeWater::answering(false),
        FakeRain::answering(0.0),
        settings,
    );

    let err = pipeline.run(pin(0.0, 0.0), pin(0.5, 0.5)).await.unwrap_err();

    assert!(matches!(
        err,
        FloodRouteError::Timeout { ref provider, .. } if provider == "fake-router"
    ));
    assert_eq!(pipeline.state(), RunState::Error);
}

#[tokio::test]
async fn test_hung_water_check_defaults_and_continues() {
    let water = FakeWater::answering(true).delayed(Duration::from_secs(5));
    let settings =
        PipelineSettings { request_timeout: Duration::from_millis(50), ..fast_settings() };
    let pipeline = RouteAssessmentPipeline::new(
        FakeGeocoder::default(),
        FakeRouter::path(straight_path(3)),
        water,
        FakeRain::answering(2.0),
        settings,
    );

    let report = pipeline.run(pin(0.0, 0.0), pin(0.5, 0.5)).await.unwrap();

    assert!(!report.any_water_detected);
    assert_eq!(report.water_unchecked, 1);
    assert_eq!(report.rain_unchecked, 0);
    assert_eq!(report.risk, RiskLevel::Low);
}

#[tokio::test]
async fn test_new_run_supersedes_in_flight_run() {
    let router = FakeRouter::path(straight_path(3)).slow_first(Duration::from_millis(300));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let pipeline = RouteAssessmentPipeline::new(
        FakeGeocoder::default(),
        router,
        FakeWater::answering(true),
        FakeRain::answering(3.0),
        fast_settings(),
    )
    .with_events(tx);

    let (first, second) = tokio::join!(pipeline.run(pin(0.0, 0.0), pin(0.5, 0.5)), async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        pipeline.run(pin(1.0, 1.0), pin(1.5, 1.5)).await
    });

    assert!(matches!(first, Err(FloodRouteError::Superseded { .. })));
    let second = second.unwrap();
    assert_eq!(second.risk, RiskLevel::Medium);
    assert_eq!(pipeline.state(), RunState::Done);

    let events = drain(&mut rx);
    let first_run_id = events.first().map(RunEvent::run_id).unwrap();
    assert_ne!(first_run_id, second.run_id);

    let first_events: Vec<&RunEvent> =
        events.iter().filter(|event| event.run_id() == first_run_id).collect();
    assert!(first_events
        .iter()
        .all(|event| matches!(event, RunEvent::StateChanged { .. })));
    assert!(!first_events.iter().any(|event| matches!(
        event,
        RunEvent::StateChanged { state: RunState::Error | RunState::Done, .. }
    )));

    let first_second_event =
        events.iter().position(|event| event.run_id() == second.run_id).unwrap();
    assert!(events[first_second_event..].iter().all(|event| event.run_id() == second.run_id));
}

#[tokio::test]
async fn test_parallel_sampling_keeps_path_order() {
    let vertices: Vec<_> = (0..6).map(|i| coord(i as f64, 10.0)).collect();
    let settings = PipelineSettings {
        sampling: SamplingMode::VertexStride(1),
        sample_concurrency: 4,
        ..fast_settings()
    };
    let (tx, mut rx) = mpsc::unbounded_channel();
    let pipeline = RouteAssessmentPipeline::new(
        FakeGeocoder::default(),
        FakeRouter::path(vertices.clone()),
        FakeWater::answering(false).staggered(),
        FakeRain::answering(4.0),
        settings,
    )
    .with_events(tx);

    let report = pipeline.run(pin(0.0, 10.0), pin(5.0, 10.0)).await.unwrap();

    let sampled: Vec<_> = report.samples.iter().map(|sample| sample.coordinate).collect();
    assert_eq!(sampled, vertices);

    let indices: Vec<usize> = drain(&mut rx)
        .into_iter()
        .filter_map(|event| match event {
            RunEvent::SampleChecked { index, total, .. } => {
                assert_eq!(total, 6);
                Some(index)
            }
            _ => None,
        })
        .collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(report.risk, RiskLevel::Low);
}

#[tokio::test]
async fn test_distance_sampling_mode() {
    // ~111 m between vertices, so a 300 m spacing keeps every third vertex
    let vertices: Vec<_> = (0..10).map(|i| coord(i as f64 * 0.001, 0.0)).collect();
    let settings = PipelineSettings {
        sampling: SamplingMode::Distance { spacing_m: 300.0 },
        ..fast_settings()
    };
    let pipeline = RouteAssessmentPipeline::new(
        FakeGeocoder::default(),
        FakeRouter::path(vertices.clone()),
        FakeWater::answering(false),
        FakeRain::answering(0.0),
        settings,
    );

    let report = pipeline.run(pin(0.0, 0.0), pin(0.009, 0.0)).await.unwrap();

    let sampled: Vec<_> = report.samples.iter().map(|sample| sample.coordinate).collect();
    assert_eq!(sampled, vec![vertices[0], vertices[3], vertices[6], vertices[9]]);
}
