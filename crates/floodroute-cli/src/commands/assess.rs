use crate::cli::{AssessArgs, SamplingArg};
use crate::config_loader::load_config_with_overrides;
use crate::errors;
use crate::interactive;
use crate::output::{styled_risk, styled_water, OutputWriter};
use crate::progress::AssessProgress;
use anyhow::Result;
use floodroute_assess::{AssessmentReport, PipelineSettings, RouteAssessmentPipeline, RunEvent};
use floodroute_core::config::{CliConfigOverrides, SamplingKind};
use floodroute_core::models::{CheckOutcome, LocationInput, RunState, Sample};
use floodroute_geo::{path_length_m, route_feature_collection};
use floodroute_providers::Providers;
use std::path::Path;
use tabled::Tabled;
use tokio::sync::mpsc;

#[derive(Tabled)]
struct SampleRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Latitude")]
    latitude: String,
    #[tabled(rename = "Longitude")]
    longitude: String,
    #[tabled(rename = "Water")]
    water: String,
    #[tabled(rename = "Rain (mm)")]
    rain: String,
    #[tabled(rename = "Checked")]
    checked: String,
}

impl SampleRow {
    fn new(index: usize, sample: &Sample) -> Self {
        Self {
            index,
            latitude: format!("{:.5}", sample.coordinate.latitude),
            longitude: format!("{:.5}", sample.coordinate.longitude),
            water: if sample.has_water() { "yes" } else { "no" }.to_string(),
            rain: format!("{:.1}", sample.rain_value_mm()),
            checked: if sample.fully_checked() { "✓" } else { "partial" }.to_string(),
        }
    }
}

pub async fn execute(
    args: AssessArgs,
    config_path: Option<&Path>,
    output: &OutputWriter,
) -> Result<()> {
    let overrides = overrides_from_args(&args);
    let config = load_config_with_overrides(config_path, overrides)?;
    let settings = PipelineSettings::from_config(&config)?;

    let (origin, destination) = endpoints(args)?;
    let providers = Providers::from_config(&config)?;
    output.info(format!("Assessing route from {} to {}", origin, destination));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let pipeline = RouteAssessmentPipeline::new(
        providers.geocoder,
        providers.router,
        providers.water,
        providers.precipitation,
        settings,
    )
    .with_events(tx);

    let mut renderer = EventRenderer::new(output);
    let mut run = std::pin::pin!(pipeline.run(origin, destination));

    // Render events while the run is in flight, then drain what is left
    let result = loop {
        tokio::select! {
            result = &mut run => break result,
            Some(event) = rx.recv() => renderer.handle(event),
        }
    };
    while let Ok(event) = rx.try_recv() {
        renderer.handle(event);
    }

    let report = result?;
    render_report(&report, output)
}

fn overrides_from_args(args: &AssessArgs) -> CliConfigOverrides {
    CliConfigOverrides {
        water_radius_m: args.radius,
        rain_window_hours: args.window,
        sampling: args.sampling.map(|kind| match kind {
            SamplingArg::Stride => SamplingKind::Stride,
            SamplingArg::Distance => SamplingKind::Distance,
        }),
        sample_stride: args.stride,
        sample_spacing_m: args.spacing,
        request_timeout_secs: args.timeout,
        sample_concurrency: args.concurrency,
    }
}

/// Pins win over addresses; missing endpoints are prompted for in interactive mode
fn endpoints(args: AssessArgs) -> Result<(LocationInput, LocationInput)> {
    let origin = LocationInput::from_parts(args.from, args.from_pin).ok();
    let destination = LocationInput::from_parts(args.to, args.to_pin).ok();

    if args.interactive {
        return interactive::complete_endpoints(origin, destination);
    }

    match (origin, destination) {
        (Some(origin), Some(destination)) => Ok((origin, destination)),
        (None, _) => Err(errors::missing_endpoint("origin").into()),
        (_, None) => Err(errors::missing_endpoint("destination").into()),
    }
}

/// Incremental terminal rendering of run events
struct EventRenderer {
    progress: AssessProgress,
}

impl EventRenderer {
    fn new(output: &OutputWriter) -> Self {
        Self { progress: AssessProgress::new(output.is_json()) }
    }

    fn handle(&mut self, event: RunEvent) {
        match event {
            RunEvent::StateChanged { state, message, .. } => match state {
                RunState::Sampling => self.progress.start_sampling(&message),
                RunState::Error => self.progress.fail(&message),
                RunState::Done => self.progress.finish("Assessment complete"),
                _ => self.progress.stage(&message),
            },
            RunEvent::RouteReady { path, .. } => {
                self.progress.println(format!(
                    "Route: {} vertices, {:.1} km",
                    path.len(),
                    path_length_m(&path) / 1000.0
                ));
            }
            RunEvent::SampleChecked { index, total, sample, .. } => {
                let water = sample.water.unwrap_or(CheckOutcome::defaulted(false));
                let rain_checked = sample.rain_mm.is_some_and(|r| r.checked);
                self.progress.println(format!(
                    "  [{}/{}] {}  water: {}  rain: {:.1} mm{}",
                    index + 1,
                    total,
                    sample.coordinate,
                    styled_water(water.value, water.checked),
                    sample.rain_value_mm(),
                    if rain_checked { "" } else { " (unchecked)" }
                ));
                self.progress.sample_done(total);
            }
            RunEvent::Finished { .. } | RunEvent::Failed { .. } => {}
        }
    }
}

fn render_report(report: &AssessmentReport, output: &OutputWriter) -> Result<()> {
    if output.is_json() {
        let geojson = route_feature_collection(&report.path, &report.samples);
        return output.result(serde_json::json!({
            "report": report,
            "geojson": geojson,
        }));
    }

    output.section("Samples");
    output.table(
        report.samples.iter().enumerate().map(|(i, sample)| SampleRow::new(i, sample)).collect(),
    );

    output.section("Route");
    output.kv("Run", report.run_id);
    output.kv("From", report.origin);
    output.kv("To", report.destination);
    output.kv("Vertices", report.route_vertices);
    output.kv("Length", format!("{:.1} km", report.route_length_m / 1000.0));
    output.kv("Risk", styled_risk(report.risk));

    if !report.is_fully_checked() {
        output.warning(format!(
            "{} water and {} rain checks failed and were counted as no hazard",
            report.water_unchecked, report.rain_unchecked
        ));
    }

    println!();
    output.success(report.summary());
    Ok(())
}
