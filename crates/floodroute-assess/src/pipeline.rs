use floodroute_core::error::{FloodRouteError, Result};
use floodroute_core::models::{Coordinate, LocationInput, RunState, Sample};
use floodroute_core::ports::{Geocoder, PrecipitationSource, RouteProvider, WaterFeatureSource};
use floodroute_geo::PathSampler;
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc::UnboundedSender;

use crate::aggregator::RouteFindings;
use crate::calls::hard_call;
use crate::cancel::CancelToken;
use crate::checks::{PrecipitationChecker, WaterProximityChecker};
use crate::models::{AssessmentReport, PipelineRunContext, RunEvent};
use crate::resolver::GeoResolver;
use crate::settings::PipelineSettings;

/// State shared between overlapping runs of one pipeline
#[derive(Debug, Default)]
struct RunSlot {
    state: RunState,
    generation: u64,
    token: Option<CancelToken>,
}

/// Route assessment pipeline: resolve, route, sample, check, classify
///
/// One logical run at a time. Starting a run while another is in flight
/// supersedes it: the older run is cancelled at its next suspension point,
/// returns [`FloodRouteError::Superseded`] and never writes state or events
/// again.
pub struct RouteAssessmentPipeline<G, R, W, P>
where
    G: Geocoder,
    R: RouteProvider,
    W: WaterFeatureSource,
    P: PrecipitationSource,
{
    resolver: GeoResolver<G>,
    router: R,
    water: WaterProximityChecker<W>,
    rain: PrecipitationChecker<P>,
    sampler: PathSampler,
    settings: PipelineSettings,
    slot: Mutex<RunSlot>,
    events: Option<UnboundedSender<RunEvent>>,
}

impl<G, R, W, P> RouteAssessmentPipeline<G, R, W, P>
where
    G: Geocoder,
    R: RouteProvider,
    W: WaterFeatureSource,
    P: PrecipitationSource,
{
    pub fn new(
        geocoder: G,
        router: R,
        water_source: W,
        rain_source: P,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            resolver: GeoResolver::new(geocoder),
            router,
            water: WaterProximityChecker::new(
                water_source,
                settings.water_radius_m,
                settings.request_timeout,
            ),
            rain: PrecipitationChecker::new(
                rain_source,
                settings.rain_window_hours,
                settings.request_timeout,
            ),
            sampler: PathSampler::new(settings.sampling),
            settings,
            slot: Mutex::new(RunSlot::default()),
            events: None,
        }
    }

    /// Stream run events to `sender`
    pub fn with_events(mut self, sender: UnboundedSender<RunEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Current state of the most recent run
    pub fn state(&self) -> RunState {
        self.lock_slot().state
    }

    /// Assess the route between two locations
    pub async fn run(
        &self,
        origin: LocationInput,
        destination: LocationInput,
    ) -> Result<AssessmentReport> {
        let mut context = self.begin();

        tracing::info!(
            run_id = %context.run_id,
            origin = %origin,
            destination = %destination,
            "Starting route assessment"
        );

        let result = self.execute(&mut context, &origin, &destination).await;
        if let Err(err) = &result {
            self.fail(&context, err);
        }
        result
    }

    async fn execute(
        &self,
        context: &mut PipelineRunContext,
        origin: &LocationInput,
        destination: &LocationInput,
    ) -> Result<AssessmentReport> {
        // Phase 1: Resolve both endpoints
        let origin = self.resolve(context, origin).await?;
        let destination = self.resolve(context, destination).await?;
        self.transition(context, RunState::FetchingRoute, "Fetching route...")?;

        // Phase 2: Fetch the route
        let policy = self.settings.call_policy();
        let path = self
            .guarded(
                context,
                hard_call(self.router.name(), policy, move || {
                    self.router.route(origin, destination)
                }),
            )
            .await?;

        if path.is_empty() {
            return Err(FloodRouteError::NoRouteFound {
                reason: "route geometry has no vertices".to_string(),
            });
        }

        self.emit(context, RunEvent::RouteReady { run_id: context.run_id, path: path.clone() })?;

        // Phase 3: Sample and check
        let points = self.sampler.sample(&path);
        tracing::info!(
            run_id = %context.run_id,
            vertices = path.len(),
            samples = points.len(),
            sampling = ?self.sampler.mode(),
            radius_m = self.water.radius_m(),
            window_hours = self.rain.window_hours(),
            "Route obtained"
        );
        self.transition(
            context,
            RunState::Sampling,
            format!("Checking {} sample points...", points.len()),
        )?;

        let findings = self.check_samples(context, points).await?;
        if !findings.fully_checked() {
            tracing::warn!(
                run_id = %context.run_id,
                water_unchecked = findings.water_unchecked,
                rain_unchecked = findings.rain_unchecked,
                "Some checks failed and were counted as no hazard"
            );
        }

        // Phase 4: Classify and publish
        let report = AssessmentReport::from_findings(context, origin, destination, path, findings);
        self.commit(
            context,
            Some(RunState::Done),
            [
                RunEvent::StateChanged {
                    run_id: context.run_id,
                    state: RunState::Done,
                    message: report.summary(),
                },
                RunEvent::Finished { run_id: context.run_id, report: Box::new(report.clone()) },
            ],
        )?;

        tracing::info!(
            run_id = %context.run_id,
            risk = %report.risk,
            any_water = report.any_water_detected,
            max_rain_mm = report.max_rain_mm,
            water_unchecked = report.water_unchecked,
            rain_unchecked = report.rain_unchecked,
            "Assessment complete"
        );

        Ok(report)
    }

    async fn resolve(
        &self,
        context: &PipelineRunContext,
        input: &LocationInput,
    ) -> Result<Coordinate> {
        let policy = self.settings.call_policy();
        let provider = self.resolver.geocoder().name();

        self.guarded(context, hard_call(provider, policy, move || self.resolver.resolve(input)))
            .await
    }

    /// Check every sample, emitting results in path order
    async fn check_samples(
        &self,
        context: &mut PipelineRunContext,
        points: Vec<Coordinate>,
    ) -> Result<RouteFindings> {
        let total = points.len();
        let concurrency = self.settings.sample_concurrency.max(1);
        let mut findings = RouteFindings::default();

        let mut checked = std::pin::pin!(stream::iter(points)
            .map(|point| self.check_sample(point))
            .buffered(concurrency));

        let mut index = 0;
        loop {
            let next = tokio::select! {
                biased;
                _ = context.token.cancelled() => return Err(superseded(context)),
                next = checked.next() => next,
            };
            let Some(sample) = next else { break };

            findings.record(&sample);
            context.samples.push(sample.clone());
            self.emit(context, RunEvent::SampleChecked {
                run_id: context.run_id,
                index,
                total,
                sample,
            })?;
            index += 1;
        }

        Ok(findings)
    }

    /// Water first, then rain
    async fn check_sample(&self, point: Coordinate) -> Sample {
        let mut sample = Sample::new(point);
        sample.water = Some(self.water.has_nearby_water(point).await);
        sample.rain_mm = Some(self.rain.recent_rainfall_mm(point).await);
        sample
    }

    /// Race `call` against this run being superseded
    async fn guarded<T, F>(&self, context: &PipelineRunContext, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::select! {
            biased;
            _ = context.token.cancelled() => Err(superseded(context)),
            result = call => result,
        }
    }

    fn begin(&self) -> PipelineRunContext {
        let mut slot = self.lock_slot();

        if let Some(previous) = slot.token.take() {
            if !slot.state.is_settled() {
                tracing::info!(state = %slot.state, "Superseding in-flight run");
            }
            previous.cancel();
        }

        slot.generation += 1;
        let token = CancelToken::new();
        slot.token = Some(token.clone());
        slot.state = RunState::ResolvingLocations;

        let context = PipelineRunContext::new(slot.generation, token);
        self.send(RunEvent::StateChanged {
            run_id: context.run_id,
            state: RunState::ResolvingLocations,
            message: "Resolving locations...".to_string(),
        });
        context
    }

    fn transition(
        &self,
        context: &PipelineRunContext,
        next: RunState,
        message: impl Into<String>,
    ) -> Result<()> {
        let event =
            RunEvent::StateChanged { run_id: context.run_id, state: next, message: message.into() };
        self.commit(context, Some(next), [event])
    }

    fn emit(&self, context: &PipelineRunContext, event: RunEvent) -> Result<()> {
        self.commit(context, None, [event])
    }

    fn fail(&self, context: &PipelineRunContext, err: &FloodRouteError) {
        if matches!(err, FloodRouteError::Superseded { .. }) {
            tracing::info!(run_id = %context.run_id, "Run superseded, discarding results");
            return;
        }

        tracing::warn!(run_id = %context.run_id, error = %err, "Assessment failed");

        let message = err.to_string();
        let events = [
            RunEvent::StateChanged {
                run_id: context.run_id,
                state: RunState::Error,
                message: message.clone(),
            },
            RunEvent::Failed { run_id: context.run_id, message },
        ];
        if self.commit(context, Some(RunState::Error), events).is_err() {
            tracing::debug!(run_id = %context.run_id, "Superseded before failure was recorded");
        }
    }

    /// Apply a state change and events atomically, if this run is still current
    fn commit<I>(
        &self,
        context: &PipelineRunContext,
        next: Option<RunState>,
        events: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = RunEvent>,
    {
        let mut slot = self.lock_slot();

        if slot.generation != context.generation || context.token.is_cancelled() {
            return Err(superseded(context));
        }

        if let Some(next) = next {
            if !slot.state.can_transition_to(next) {
                tracing::warn!(from = %slot.state, to = %next, "Unexpected state transition");
            }
            slot.state = next;
        }

        for event in events {
            self.send(event);
        }
        Ok(())
    }

    fn send(&self, event: RunEvent) {
        if let Some(sender) = &self.events {
            // A closed receiver just means nobody is watching
            let _ = sender.send(event);
        }
    }

    fn lock_slot(&self) -> std::sync::MutexGuard<'_, RunSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn superseded(context: &PipelineRunContext) -> FloodRouteError {
    FloodRouteError::Superseded { run_id: context.run_id.to_string() }
}
