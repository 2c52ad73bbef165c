use floodroute_core::config::LayeredConfig;
use floodroute_core::error::Result;
use floodroute_core::models::SamplingMode;
use std::time::Duration;

use crate::calls::CallPolicy;

/// Resolved, plain-value settings for one pipeline instance
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub sampling: SamplingMode,
    pub water_radius_m: f64,
    pub rain_window_hours: u32,
    pub request_timeout: Duration,
    /// Samples in flight at once; 1 means strictly sequential
    pub sample_concurrency: usize,
    /// Extra attempts for geocoding and routing on provider errors
    pub provider_retries: u32,
    pub retry_backoff: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            sampling: SamplingMode::VertexStride(10),
            water_radius_m: 60.0,
            rain_window_hours: 3,
            request_timeout: Duration::from_secs(15),
            sample_concurrency: 1,
            provider_retries: 0,
            retry_backoff: Duration::from_millis(250),
        }
    }
}

impl PipelineSettings {
    /// Project a validated layered configuration
    pub fn from_config(config: &LayeredConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            sampling: config.sampling_mode(),
            water_radius_m: config.water_radius_m.value,
            rain_window_hours: config.rain_window_hours.value,
            request_timeout: Duration::from_secs(config.request_timeout_secs.value),
            sample_concurrency: config.sample_concurrency.value,
            provider_retries: config.provider_retries.value,
            ..Self::default()
        })
    }

    pub fn call_policy(&self) -> CallPolicy {
        CallPolicy {
            timeout: self.request_timeout,
            retries: self.provider_retries,
            backoff: self.retry_backoff,
        }
    }
}
