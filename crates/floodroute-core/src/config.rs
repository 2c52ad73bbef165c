use crate::error::{FloodRouteError, Result};
use crate::models::SamplingMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Which sampling strategy to use when thinning a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SamplingKind {
    /// Fixed vertex-count stride
    #[default]
    Stride,
    /// Haversine spacing along the path
    Distance,
}

/// Layered configuration for FloodRoute
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub geocoder_url: ConfigValue<String>,
    pub router_url: ConfigValue<String>,
    pub overpass_url: ConfigValue<String>,
    pub weather_url: ConfigValue<String>,
    pub user_agent: ConfigValue<String>,
    pub water_radius_m: ConfigValue<f64>,
    pub rain_window_hours: ConfigValue<u32>,
    pub sampling: ConfigValue<SamplingKind>,
    pub sample_stride: ConfigValue<usize>,
    pub sample_spacing_m: ConfigValue<f64>,
    pub request_timeout_secs: ConfigValue<u64>,
    pub sample_concurrency: ConfigValue<usize>,
    pub provider_retries: ConfigValue<u32>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        let d = ConfigSource::Default;
        Self {
            geocoder_url: ConfigValue::new("https://nominatim.openstreetmap.org".to_string(), d),
            router_url: ConfigValue::new("https://router.project-osrm.org".to_string(), d),
            overpass_url: ConfigValue::new(
                "https://overpass-api.de/api/interpreter".to_string(),
                d,
            ),
            weather_url: ConfigValue::new("https://api.open-meteo.com".to_string(), d),
            user_agent: ConfigValue::new(
                format!("floodroute/{}", env!("CARGO_PKG_VERSION")),
                d,
            ),
            water_radius_m: ConfigValue::new(60.0, d),
            rain_window_hours: ConfigValue::new(3, d),
            sampling: ConfigValue::new(SamplingKind::Stride, d),
            sample_stride: ConfigValue::new(10, d),
            sample_spacing_m: ConfigValue::new(200.0, d),
            request_timeout_secs: ConfigValue::new(15, d),
            sample_concurrency: ConfigValue::new(1, d),
            provider_retries: ConfigValue::new(0, d),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| FloodRouteError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| FloodRouteError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        let f = ConfigSource::File;
        if let Some(v) = file_config.geocoder_url {
            self.geocoder_url.update(v, f);
        }
        if let Some(v) = file_config.router_url {
            self.router_url.update(v, f);
        }
        if let Some(v) = file_config.overpass_url {
            self.overpass_url.update(v, f);
        }
        if let Some(v) = file_config.weather_url {
            self.weather_url.update(v, f);
        }
        if let Some(v) = file_config.user_agent {
            self.user_agent.update(v, f);
        }
        if let Some(v) = file_config.water_radius_m {
            self.water_radius_m.update(v, f);
        }
        if let Some(v) = file_config.rain_window_hours {
            self.rain_window_hours.update(v, f);
        }
        if let Some(v) = file_config.sampling {
            self.sampling.update(v, f);
        }
        if let Some(v) = file_config.sample_stride {
            self.sample_stride.update(v, f);
        }
        if let Some(v) = file_config.sample_spacing_m {
            self.sample_spacing_m.update(v, f);
        }
        if let Some(v) = file_config.request_timeout_secs {
            self.request_timeout_secs.update(v, f);
        }
        if let Some(v) = file_config.sample_concurrency {
            self.sample_concurrency.update(v, f);
        }
        if let Some(v) = file_config.provider_retries {
            self.provider_retries.update(v, f);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        let e = ConfigSource::Environment;

        if let Ok(v) = env::var("FLOODROUTE_GEOCODER_URL") {
            self.geocoder_url.update(v, e);
        }
        if let Ok(v) = env::var("FLOODROUTE_ROUTER_URL") {
            self.router_url.update(v, e);
        }
        if let Ok(v) = env::var("FLOODROUTE_OVERPASS_URL") {
            self.overpass_url.update(v, e);
        }
        if let Ok(v) = env::var("FLOODROUTE_WEATHER_URL") {
            self.weather_url.update(v, e);
        }
        if let Ok(v) = env::var("FLOODROUTE_USER_AGENT") {
            self.user_agent.update(v, e);
        }

        if let Some(v) = parse_env("FLOODROUTE_WATER_RADIUS_M", "a distance in meters") {
            self.water_radius_m.update(v, e);
        }
        if let Some(v) = parse_env("FLOODROUTE_RAIN_WINDOW_HOURS", "a whole number of hours") {
            self.rain_window_hours.update(v, e);
        }
        if let Ok(raw) = env::var("FLOODROUTE_SAMPLING") {
            match parse_sampling_kind(&raw) {
                Ok(kind) => self.sampling.update(kind, e),
                Err(_) => tracing::warn!(
                    "Invalid FLOODROUTE_SAMPLING value '{}': expected stride or distance",
                    raw
                ),
            }
        }
        if let Some(v) = parse_env("FLOODROUTE_SAMPLE_STRIDE", "a positive integer") {
            self.sample_stride.update(v, e);
        }
        if let Some(v) = parse_env("FLOODROUTE_SAMPLE_SPACING_M", "a distance in meters") {
            self.sample_spacing_m.update(v, e);
        }
        if let Some(v) = parse_env("FLOODROUTE_REQUEST_TIMEOUT_SECS", "a whole number of seconds")
        {
            self.request_timeout_secs.update(v, e);
        }
        if let Some(v) = parse_env("FLOODROUTE_SAMPLE_CONCURRENCY", "a positive integer") {
            self.sample_concurrency.update(v, e);
        }
        if let Some(v) = parse_env("FLOODROUTE_PROVIDER_RETRIES", "a whole number") {
            self.provider_retries.update(v, e);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        let c = ConfigSource::Cli;
        if let Some(v) = overrides.water_radius_m {
            self.water_radius_m.update(v, c);
        }
        if let Some(v) = overrides.rain_window_hours {
            self.rain_window_hours.update(v, c);
        }
        if let Some(v) = overrides.sampling {
            self.sampling.update(v, c);
        }
        if let Some(v) = overrides.sample_stride {
            self.sample_stride.update(v, c);
        }
        if let Some(v) = overrides.sample_spacing_m {
            self.sample_spacing_m.update(v, c);
        }
        if let Some(v) = overrides.request_timeout_secs {
            self.request_timeout_secs.update(v, c);
        }
        if let Some(v) = overrides.sample_concurrency {
            self.sample_concurrency.update(v, c);
        }
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        let invalid = |key: &str, reason: &str| FloodRouteError::ConfigInvalid {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        if self.sample_stride.value == 0 {
            return Err(invalid("sample_stride", "must be at least 1"));
        }
        if !(self.sample_spacing_m.value > 0.0) {
            return Err(invalid("sample_spacing_m", "must be greater than 0"));
        }
        if !(self.water_radius_m.value > 0.0) {
            return Err(invalid("water_radius_m", "must be greater than 0"));
        }
        if self.rain_window_hours.value == 0 {
            return Err(invalid("rain_window_hours", "must be at least 1"));
        }
        if self.request_timeout_secs.value == 0 {
            return Err(invalid("request_timeout_secs", "must be at least 1"));
        }
        if self.sample_concurrency.value == 0 {
            return Err(invalid("sample_concurrency", "must be at least 1"));
        }

        for (key, url) in [
            ("geocoder_url", &self.geocoder_url.value),
            ("router_url", &self.router_url.value),
            ("overpass_url", &self.overpass_url.value),
            ("weather_url", &self.weather_url.value),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(invalid(key, "must be an http(s) URL"));
            }
        }

        Ok(())
    }

    /// Sampling strategy selected by `sampling`, `sample_stride` and `sample_spacing_m`
    pub fn sampling_mode(&self) -> SamplingMode {
        match self.sampling.value {
            SamplingKind::Stride => SamplingMode::VertexStride(self.sample_stride.value),
            SamplingKind::Distance => {
                SamplingMode::Distance { spacing_m: self.sample_spacing_m.value }
            }
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        let mut put = |key: &str, value: String, source: ConfigSource| {
            map.insert(key.to_string(), (value, source));
        };

        put("geocoder_url", self.geocoder_url.value.clone(), self.geocoder_url.source);
        put("router_url", self.router_url.value.clone(), self.router_url.source);
        put("overpass_url", self.overpass_url.value.clone(), self.overpass_url.source);
        put("weather_url", self.weather_url.value.clone(), self.weather_url.source);
        put("user_agent", self.user_agent.value.clone(), self.user_agent.source);
        put(
            "water_radius_m",
            format!("{} m", self.water_radius_m.value),
            self.water_radius_m.source,
        );
        put(
            "rain_window_hours",
            format!("{} h", self.rain_window_hours.value),
            self.rain_window_hours.source,
        );
        put("sampling", format!("{:?}", self.sampling.value), self.sampling.source);
        put("sample_stride", self.sample_stride.value.to_string(), self.sample_stride.source);
        put(
            "sample_spacing_m",
            format!("{} m", self.sample_spacing_m.value),
            self.sample_spacing_m.source,
        );
        put(
            "request_timeout_secs",
            format!("{} s", self.request_timeout_secs.value),
            self.request_timeout_secs.source,
        );
        put(
            "sample_concurrency",
            self.sample_concurrency.value.to_string(),
            self.sample_concurrency.source,
        );
        put(
            "provider_retries",
            self.provider_retries.value.to_string(),
            self.provider_retries.source,
        );

        map
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, expected: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("Invalid {} value '{}': expected {}", key, raw, expected);
            None
        }
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    geocoder_url: Option<String>,
    router_url: Option<String>,
    overpass_url: Option<String>,
    weather_url: Option<String>,
    user_agent: Option<String>,
    water_radius_m: Option<f64>,
    rain_window_hours: Option<u32>,
    sampling: Option<SamplingKind>,
    sample_stride: Option<usize>,
    sample_spacing_m: Option<f64>,
    request_timeout_secs: Option<u64>,
    sample_concurrency: Option<usize>,
    provider_retries: Option<u32>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub water_radius_m: Option<f64>,
    pub rain_window_hours: Option<u32>,
    pub sampling: Option<SamplingKind>,
    pub sample_stride: Option<usize>,
    pub sample_spacing_m: Option<f64>,
    pub request_timeout_secs: Option<u64>,
    pub sample_concurrency: Option<usize>,
}

/// Parse sampling kind from string
pub fn parse_sampling_kind(s: &str) -> Result<SamplingKind> {
    match s.trim().to_lowercase().as_str() {
        "stride" | "vertex" => Ok(SamplingKind::Stride),
        "distance" | "spacing" => Ok(SamplingKind::Distance),
        _ => Err(FloodRouteError::ConfigInvalid {
            key: "sampling".to_string(),
            reason: format!("Invalid sampling mode: {}. Use stride or distance", s),
        }),
    }
}
