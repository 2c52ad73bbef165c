//! Error types for FloodRoute

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FloodRouteError {
    // Location resolution errors
    #[error("No location found for '{query}'")]
    NotFound { query: String },

    #[error(
        "Invalid coordinate ({latitude}, {longitude}): \
         latitude must be in [-90, 90] and longitude in [-180, 180]"
    )]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    // Routing errors
    #[error("No route found: {reason}")]
    NoRouteFound { reason: String },

    // Provider errors
    #[error("{provider} request failed: {reason}")]
    Provider { provider: String, reason: String },

    #[error("{provider} did not respond within {seconds}s")]
    Timeout { provider: String, seconds: u64 },

    // Run lifecycle
    #[error("Run {run_id} was superseded by a newer run")]
    Superseded { run_id: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FloodRouteError {
    /// Build a provider error from any displayable cause
    pub fn provider(provider: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        FloodRouteError::Provider { provider: provider.into(), reason: reason.to_string() }
    }

    /// Transport, parse and timeout failures of an external collaborator.
    ///
    /// These are the only failures worth retrying.
    pub fn is_provider_error(&self) -> bool {
        matches!(self, FloodRouteError::Provider { .. } | FloodRouteError::Timeout { .. })
    }
}

impl From<serde_json::Error> for FloodRouteError {
    fn from(err: serde_json::Error) -> Self {
        FloodRouteError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FloodRouteError>;
