use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of one pipeline instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RunState {
    #[default]
    Idle,
    ResolvingLocations,
    FetchingRoute,
    Sampling,
    Error,
    Done,
}

impl RunState {
    /// A new run may start from this state without superseding anything
    pub fn is_settled(&self) -> bool {
        matches!(self, RunState::Idle | RunState::Done | RunState::Error)
    }

    /// Whether `next` is a legal transition from this state.
    ///
    /// Any in-flight state may fail to `Error`; settled states only restart.
    pub fn can_transition_to(&self, next: RunState) -> bool {
        use RunState::*;
        match (self, next) {
            (Idle | Done | Error, ResolvingLocations) => true,
            (ResolvingLocations, FetchingRoute) => true,
            (FetchingRoute, Sampling) => true,
            (Sampling, Done) => true,
            (ResolvingLocations | FetchingRoute | Sampling, Error) => true,
            _ => false,
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunState::Idle => "Idle",
            RunState::ResolvingLocations => "Resolving locations",
            RunState::FetchingRoute => "Fetching route",
            RunState::Sampling => "Sampling",
            RunState::Error => "Error",
            RunState::Done => "Done",
        };
        write!(f, "{}", label)
    }
}

/// Three-tier waterlogging risk for a whole route
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        write!(f, "{}", label)
    }
}
