use crate::error::{FloodRouteError, Result};
use crate::models::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the user described one endpoint of the route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationInput {
    /// Free-text address to be geocoded
    Address(String),
    /// Coordinate pinned on the map, used as-is
    Pinned(Coordinate),
}

impl LocationInput {
    /// Combine the two ways an endpoint can be given.
    ///
    /// A pinned coordinate wins over address text; blank text counts as absent.
    pub fn from_parts(address: Option<String>, pin: Option<Coordinate>) -> Result<Self> {
        if let Some(pin) = pin {
            return Ok(LocationInput::Pinned(pin));
        }

        match address.map(|a| a.trim().to_string()) {
            Some(text) if !text.is_empty() => Ok(LocationInput::Address(text)),
            _ => Err(FloodRouteError::InvalidInput {
                reason: "Either an address or a pinned coordinate is required".to_string(),
            }),
        }
    }

    pub fn is_pinned(&self) -> bool {
        matches!(self, LocationInput::Pinned(_))
    }
}

impl fmt::Display for LocationInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationInput::Address(text) => write!(f, "{}", text),
            LocationInput::Pinned(c) => write!(f, "pinned({})", c),
        }
    }
}
