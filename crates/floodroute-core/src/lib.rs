//! FloodRoute Core - Domain models, error taxonomy, and configuration
//!
//! This crate contains the core domain types and port definitions for the
//! route waterlogging assessment system.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{FloodRouteError, Result};
