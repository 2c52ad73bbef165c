use clap::{Parser, Subcommand};
use floodroute_core::models::Coordinate;
use std::path::PathBuf;

/// FloodRoute - Waterlogging risk along a driving route
#[derive(Parser, Debug)]
#[command(name = "floodroute")]
#[command(about = "Waterlogging risk along a driving route", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./floodroute.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assess the waterlogging risk of a route
    Assess(AssessArgs),

    /// Show the effective configuration and where each value comes from
    Config,
}

/// Sampling strategy selection
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SamplingArg {
    /// Every n-th route vertex
    Stride,
    /// Points spaced along the route by distance
    Distance,
}

#[derive(Parser, Debug, Default)]
pub struct AssessArgs {
    /// Origin address
    #[arg(long, value_name = "ADDRESS")]
    pub from: Option<String>,

    /// Origin as a pinned coordinate, e.g. 19.0760,72.8777 (wins over --from)
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
    pub from_pin: Option<Coordinate>,

    /// Destination address
    #[arg(long, value_name = "ADDRESS")]
    pub to: Option<String>,

    /// Destination as a pinned coordinate (wins over --to)
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
    pub to_pin: Option<Coordinate>,

    /// Interactive mode - prompt for missing endpoints
    #[arg(long, short = 'i')]
    pub interactive: bool,

    /// Sampling strategy
    #[arg(long, value_enum)]
    pub sampling: Option<SamplingArg>,

    /// Vertex stride for stride sampling
    #[arg(long, value_name = "N")]
    pub stride: Option<usize>,

    /// Spacing in meters for distance sampling
    #[arg(long, value_name = "METERS")]
    pub spacing: Option<f64>,

    /// Water search radius in meters
    #[arg(long, value_name = "METERS")]
    pub radius: Option<f64>,

    /// Rainfall window in hours
    #[arg(long, value_name = "HOURS")]
    pub window: Option<u32>,

    /// Sample points checked concurrently
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}
