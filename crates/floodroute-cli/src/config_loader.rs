//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use floodroute_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "floodroute.toml";

/// Load layered configuration: defaults, then file, then environment.
///
/// An explicit path must exist; the default file is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<LayeredConfig> {
    let config = LayeredConfig::with_defaults();

    let config = match config_path(explicit) {
        Some(path) => config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?,
        None => config,
    };

    Ok(config.load_from_env())
}

/// Load layered configuration with CLI overrides on top
pub fn load_config_with_overrides(
    explicit: Option<&Path>,
    overrides: CliConfigOverrides,
) -> Result<LayeredConfig> {
    let mut config = load_config(explicit)?;
    config.update_from_cli(overrides);
    Ok(config)
}

fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        }
    }
}
