//! Configuration loading for the grid tool.
//!
//! Settings come from an optional YAML file, then environment variables, then
//! command-line flags, each layer overriding the previous one.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use grid_engine::{GridEngineConfig, GridStructure};
use tracing::{debug, info};

/// Load the engine configuration, applying environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<GridEngineConfig> {
    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            info!(path = %path.display(), "Loaded configuration file");
            config
        }
        None => GridEngineConfig::default(),
    };

    config.apply_env();
    debug!(?config, "Effective configuration");
    Ok(config)
}

/// Parse a YAML configuration document. Missing fields keep their defaults.
pub fn parse_config(yaml: &str) -> Result<GridEngineConfig> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Check the final configuration after all overrides.
pub fn validate(config: &GridEngineConfig) -> Result<()> {
    config.validate().map_err(|e| anyhow!("Invalid configuration: {}", e))
}

/// Parse a `--shape` value: `I,J` for a 2D grid or `I,J,K` for 3D, with unit
/// cell sizes.
pub fn parse_shape(shape: &str) -> Result<GridStructure> {
    let counts = shape
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid cell count '{}' in shape '{}'", part, shape))
        })
        .collect::<Result<Vec<_>>>()?;

    let structure = match counts.as_slice() {
        [i, j] => GridStructure::simple_2d(*i, *j)?,
        [i, j, k] => GridStructure::simple_3d(*i, *j, *k)?,
        _ => bail!("Shape must be I,J or I,J,K, got '{}'", shape),
    };
    Ok(structure)
}
