//! Configuration loading for gridcrit.
//! Reads the file given by --config, else the GRIDCRIT_CONFIG env var, else
//! gridcrit.toml in the current directory; falls back to defaults when none exists.

use gridcrit_common::RunConfig;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CONFIG_ENV: &str = "GRIDCRIT_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "gridcrit.toml";

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Named explicitly; must exist
    Required(PathBuf),
    /// Conventional location; used only if present
    Optional(PathBuf),
}

pub fn config_source(explicit: Option<&Path>, env_value: Option<String>) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Required(path.to_path_buf());
    }
    match env_value.filter(|v| !v.is_empty()) {
        Some(path) => ConfigSource::Required(PathBuf::from(path)),
        None => ConfigSource::Optional(PathBuf::from(DEFAULT_CONFIG_FILE)),
    }
}

/// Path overrides given on the command line.
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub data_dir: Option<PathBuf>,
    pub dataset: Option<PathBuf>,
    pub weights: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl PathOverrides {
    pub fn apply(&self, config: &mut RunConfig) {
        if let Some(ref dir) = self.data_dir {
            config.paths.data_dir = dir.clone();
        }
        if let Some(ref file) = self.dataset {
            config.paths.dataset_file = file.clone();
        }
        if let Some(ref file) = self.weights {
            config.paths.weights_file = file.clone();
        }
        if let Some(ref file) = self.output {
            config.paths.output_file = file.clone();
        }
    }
}

/// Load the run configuration.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<RunConfig> {
    load_from(config_source(explicit, std::env::var(CONFIG_ENV).ok()))
}

pub fn load_from(source: ConfigSource) -> anyhow::Result<RunConfig> {
    let path = match source {
        ConfigSource::Required(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            path
        }
        ConfigSource::Optional(path) => {
            if !path.exists() {
                info!("No {} found, using default configuration", path.display());
                return Ok(RunConfig::default());
            }
            path
        }
    };

    let config = RunConfig::from_path(&path)
        .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;
    info!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

mod tests;
