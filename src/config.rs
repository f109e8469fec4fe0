use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, Result, RetroLensError},
    filters::{FilterConfig, FilterKind},
};

/// Main configuration for Retro-Lens
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Render loop settings
    pub pipeline: PipelineConfig,

    /// Per-filter tuning
    pub filters: FilterConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| invalid_value("config", e))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate()?;
        self.filters.validate()?;
        Ok(())
    }
}

/// Render loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Presentation ticks per second
    pub fps: f64,

    /// Mirror frames horizontally before presenting (selfie view)
    pub mirror: bool,

    /// Threads used for per-frame pixel work
    pub worker_threads: usize,

    /// Filter selected at startup
    pub initial_filter: FilterKind,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fps: 30.0,
            mirror: true,
            worker_threads: num_cpus::get(),
            initial_filter: FilterKind::Identity,
        }
    }
}

impl PipelineConfig {
    fn validate(&self) -> Result<()> {
        if !(self.fps > 0.0 && self.fps <= 240.0) {
            return Err(invalid_value("pipeline.fps", self.fps));
        }

        if self.worker_threads == 0 {
            return Err(invalid_value("pipeline.worker_threads", self.worker_threads));
        }

        Ok(())
    }
}

/// Build an `InvalidValue` configuration error
pub(crate) fn invalid_value(key: &str, value: impl ToString) -> RetroLensError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
    .into()
}
