//! Configuration providers.

use std::path::Path;

use crate::config::{ConfigError, SensorConfig};
use crate::ports::SensorConfigProvider;

/// Provider returning a configuration fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    config: SensorConfig,
}

impl StaticConfigProvider {
    pub fn new(config: SensorConfig) -> Self {
        Self { config }
    }
}

impl SensorConfigProvider for StaticConfigProvider {
    fn sensor_config(&self) -> SensorConfig {
        self.config.clone()
    }
}

/// Provider loading the configuration from a TOML file.
///
/// Unknown keys are a parse error; unset keys fall back to defaults.
#[derive(Debug, Clone)]
pub struct TomlConfigProvider {
    config: SensorConfig,
}

impl TomlConfigProvider {
    /// Load and parse the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(Self { config })
    }
}

impl SensorConfigProvider for TomlConfigProvider {
    fn sensor_config(&self) -> SensorConfig {
        self.config.clone()
    }
}
