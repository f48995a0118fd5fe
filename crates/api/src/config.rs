//! Service configuration aggregate

use ecotrace_core::{ConfigLoader, DataConfig, EcoTraceError, ModelConfig, ServiceConfig};

/// Full configuration for the API binary, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub service: ServiceConfig,
    pub model: ModelConfig,
    pub data: DataConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, EcoTraceError> {
        let config = Self {
            service: ServiceConfig::from_env()?,
            model: ModelConfig::from_env()?,
            data: DataConfig::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EcoTraceError> {
        self.service.validate()?;
        self.model.validate()?;
        self.data.validate()?;
        Ok(())
    }
}
