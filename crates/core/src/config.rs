//! Shared configuration loader for the EcoTrace service
//!
//! Environment variable parsing with typed values, validation, and `.env`
//! support via dotenvy (loaded by the binary). All configuration uses the
//! `ECOTRACE_` prefix. Override hierarchy: defaults < .env < environment.

use crate::error::EcoTraceError;
use std::str::FromStr;

/// Configuration loader trait
///
/// Standardized methods for loading and validating configuration from
/// environment variables.
pub trait ConfigLoader: Sized {
    /// Load configuration from environment variables, with defaults for
    /// missing optional values.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if a value cannot be parsed.
    fn from_env() -> Result<Self, EcoTraceError>;

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if any check fails.
    fn validate(&self) -> Result<(), EcoTraceError>;
}

/// HTTP service configuration
///
/// # Environment Variables
///
/// - `ECOTRACE_HOST` (optional): Bind address (default: 0.0.0.0)
/// - `ECOTRACE_PORT` (optional): Bind port (default: 8080)
/// - `ECOTRACE_WORKERS` (optional): Actix worker count (default: 4)
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: 4,
        }
    }
}

impl ConfigLoader for ServiceConfig {
    fn from_env() -> Result<Self, EcoTraceError> {
        let defaults = ServiceConfig::default();
        Ok(Self {
            host: std::env::var("ECOTRACE_HOST").unwrap_or(defaults.host),
            port: parse_env_var("ECOTRACE_PORT", defaults.port)?,
            workers: parse_env_var("ECOTRACE_WORKERS", defaults.workers)?,
        })
    }

    fn validate(&self) -> Result<(), EcoTraceError> {
        if self.host.is_empty() {
            return Err(EcoTraceError::config("host must not be empty", "ECOTRACE_HOST"));
        }
        if self.port == 0 {
            return Err(EcoTraceError::config("port must be non-zero", "ECOTRACE_PORT"));
        }
        if self.workers == 0 {
            return Err(EcoTraceError::config(
                "workers must be greater than 0",
                "ECOTRACE_WORKERS",
            ));
        }
        Ok(())
    }
}

/// Pre-fitted classifier bundle configuration
///
/// # Environment Variables
///
/// - `ECOTRACE_MODEL_PATH` (optional): Path to the JSON model bundle
///   (default: models/eco_model.json)
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub bundle_path: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            bundle_path: "models/eco_model.json".to_string(),
        }
    }
}

impl ConfigLoader for ModelConfig {
    fn from_env() -> Result<Self, EcoTraceError> {
        Ok(Self {
            bundle_path: std::env::var("ECOTRACE_MODEL_PATH")
                .unwrap_or(ModelConfig::default().bundle_path),
        })
    }

    fn validate(&self) -> Result<(), EcoTraceError> {
        if self.bundle_path.is_empty() {
            return Err(EcoTraceError::config(
                "model bundle path must not be empty",
                "ECOTRACE_MODEL_PATH",
            ));
        }
        Ok(())
    }
}

/// Flat-file data configuration
///
/// # Environment Variables
///
/// - `ECOTRACE_DATASET_PATH` (optional): Append-only dataset CSV
///   (default: data/eco_dataset.csv)
/// - `ECOTRACE_TRAINING_PATH` (optional): Validated scraped-rows training CSV
///   (default: data/real_scraped_dataset.csv)
/// - `ECOTRACE_FEEDBACK_PATH` (optional): User feedback JSON file
///   (default: data/user_feedback.json)
/// - `ECOTRACE_POSTCODE_PATH` (optional): Outward postcode coordinate table
///   (default: data/postcodes.csv)
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub dataset_path: String,
    pub training_path: String,
    pub feedback_path: String,
    pub postcode_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dataset_path: "data/eco_dataset.csv".to_string(),
            training_path: "data/real_scraped_dataset.csv".to_string(),
            feedback_path: "data/user_feedback.json".to_string(),
            postcode_path: "data/postcodes.csv".to_string(),
        }
    }
}

impl ConfigLoader for DataConfig {
    fn from_env() -> Result<Self, EcoTraceError> {
        let defaults = DataConfig::default();
        Ok(Self {
            dataset_path: std::env::var("ECOTRACE_DATASET_PATH").unwrap_or(defaults.dataset_path),
            training_path: std::env::var("ECOTRACE_TRAINING_PATH")
                .unwrap_or(defaults.training_path),
            feedback_path: std::env::var("ECOTRACE_FEEDBACK_PATH")
                .unwrap_or(defaults.feedback_path),
            postcode_path: std::env::var("ECOTRACE_POSTCODE_PATH")
                .unwrap_or(defaults.postcode_path),
        })
    }

    fn validate(&self) -> Result<(), EcoTraceError> {
        for (value, key) in [
            (&self.dataset_path, "ECOTRACE_DATASET_PATH"),
            (&self.training_path, "ECOTRACE_TRAINING_PATH"),
            (&self.feedback_path, "ECOTRACE_FEEDBACK_PATH"),
            (&self.postcode_path, "ECOTRACE_POSTCODE_PATH"),
        ] {
            if value.is_empty() {
                return Err(EcoTraceError::config("path must not be empty", key));
            }
        }
        Ok(())
    }
}

/// Parse an environment variable into a typed value, falling back to a
/// default when the variable is unset.
pub fn parse_env_var<T: FromStr>(key: &str, default: T) -> Result<T, EcoTraceError> {
    match std::env::var(key) {
        Ok(raw) => raw.parse::<T>().map_err(|_| {
            EcoTraceError::config(format!("could not parse value '{}'", raw), key)
        }),
        Err(_) => Ok(default),
    }
}
