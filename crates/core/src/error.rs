//! Error types for EcoTrace core operations

use thiserror::Error;

/// Errors produced by the core pipeline.
///
/// The scoring functions themselves never fail; these errors surface from
/// configuration loading and input validation only.
#[derive(Debug, Error)]
pub enum EcoTraceError {
    #[error("Configuration error: {message}")]
    ConfigurationError {
        message: String,
        key: Option<String>,
    },

    #[error("Validation error: {message}")]
    ValidationError {
        message: String,
        field: Option<String>,
    },
}

impl EcoTraceError {
    /// Create a configuration error tied to an environment variable key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Create a validation error tied to a specific field
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_field_carries_field_name() {
        let err = EcoTraceError::validation_field("out of range", "latitude");
        match err {
            EcoTraceError::ValidationError { field, .. } => {
                assert_eq!(field.as_deref(), Some("latitude"));
            }
            _ => panic!("expected validation error"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = EcoTraceError::config("missing value", "ECOTRACE_PORT");
        assert!(err.to_string().contains("missing value"));
    }
}
