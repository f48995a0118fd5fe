//! API error type and HTTP response mapping

use actix_web::{HttpResponse, ResponseError};
use ecotrace_core::EcoTraceError;
use ecotrace_model::ModelError;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Invalid postcode: {0}")]
    InvalidPostcode(String),

    #[error("Validation error: {0}")]
    Validation(#[from] EcoTraceError),

    #[error("Could not fetch product: {0}")]
    ScrapeFailed(String),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::MissingInput(_) | ApiError::InvalidPostcode(_) | ApiError::Validation(_) => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "invalid_request",
                    "message": self.to_string()
                }))
            }
            ApiError::ScrapeFailed(_) => HttpResponse::BadGateway().json(serde_json::json!({
                "error": "scrape_failed",
                "message": self.to_string()
            })),
            ApiError::Model(_) | ApiError::Dataset(_) | ApiError::Internal(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "internal_error",
                    "message": self.to_string()
                }))
            }
        }
    }
}
