//! Validation utilities for request inputs
//!
//! Regex patterns and validation functions for the fields the service
//! accepts from callers.

use crate::error::EcoTraceError;
use once_cell::sync::Lazy;
use regex::Regex;

/// UK postcode pattern, full or outward-only (e.g. "SW1A 1AA" or "SW1A")
pub static UK_POSTCODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]{1,2}\d[A-Za-z\d]?(\s*\d[A-Za-z]{2})?$")
        .expect("Failed to compile postcode regex")
});

/// URL validation regex (basic)
pub static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("Failed to compile URL regex"));

/// Validate a UK postcode.
///
/// # Examples
///
/// ```
/// use ecotrace_core::validation::validate_postcode;
///
/// assert!(validate_postcode("SW1A 1AA").is_ok());
/// assert!(validate_postcode("12345").is_err());
/// ```
pub fn validate_postcode(postcode: &str) -> Result<(), EcoTraceError> {
    if UK_POSTCODE_REGEX.is_match(postcode.trim()) {
        Ok(())
    } else {
        Err(EcoTraceError::validation_field(
            "Invalid UK postcode format",
            "postcode",
        ))
    }
}

/// Validate a product page URL.
///
/// # Examples
///
/// ```
/// use ecotrace_core::validation::validate_url;
///
/// assert!(validate_url("https://example.com/dp/B09G9D8KRQ").is_ok());
/// assert!(validate_url("not-a-url").is_err());
/// ```
pub fn validate_url(url: &str) -> Result<(), EcoTraceError> {
    if URL_REGEX.is_match(url) {
        Ok(())
    } else {
        Err(EcoTraceError::validation_field("Invalid URL format", "url"))
    }
}

/// Validate a product weight is positive and finite.
pub fn validate_weight(weight_kg: f64) -> Result<(), EcoTraceError> {
    if weight_kg.is_finite() && weight_kg > 0.0 {
        Ok(())
    } else {
        Err(EcoTraceError::validation_field(
            format!("Weight must be a positive number, got {}", weight_kg),
            "weight_kg",
        ))
    }
}
