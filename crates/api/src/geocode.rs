//! Postcode geocoding collaborator
//!
//! Resolves a UK postcode to coordinates from an outward-code table loaded
//! once at startup. The table is a two-plus-column CSV of outward code,
//! latitude, longitude.

use crate::error::ApiError;
use ecotrace_core::validation::validate_postcode;
use ecotrace_core::Coordinates;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Resolves a requester postcode to coordinates
pub trait Geocoder: Send + Sync {
    fn locate(&self, postcode: &str) -> Result<Coordinates, ApiError>;
}

#[derive(Debug, Deserialize)]
struct PostcodeRecord {
    outward: String,
    lat: f64,
    lon: f64,
}

/// Outward-code lookup table
pub struct PostcodeTable {
    outward: HashMap<String, Coordinates>,
}

impl PostcodeTable {
    /// Load the table from CSV. Records with invalid coordinates are skipped
    /// with a diagnostic.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let mut reader = csv::Reader::from_path(path.as_ref()).map_err(|e| {
            ApiError::Internal(format!(
                "open postcode table {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let mut outward = HashMap::new();
        for record in reader.deserialize::<PostcodeRecord>() {
            let record =
                record.map_err(|e| ApiError::Internal(format!("postcode table row: {}", e)))?;
            match Coordinates::new(record.lat, record.lon) {
                Ok(coords) => {
                    outward.insert(record.outward.to_uppercase(), coords);
                }
                Err(e) => {
                    tracing::warn!(outward = %record.outward, error = %e, "skipping postcode row");
                }
            }
        }
        tracing::info!(entries = outward.len(), "postcode table loaded");
        Ok(Self { outward })
    }

    /// Build directly from entries, for tests and embedded defaults.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Coordinates)>) -> Self {
        Self {
            outward: entries
                .into_iter()
                .map(|(code, coords)| (code.to_uppercase(), coords))
                .collect(),
        }
    }
}

impl Geocoder for PostcodeTable {
    fn locate(&self, postcode: &str) -> Result<Coordinates, ApiError> {
        validate_postcode(postcode)
            .map_err(|_| ApiError::InvalidPostcode(postcode.to_string()))?;

        // Keyed by outward code only; "SW1A 1AA" resolves via "SW1A"
        let normalized = postcode.trim().to_uppercase();
        let outward_code = match normalized.split_whitespace().next() {
            Some(head) if head.len() < normalized.len() => head.to_string(),
            // No separator: the inward part is always digit + two letters
            _ if normalized.len() > 4 => normalized[..normalized.len() - 3].to_string(),
            _ => normalized.clone(),
        };

        self.outward
            .get(&outward_code)
            .copied()
            .ok_or_else(|| ApiError::InvalidPostcode(postcode.to_string()))
    }
}
