//! Great-circle distance and transport mode resolution

use crate::error::EcoTraceError;
use crate::tables::OVERRIDE_EMISSION_FACTORS;
use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A (latitude, longitude) pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Construct validated coordinates.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` when latitude is outside -90..90 or
    /// longitude is outside -180..180.
    pub fn new(lat: f64, lon: f64) -> Result<Self, EcoTraceError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(EcoTraceError::validation_field(
                format!("Latitude must be between -90 and 90, got {}", lat),
                "latitude",
            ));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(EcoTraceError::validation_field(
                format!("Longitude must be between -180 and 180, got {}", lon),
                "longitude",
            ));
        }
        Ok(Self { lat, lon })
    }
}

/// Haversine great-circle distance between two coordinate pairs, in km.
///
/// Symmetric in its endpoints and never negative.
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Haversine distance between two [`Coordinates`], in km
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    haversine(a.lat, a.lon, b.lat, b.lon)
}

/// A transport mode together with its emission factor in kg CO2 per tonne-km
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportDecision {
    pub mode: String,
    pub emission_factor: f64,
}

impl TransportDecision {
    fn new(mode: &str, emission_factor: f64) -> Self {
        Self {
            mode: mode.to_string(),
            emission_factor,
        }
    }
}

/// Derive a default transport mode from distance bands.
///
/// Below 1500 km freight moves by truck, below 6000 km by ship, and anything
/// further by air. Factors here are the band table; the caller-override table
/// in [`crate::tables::OVERRIDE_EMISSION_FACTORS`] uses different constants
/// and the two are kept separate on purpose.
pub fn determine_transport_mode(distance_km: f64) -> TransportDecision {
    if distance_km < 1500.0 {
        TransportDecision::new("Truck", 0.12)
    } else if distance_km < 6000.0 {
        TransportDecision::new("Ship", 0.02)
    } else {
        TransportDecision::new("Air", 0.5)
    }
}

/// Resolve the transport decision for a shipment.
///
/// Starts from the distance band default; a recognized `override_mode`
/// replaces both the mode and the factor unconditionally, using the override
/// factor table. Unrecognized overrides are ignored.
pub fn resolve_transport(distance_km: f64, override_mode: Option<&str>) -> TransportDecision {
    let decision = determine_transport_mode(distance_km);
    if let Some(mode) = override_mode {
        if let Some((name, factor)) = OVERRIDE_EMISSION_FACTORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(mode))
        {
            return TransportDecision::new(name, *factor);
        }
    }
    decision
}
