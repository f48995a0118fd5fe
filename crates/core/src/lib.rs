//! # EcoTrace Core
//!
//! Domain logic for the EcoTrace carbon footprint estimator.
//!
//! This crate holds the pure, synchronous scoring pipeline shared by the HTTP
//! service: reference tables, feature normalization, fuzzy label matching,
//! the heuristic eco-grade formula, and great-circle distance / transport
//! resolution. Nothing in here touches the network or the filesystem.
//!
//! ## Modules
//!
//! - `config`: Configuration loading and validation
//! - `error`: Error types and handling
//! - `fuzzy`: Substring-containment canonicalization of free-text labels
//! - `geo`: Haversine distance and transport mode resolution
//! - `normalize`: Attribute string normalization with default-on-unknown
//! - `score`: Heuristic eco-grade scoring
//! - `tables`: Static reference tables (CO2 intensity, hubs, emission factors)
//! - `validation`: Validation utilities and regex patterns

pub mod config;
pub mod error;
pub mod fuzzy;
pub mod geo;
pub mod normalize;
pub mod score;
pub mod tables;
pub mod validation;

pub use config::{ConfigLoader, DataConfig, ModelConfig, ServiceConfig};
pub use error::EcoTraceError;
pub use fuzzy::{fuzzy_match_material, fuzzy_match_origin};
pub use geo::{
    determine_transport_mode, distance_km, haversine, resolve_transport, Coordinates,
    TransportDecision, EARTH_RADIUS_KM,
};
pub use normalize::{normalize_feature, weight_or_default, DEFAULT_WEIGHT_KG};
pub use score::{calculate_eco_score, recycle_score, EcoGrade};
pub use tables::{
    material_intensity, origin_hub, DEFAULT_MATERIAL_INTENSITY, FREIGHT_PACKAGING_UPLIFT,
    OVERRIDE_EMISSION_FACTORS, PACKAGING_UPLIFT, UK_HUB,
};

/// Result type alias for EcoTrace core operations
pub type Result<T> = std::result::Result<T, EcoTraceError>;
