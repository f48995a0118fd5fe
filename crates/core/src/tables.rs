//! Static reference tables
//!
//! Read-only data loaded into the binary: material carbon intensity,
//! origin-country hub coordinates, and the transport emission factor tables.
//! Two factor tables exist: the distance-band defaults live in
//! [`crate::geo::determine_transport_mode`], and the caller-override table
//! lives here. Their constants differ per call path and are never merged.

use crate::geo::Coordinates;

/// CO2 intensity used when a material is absent from the table, kg per kg
pub const DEFAULT_MATERIAL_INTENSITY: f64 = 2.0;

/// DEFRA-style material carbon intensity, kg CO2 per kg of product.
///
/// Keys are the canonical material labels produced by the fuzzy matcher.
pub static MATERIAL_CO2_PER_KG: &[(&str, f64)] = &[
    ("Plastic", 3.4),
    ("Glass", 0.9),
    ("Aluminium", 9.2),
    ("Steel", 2.0),
    ("Paper", 1.1),
    ("Cardboard", 0.8),
    ("Other", 2.0),
];

/// Emission factors used only when the caller overrides the transport mode,
/// kg CO2 per tonne-km. Distinct from the distance-band factors.
pub static OVERRIDE_EMISSION_FACTORS: &[(&str, f64)] = &[
    ("Air", 0.5),
    ("Ship", 0.03),
    ("Truck", 0.15),
];

/// Packaging weight uplift applied to the product weight in the estimate
/// pipeline when packaging is included
pub const PACKAGING_UPLIFT: f64 = 1.05;

/// Packaging weight uplift applied in the freight-carbon path
pub const FREIGHT_PACKAGING_UPLIFT: f64 = 1.2;

/// UK distribution hub (London), the fallback shipping origin
pub const UK_HUB: Coordinates = Coordinates {
    lat: 51.5074,
    lon: -0.1278,
};

/// Fixed shipping hubs used as proxies for a product's origin country.
///
/// Keys are the canonical origin labels produced by the fuzzy matcher.
pub static ORIGIN_HUBS: &[(&str, Coordinates)] = &[
    ("China", Coordinates { lat: 22.5431, lon: 114.0579 }),
    ("UK", UK_HUB),
    ("USA", Coordinates { lat: 40.7128, lon: -74.0060 }),
    ("Germany", Coordinates { lat: 50.1109, lon: 8.6821 }),
    ("France", Coordinates { lat: 48.8566, lon: 2.3522 }),
    ("Italy", Coordinates { lat: 45.4642, lon: 9.1900 }),
];

/// Look up the carbon intensity for a canonical material label.
///
/// Unknown materials fall back to [`DEFAULT_MATERIAL_INTENSITY`].
pub fn material_intensity(material: &str) -> f64 {
    MATERIAL_CO2_PER_KG
        .iter()
        .find(|(name, _)| *name == material)
        .map(|(_, intensity)| *intensity)
        .unwrap_or(DEFAULT_MATERIAL_INTENSITY)
}

/// Look up the shipping hub for a canonical origin label.
///
/// Unknown origins fall back to the UK hub.
pub fn origin_hub(origin: &str) -> Coordinates {
    ORIGIN_HUBS
        .iter()
        .find(|(name, _)| *name == origin)
        .map(|(_, coords)| *coords)
        .unwrap_or(UK_HUB)
}
