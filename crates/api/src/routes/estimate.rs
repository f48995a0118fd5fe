//! `/estimate_emissions` - the full estimation pipeline
//!
//! Scraped or manual attributes -> normalization + fuzzy matching ->
//! hub/distance resolution -> transport decision -> carbon figures ->
//! heuristic grade and ML grade side by side. The two grades are independent
//! scoring paths and are not reconciled. This endpoint always produces both
//! grades; only missing input and bad postcodes fail the request.

use crate::dataset::DatasetRow;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use ecotrace_core::validation::validate_url;
use ecotrace_core::{
    calculate_eco_score, distance_km, fuzzy_match_material, fuzzy_match_origin, material_intensity,
    normalize_feature, origin_hub, resolve_transport, weight_or_default, FREIGHT_PACKAGING_UPLIFT,
    PACKAGING_UPLIFT, UK_HUB,
};
use ecotrace_model::AdapterInput;
use serde::Deserialize;
use serde_json::json;

/// Weight as sent by clients: either a number or a numeric string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WeightField {
    Number(f64),
    Text(String),
}

impl WeightField {
    pub fn as_kg(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(raw) => raw.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EstimateRequest {
    /// Product page URL; when present the scraper supplies the attributes
    pub product_url: Option<String>,
    /// Requester postcode; when absent distances are measured from the UK hub
    pub postcode: Option<String>,
    pub include_packaging: Option<bool>,
    pub override_transport_mode: Option<String>,
    // Manual attributes, used when no URL is given
    pub title: Option<String>,
    pub material: Option<String>,
    pub weight: Option<WeightField>,
    pub transport: Option<String>,
    pub recyclability: Option<String>,
    pub origin: Option<String>,
}

pub async fn estimate_emissions(
    state: web::Data<AppState>,
    payload: web::Json<EstimateRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner();
    let include_packaging = request.include_packaging.unwrap_or(true);
    let scraped = request.product_url.is_some();

    // Gather raw attributes from the scraper or the manual fields
    let (title, raw_material, raw_transport, raw_recyclability, raw_origin, raw_weight, dimensions) =
        if let Some(url) = request.product_url.as_deref() {
            validate_url(url)?;
            let product = state.scraper.scrape(url).await?;
            (
                product.title.clone().unwrap_or_else(|| "Scraped Product".to_string()),
                product.material_type.clone(),
                request.transport.clone().or_else(|| product.transport_mode.clone()),
                product.recyclability.clone(),
                product.best_origin().map(str::to_string),
                product.best_weight_kg(),
                product.dimensions_cm.clone(),
            )
        } else {
            if request.material.is_none() && request.weight.is_none() {
                return Err(ApiError::MissingInput(
                    "product_url or manual attributes (material, weight) required".to_string(),
                ));
            }
            (
                request.title.clone().unwrap_or_else(|| "Manual Product".to_string()),
                request.material.clone(),
                request.transport.clone(),
                request.recyclability.clone(),
                request.origin.clone(),
                request.weight.as_ref().and_then(WeightField::as_kg),
                None,
            )
        };

    // Normalize, then canonicalize free text
    let material = fuzzy_match_material(&normalize_feature(raw_material.as_deref(), "Other"));
    let transport = normalize_feature(raw_transport.as_deref(), "Land");
    let recyclability = normalize_feature(raw_recyclability.as_deref(), "Medium");
    let origin = fuzzy_match_origin(&normalize_feature(raw_origin.as_deref(), "Other"));

    let raw_weight_kg = weight_or_default(raw_weight);
    let weight_kg = if include_packaging {
        raw_weight_kg * PACKAGING_UPLIFT
    } else {
        raw_weight_kg
    };

    // Distances from the origin hub and the UK hub to the requester
    let user_location = match request.postcode.as_deref() {
        Some(postcode) => state.geocoder.locate(postcode)?,
        None => UK_HUB,
    };
    let hub = origin_hub(&origin);
    let intl_distance_km = distance_km(hub, user_location);
    let uk_distance_km = distance_km(UK_HUB, user_location);

    let decision = resolve_transport(intl_distance_km, request.override_transport_mode.as_deref());

    // Two carbon figures for two scoring paths: material intensity feeds the
    // ML-side carbon readout, the freight figure feeds the heuristic grade
    let carbon_kg = round2(weight_kg * material_intensity(&material));
    let freight_weight_kg = if include_packaging {
        raw_weight_kg * FREIGHT_PACKAGING_UPLIFT
    } else {
        raw_weight_kg
    };
    let freight_carbon_kg =
        round2(freight_weight_kg * decision.emission_factor * (intl_distance_km / 1000.0));

    let heuristic_grade = calculate_eco_score(
        freight_carbon_kg,
        Some(&recyclability),
        intl_distance_km,
        freight_weight_kg,
    );

    let ml_input = AdapterInput {
        material: material.clone(),
        weight_kg,
        transport: transport.clone(),
        recyclability: recyclability.clone(),
        origin: origin.clone(),
    };
    let ml = state.adapter.predict(&ml_input);

    // Log the estimate; a failed append never fails the request
    let row = DatasetRow {
        title: title.clone(),
        material: material.clone(),
        weight_kg: round2(weight_kg),
        transport: transport.clone(),
        recyclability: recyclability.clone(),
        eco_score: ml.grade.to_string(),
        carbon_kg,
        origin: origin.clone(),
    };
    if let Err(err) = state.dataset.append(&row) {
        tracing::warn!(error = %err, "dataset logging skipped");
    }

    // Scraped rows with every value in-vocabulary also go to the clean
    // training log; manual or partially-unknown rows are excluded
    if scraped {
        if state.adapter.covers(&ml_input, ml.grade) {
            if let Err(err) = state.training.append(&row) {
                tracing::warn!(error = %err, "training logging skipped");
            }
        } else {
            tracing::debug!(
                material = %material,
                origin = %origin,
                "scraped row not fully in-vocabulary, training log skipped"
            );
        }
    }

    tracing::info!(
        title = %title,
        material = %material,
        origin = %origin,
        eco_score = %heuristic_grade,
        eco_score_ml = %ml.grade,
        "estimate complete"
    );

    Ok(HttpResponse::Ok().json(json!({
        "title": title,
        "data": {
            "attributes": {
                "eco_score": heuristic_grade,
                "eco_score_ml": format!("{} {} ({}%)", ml.grade, ml.grade.emoji(), ml.confidence_pct),
                "eco_score_confidence": format!("{}%", ml.confidence_pct),
                "material_type": material,
                "weight_kg": round2(weight_kg),
                "raw_product_weight_kg": round2(raw_weight_kg),
                "transport_mode": decision.mode,
                "emission_factor": decision.emission_factor,
                "recyclability": recyclability,
                "origin": origin,
                "dimensions_cm": dimensions,
                "carbon_kg": carbon_kg,
                "freight_carbon_kg": freight_carbon_kg,
                "intl_distance_km": round1(intl_distance_km),
                "uk_distance_km": round1(uk_distance_km),
                "trees_to_offset": trees_to_offset(carbon_kg),
            }
        }
    })))
}

/// Trees needed to offset the carbon figure, assuming one tree absorbs
/// roughly 15 kg of CO2 per year. Always at least one.
fn trees_to_offset(carbon_kg: f64) -> i64 {
    ((carbon_kg / 15.0).round() as i64).max(1)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_field_parsing() {
        assert_eq!(WeightField::Number(1.5).as_kg(), Some(1.5));
        assert_eq!(WeightField::Text("0.75".to_string()).as_kg(), Some(0.75));
        assert_eq!(WeightField::Text(" 2 ".to_string()).as_kg(), Some(2.0));
        assert_eq!(WeightField::Text("heavy".to_string()).as_kg(), None);
    }

    #[test]
    fn test_trees_to_offset_minimum_one() {
        assert_eq!(trees_to_offset(0.1), 1);
        assert_eq!(trees_to_offset(14.0), 1);
        assert_eq!(trees_to_offset(45.0), 3);
    }

    #[test]
    fn test_rounding_helpers() {
        assert_eq!(round2(1.006), 1.01);
        // 1.005 has no exact f64 representation; it sits just below the
        // half-way point and rounds down
        assert_eq!(round2(1.005), 1.0);
        assert_eq!(round2(2.0), 2.0);
        assert_eq!(round1(344.67), 344.7);
    }
}
