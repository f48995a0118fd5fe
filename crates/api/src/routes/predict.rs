//! `/predict` - direct ML grade prediction from manual attributes

use crate::error::ApiError;
use crate::routes::estimate::WeightField;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use ecotrace_core::{normalize_feature, weight_or_default};
use ecotrace_model::AdapterInput;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub material: Option<String>,
    pub weight: Option<WeightField>,
    pub transport: Option<String>,
    pub recyclability: Option<String>,
    pub origin: Option<String>,
}

/// Normalize the attributes, encode, and return the full prediction detail.
///
/// Unlike the estimate pipeline, this endpoint surfaces model failures as
/// HTTP errors so callers can see what went wrong.
pub async fn predict_eco_score(
    state: web::Data<AppState>,
    payload: web::Json<PredictRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner();

    let input = AdapterInput {
        material: normalize_feature(request.material.as_deref(), "Other"),
        weight_kg: weight_or_default(request.weight.as_ref().and_then(WeightField::as_kg)),
        transport: normalize_feature(request.transport.as_deref(), "Land"),
        recyclability: normalize_feature(request.recyclability.as_deref(), "Medium"),
        origin: normalize_feature(request.origin.as_deref(), "Other"),
    };

    let prediction = state.adapter.predict_detailed(&input)?;

    Ok(HttpResponse::Ok().json(json!({
        "predicted_label": prediction.grade,
        "confidence": format!("{}%", prediction.confidence_pct),
        "raw_input": {
            "material": input.material,
            "weight": input.weight_kg,
            "transport": input.transport,
            "recyclability": input.recyclability,
            "origin": input.origin,
        },
        "encoded_input": prediction.encoded,
        "feature_impact": prediction.feature_impact,
    })))
}
