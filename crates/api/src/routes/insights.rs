//! Insights endpoints: feature importance, logged data, and the dashboard

use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use ecotrace_core::EcoGrade;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub struct EcoDataQuery {
    pub limit: Option<usize>,
}

/// Rows the dashboard reads at most, so a long-lived log cannot balloon the
/// response
const INSIGHTS_ROW_CAP: usize = 1000;

/// Global feature importances of the trained classifier, as percentages.
pub async fn feature_importance(state: web::Data<AppState>) -> HttpResponse {
    let pairs = state.adapter.feature_importances();
    let importances: Vec<serde_json::Value> = pairs
        .iter()
        .map(|(name, importance)| {
            json!({
                "feature": name,
                "importance_pct": (importance * 10000.0).round() / 100.0,
            })
        })
        .collect();

    HttpResponse::Ok().json(json!({
        "feature_importance": importances,
        "classes": state.adapter.grade_classes(),
    }))
}

/// Logged estimates as JSON rows for frontend consumers.
pub async fn eco_dataset(
    state: web::Data<AppState>,
    query: web::Query<EcoDataQuery>,
) -> Result<HttpResponse, ApiError> {
    let rows = state.dataset.read_rows(query.limit)?;
    Ok(HttpResponse::Ok().json(json!({
        "count": rows.len(),
        "rows": rows,
    })))
}

/// Dashboard view over the logged estimates: the capped rows themselves plus
/// grade/material/origin aggregates.
pub async fn insights_dashboard(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let rows = state.dataset.read_rows(Some(INSIGHTS_ROW_CAP))?;

    let mut grade_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut material_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut origin_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_carbon = 0.0;
    let mut total_weight = 0.0;

    for row in &rows {
        *grade_counts.entry(row.eco_score.clone()).or_insert(0) += 1;
        *material_counts.entry(row.material.clone()).or_insert(0) += 1;
        *origin_counts.entry(row.origin.clone()).or_insert(0) += 1;
        total_carbon += row.carbon_kg;
        total_weight += row.weight_kg;
    }

    let count = rows.len();
    let avg_carbon = if count > 0 {
        (total_carbon / count as f64 * 100.0).round() / 100.0
    } else {
        0.0
    };
    let avg_weight = if count > 0 {
        (total_weight / count as f64 * 100.0).round() / 100.0
    } else {
        0.0
    };

    // Grade distribution in canonical order, zero-filled
    let grades: Vec<serde_json::Value> = EcoGrade::all()
        .iter()
        .map(|grade| {
            json!({
                "grade": grade,
                "emoji": grade.emoji(),
                "count": grade_counts.get(grade.as_str()).copied().unwrap_or(0),
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "total_products": count,
        "avg_carbon_kg": avg_carbon,
        "avg_weight_kg": avg_weight,
        "grades": grades,
        "materials": material_counts,
        "origins": origin_counts,
        "rows": rows,
    })))
}
