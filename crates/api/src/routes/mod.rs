//! HTTP route registration

use actix_web::{web, HttpResponse};

pub mod estimate;
pub mod feedback;
pub mod insights;
pub mod predict;

pub use estimate::{EstimateRequest, WeightField};
pub use predict::PredictRequest;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/predict", web::post().to(predict::predict_eco_score))
        .route("/estimate_emissions", web::post().to(estimate::estimate_emissions))
        .route("/insights", web::get().to(insights::insights_dashboard))
        .service(
            web::scope("/api")
                .route("/feature-importance", web::get().to(insights::feature_importance))
                .route("/eco-data", web::get().to(insights::eco_dataset))
                .route("/feedback", web::post().to(feedback::save_feedback)),
        );
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "ecotrace-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
