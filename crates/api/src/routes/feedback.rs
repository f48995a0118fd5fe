//! `/api/feedback` - user corrections for later retraining

use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackRequest {
    pub title: Option<String>,
    pub predicted_score: Option<String>,
    pub corrected_score: Option<String>,
    pub comment: Option<String>,
}

/// Append one feedback entry to the feedback log.
pub async fn save_feedback(
    state: web::Data<AppState>,
    payload: web::Json<FeedbackRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner();
    if request.corrected_score.is_none() && request.comment.is_none() {
        return Err(ApiError::MissingInput(
            "corrected_score or comment required".to_string(),
        ));
    }

    state.feedback.append(json!({
        "title": request.title,
        "predicted_score": request.predicted_score,
        "corrected_score": request.corrected_score,
        "comment": request.comment,
    }))?;

    tracing::info!(
        title = request.title.as_deref().unwrap_or("N/A"),
        "feedback recorded"
    );
    Ok(HttpResponse::Ok().json(json!({"status": "saved"})))
}
