use axum::Json;
use validator::Validate;

use crate::dto::{ClassifyRequest, ClassifyResponse};
use crate::error::AppResult;
use crate::services::risk::{self, RiskInput};
use crate::services::{classifier, recommendations};

/// Classifies a reading without storing it.
pub async fn classify_checkin(Json(body): Json<ClassifyRequest>) -> AppResult<Json<ClassifyResponse>> {
    body.validate()?;
    let intensity = body.intensity()?;

    let analysis = classifier::classify(&body.mood_label, intensity, &body.contexts);
    let risk = risk::assess(RiskInput::CheckIn {
        label: &body.mood_label,
        intensity,
    });
    let suggestions = recommendations::select(&analysis);

    Ok(Json(ClassifyResponse {
        analysis,
        risk,
        suggestions,
    }))
}
