use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::dto::{
    CheckInRequest, CheckInResponse, ClearResponse, ListQuery, RangeQuery, TrendsQuery,
};
use crate::error::AppResult;
use crate::handlers::resolve_offset;
use crate::models::mood::MoodEntry;
use crate::services::aggregator::{Aggregator, DailyPoint, TrendPoint};
use crate::services::{classifier, recommendations};
use crate::AppState;

pub async fn submit_checkin(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CheckInRequest>,
) -> AppResult<(StatusCode, Json<CheckInResponse>)> {
    body.validate()?;
    let offset = resolve_offset(&state.config, body.tz_offset_minutes)?;
    let new_entry = body.into_new_entry()?;

    let analysis = classifier::classify(&new_entry.mood_label, new_entry.intensity, &new_entry.contexts);
    let suggestions = recommendations::select(&analysis);
    let entry = MoodEntry::new(&auth_user.id, new_entry, analysis, Utc::now(), offset);

    if entry.is_crisis_detected {
        tracing::warn!(
            user_id = %auth_user.id,
            entry_id = %entry.id,
            mood = %entry.mood_label,
            intensity = entry.intensity.get(),
            "Crisis-level mood check-in recorded"
        );
    }

    let entry = state.store.append(entry).await?;
    tracing::info!(
        user_id = %auth_user.id,
        entry_id = %entry.id,
        demo = auth_user.is_demo,
        "Mood check-in saved"
    );

    Ok((StatusCode::CREATED, Json(CheckInResponse { entry, suggestions })))
}

pub async fn list_checkins(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<MoodEntry>>> {
    let mut entries = state.store.all(&auth_user.id).await?;
    if let Some(limit) = query.limit {
        entries.truncate(limit);
    }
    Ok(Json(entries))
}

pub async fn clear_checkins(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<ClearResponse>> {
    let deleted = state.store.clear(&auth_user.id).await?;
    tracing::info!(user_id = %auth_user.id, deleted = deleted, "Mood history cleared");
    Ok(Json(ClearResponse { deleted }))
}

pub async fn get_trends(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<TrendsQuery>,
) -> AppResult<Json<Vec<TrendPoint>>> {
    let days = query.window_days()?;
    let offset = resolve_offset(&state.config, query.tz_offset_minutes)?;
    let entries = state.store.all(&auth_user.id).await?;

    let aggregator = Aggregator::new(&entries, Utc::now(), offset);
    Ok(Json(aggregator.mood_trends(days)))
}

pub async fn get_daily_series(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<DailyPoint>>> {
    let offset = resolve_offset(&state.config, query.tz_offset_minutes)?;
    let entries = state.store.all(&auth_user.id).await?;

    let aggregator = Aggregator::new(&entries, Utc::now(), offset);
    Ok(Json(aggregator.within(query.range).daily_series()))
}
