use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;

use crate::auth::middleware::AuthUser;
use crate::dto::{DistributionResponse, OffsetQuery, RangeQuery, SummaryResponse};
use crate::error::AppResult;
use crate::handlers::resolve_offset;
use crate::services::aggregator::{Aggregator, Badge, CheckInSurface, MoodPattern, WeeklyBucket};
use crate::AppState;

/// Whole-history summary for the dashboard header.
pub async fn get_summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<OffsetQuery>,
) -> AppResult<Json<SummaryResponse>> {
    let offset = resolve_offset(&state.config, query.tz_offset_minutes)?;
    let entries = state.store.all(&auth_user.id).await?;
    let agg = Aggregator::new(&entries, Utc::now(), offset);

    Ok(Json(SummaryResponse {
        total_check_ins: agg.total_check_ins(),
        average_mood: agg.average_mood(),
        day_streak: agg.day_streak(),
        badges_earned: agg.badges_earned(),
        trend: agg.trend_direction(),
        needs_check_in: agg.needs_check_in(CheckInSurface::Portal),
        latest: agg.latest().cloned(),
    }))
}

pub async fn get_distribution(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<DistributionResponse>> {
    let offset = resolve_offset(&state.config, query.tz_offset_minutes)?;
    let entries = state.store.all(&auth_user.id).await?;
    let window = Aggregator::new(&entries, Utc::now(), offset).within(query.range);

    Ok(Json(DistributionResponse {
        range: query.range,
        total: window.total_check_ins(),
        distribution: window.mood_distribution(),
    }))
}

pub async fn get_weekly(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<WeeklyBucket>>> {
    let offset = resolve_offset(&state.config, query.tz_offset_minutes)?;
    let entries = state.store.all(&auth_user.id).await?;
    let window = Aggregator::new(&entries, Utc::now(), offset).within(query.range);

    Ok(Json(window.weekly_buckets()))
}

pub async fn get_badges(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<OffsetQuery>,
) -> AppResult<Json<Vec<Badge>>> {
    let offset = resolve_offset(&state.config, query.tz_offset_minutes)?;
    let entries = state.store.all(&auth_user.id).await?;

    Ok(Json(Aggregator::new(&entries, Utc::now(), offset).badges()))
}

/// Concerning patterns over the last week. Reported to the user only; nothing is dispatched.
pub async fn get_patterns(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<OffsetQuery>,
) -> AppResult<Json<Vec<MoodPattern>>> {
    let offset = resolve_offset(&state.config, query.tz_offset_minutes)?;
    let entries = state.store.all(&auth_user.id).await?;
    let patterns = Aggregator::new(&entries, Utc::now(), offset).mood_patterns();

    if !patterns.is_empty() {
        tracing::info!(
            user_id = %auth_user.id,
            kinds = ?patterns.iter().map(|p| p.kind).collect::<Vec<_>>(),
            "Mood patterns detected"
        );
    }

    Ok(Json(patterns))
}
