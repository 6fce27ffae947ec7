use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;

use crate::auth::middleware::AuthUser;
use crate::dto::{InsightsResponse, RangeQuery};
use crate::error::AppResult;
use crate::handlers::resolve_offset;
use crate::services::aggregator::Aggregator;
use crate::services::insights::{self, NARRATIVE_RECENT_ENTRIES, STATS_WINDOW_DAYS};
use crate::AppState;

pub async fn get_insights(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<InsightsResponse>> {
    let offset = resolve_offset(&state.config, query.tz_offset_minutes)?;
    let entries = state.store.all(&auth_user.id).await?;
    let now = Utc::now();
    let agg = Aggregator::new(&entries, now, offset);

    let cards = insights::insight_cards(&agg, query.range);
    let stats = insights::mood_stats(&agg, STATS_WINDOW_DAYS);
    let (narrative, source) =
        insights::narrative(&state.gemini, &stats, agg.recent(NARRATIVE_RECENT_ENTRIES)).await;

    tracing::debug!(
        user_id = %auth_user.id,
        cards = cards.len(),
        source = source,
        "Insights generated"
    );

    Ok(Json(InsightsResponse {
        range: query.range,
        cards,
        stats,
        narrative,
        source,
        generated_at: now,
    }))
}
