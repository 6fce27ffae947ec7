use axum::{extract::State, Extension, Json};
use chrono::Utc;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::dto::{ChatContextResponse, ChatMessageRequest, ChatMessageResponse};
use crate::error::AppResult;
use crate::handlers::resolve_offset;
use crate::services::aggregator::{Aggregator, CheckInSurface};
use crate::services::companion::{self, MOOD_CONTEXT_ENTRIES};
use crate::AppState;

pub async fn send_message(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<ChatMessageRequest>,
) -> AppResult<Json<ChatMessageResponse>> {
    body.validate()?;
    let offset = resolve_offset(&state.config, None)?;
    let entries = state.store.all(&auth_user.id).await?;
    let agg = Aggregator::new(&entries, Utc::now(), offset);

    let reply = companion::reply(&state.gemini, &body.message, agg.recent(MOOD_CONTEXT_ENTRIES)).await;

    tracing::debug!(user_id = %auth_user.id, source = ?reply.source, "Companion reply sent");

    Ok(Json(ChatMessageResponse {
        needs_check_in: agg.needs_check_in(CheckInSurface::Chat),
        reply,
    }))
}

pub async fn get_context(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<ChatContextResponse>> {
    let offset = resolve_offset(&state.config, None)?;
    let entries = state.store.all(&auth_user.id).await?;
    let agg = Aggregator::new(&entries, Utc::now(), offset);
    let recent = agg.recent(MOOD_CONTEXT_ENTRIES);

    Ok(Json(ChatContextResponse {
        mood_context: companion::build_mood_context(recent),
        needs_check_in: agg.needs_check_in(CheckInSurface::Chat),
        recent: recent.to_vec(),
    }))
}
