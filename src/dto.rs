//! Request and response bodies for the HTTP API.
//!
//! - `*Request` is deserialized from a JSON body
//! - `*Query` is deserialized from the query string
//! - `*Response` is serialized back to the client

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::models::mood::{ContextTag, Intensity, IntensityScale, MoodAnalysis, MoodEntry, NewMoodEntry};
use crate::services::aggregator::{TimeRange, TrendDirection};
use crate::services::companion::CompanionReply;
use crate::services::insights::{InsightCard, MoodStats};
use crate::services::recommendations::SuggestionCard;
use crate::services::risk::RiskAssessment;

pub const DEFAULT_TREND_DAYS: i64 = 7;
pub const MAX_WINDOW_DAYS: i64 = 366;

// ============================================================================
// Check-ins
// ============================================================================

/// POST /api/mood-checkins
#[derive(Debug, Deserialize, Validate)]
pub struct CheckInRequest {
    #[validate(length(min = 1, max = 32, message = "Mood emoji must be 1-32 characters"))]
    pub mood_emoji: String,
    #[validate(length(min = 1, max = 40, message = "Mood label must be 1-40 characters"))]
    pub mood_label: String,
    pub intensity: i32,
    #[serde(default)]
    pub scale: IntensityScale,
    #[serde(default)]
    pub contexts: BTreeSet<ContextTag>,
    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
    /// Minutes east of UTC for the client's local calendar day.
    pub tz_offset_minutes: Option<i32>,
}

impl CheckInRequest {
    pub fn into_new_entry(self) -> Result<NewMoodEntry, AppError> {
        let intensity = canonical_intensity(self.intensity, self.scale)?;
        let mood_label = non_blank_label(self.mood_label)?;
        Ok(NewMoodEntry {
            mood_emoji: self.mood_emoji,
            mood_label,
            intensity,
            contexts: self.contexts,
            notes: self.notes,
        })
    }
}

/// POST /api/classify
#[derive(Debug, Deserialize, Validate)]
pub struct ClassifyRequest {
    #[validate(length(min = 1, max = 40, message = "Mood label must be 1-40 characters"))]
    pub mood_label: String,
    pub intensity: i32,
    #[serde(default)]
    pub scale: IntensityScale,
    #[serde(default)]
    pub contexts: BTreeSet<ContextTag>,
}

impl ClassifyRequest {
    pub fn intensity(&self) -> Result<Intensity, AppError> {
        canonical_intensity(self.intensity, self.scale)
    }
}

fn canonical_intensity(raw: i32, scale: IntensityScale) -> Result<Intensity, AppError> {
    scale.to_canonical(raw).ok_or_else(|| {
        AppError::Validation(format!("Intensity must be between 1 and {}", scale.max()))
    })
}

fn non_blank_label(label: String) -> Result<String, AppError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Mood label must not be blank".into()));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrendsQuery {
    pub days: Option<i64>,
    pub tz_offset_minutes: Option<i32>,
}

impl TrendsQuery {
    pub fn window_days(&self) -> Result<i64, AppError> {
        let days = self.days.unwrap_or(DEFAULT_TREND_DAYS);
        if !(1..=MAX_WINDOW_DAYS).contains(&days) {
            return Err(AppError::Validation(format!(
                "days must be between 1 and {}",
                MAX_WINDOW_DAYS
            )));
        }
        Ok(days)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    #[serde(default)]
    pub range: TimeRange,
    pub tz_offset_minutes: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OffsetQuery {
    pub tz_offset_minutes: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct CheckInResponse {
    pub entry: MoodEntry,
    pub suggestions: Vec<SuggestionCard>,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub deleted: u64,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub analysis: MoodAnalysis,
    pub risk: RiskAssessment,
    pub suggestions: Vec<SuggestionCard>,
}

// ============================================================================
// Stats & insights
// ============================================================================

/// GET /api/stats/summary
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub total_check_ins: usize,
    pub average_mood: f64,
    pub day_streak: u32,
    pub badges_earned: usize,
    pub trend: TrendDirection,
    pub needs_check_in: bool,
    pub latest: Option<MoodEntry>,
}

#[derive(Debug, Serialize)]
pub struct DistributionResponse {
    pub range: TimeRange,
    pub total: usize,
    pub distribution: BTreeMap<String, usize>,
}

/// GET /api/insights
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub range: TimeRange,
    pub cards: Vec<InsightCard>,
    pub stats: MoodStats,
    pub narrative: String,
    pub source: &'static str,
    pub generated_at: DateTime<Utc>,
}

// ============================================================================
// Chat
// ============================================================================

/// POST /api/chat/messages
#[derive(Debug, Deserialize, Validate)]
pub struct ChatMessageRequest {
    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatMessageResponse {
    #[serde(flatten)]
    pub reply: CompanionReply,
    pub needs_check_in: bool,
}

/// GET /api/chat/context
#[derive(Debug, Serialize)]
pub struct ChatContextResponse {
    pub recent: Vec<MoodEntry>,
    pub needs_check_in: bool,
    pub mood_context: String,
}
