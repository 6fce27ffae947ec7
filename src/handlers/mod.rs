use chrono::FixedOffset;

use crate::config::Config;
use crate::error::{AppError, AppResult};

pub mod chat;
pub mod classify;
pub mod health;
pub mod insights;
pub mod mood_checkins;
pub mod stats;

pub(crate) fn resolve_offset(config: &Config, requested_minutes: Option<i32>) -> AppResult<FixedOffset> {
    config
        .tz_offset(requested_minutes)
        .ok_or_else(|| AppError::Validation("tz_offset_minutes must be within +/-1439".into()))
}
