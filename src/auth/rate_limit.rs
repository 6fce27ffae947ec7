use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;

use crate::auth::middleware::AuthUser;
use crate::error::AppError;
use crate::AppState;

const CHAT_WINDOW_SECS: u64 = 60;

/// Fixed-window request counter keyed by caller, for a single instance.
#[derive(Clone, Default)]
pub struct RateLimitState {
    entries: Arc<Mutex<HashMap<String, RateLimitEntry>>>,
}

struct RateLimitEntry {
    count: u32,
    window_start: Instant,
}

impl RateLimitState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the requests left in the window, or how long until it reopens.
    pub async fn check_with_limits(
        &self,
        key: &str,
        max_requests: u32,
        window_secs: u64,
    ) -> Result<u32, Duration> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let window = Duration::from_secs(window_secs);

        let entry = entries.entry(key.to_string()).or_insert(RateLimitEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start) > window {
            entry.count = 0;
            entry.window_start = now;
        }

        if entry.count >= max_requests {
            let retry_after = window.saturating_sub(now.duration_since(entry.window_start));
            return Err(retry_after);
        }

        entry.count += 1;
        Ok(max_requests - entry.count)
    }

    /// Drops entries whose window closed long ago.
    pub async fn cleanup(&self) {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let keep_for = Duration::from_secs(CHAT_WINDOW_SECS * 2);

        entries.retain(|_, entry| now.duration_since(entry.window_start) < keep_for);
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

/// Bucket key for a chat caller. Anonymous demo callers share one user id,
/// so they are split by peer address when it is known.
fn chat_limit_key(user: &AuthUser, peer: Option<SocketAddr>) -> String {
    match (user.is_demo, peer) {
        (true, Some(addr)) => format!("chat:{}:{}", user.id, addr.ip()),
        _ => format!("chat:{}", user.id),
    }
}

/// Limits companion chat calls per user; they fan out to the paid generative API.
pub async fn rate_limit_chat(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or(AppError::Unauthorized)?;
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let key = chat_limit_key(&user, peer);
    let user_id = user.id;

    match state
        .rate_limiter
        .check_with_limits(&key, state.config.chat_rate_limit_per_minute, CHAT_WINDOW_SECS)
        .await
    {
        Ok(remaining) => {
            tracing::debug!(user_id = %user_id, remaining = remaining, "Chat rate limit check passed");
            Ok(next.run(req).await)
        }
        Err(retry_after) => {
            tracing::warn!(
                user_id = %user_id,
                retry_after_secs = retry_after.as_secs(),
                "Chat rate limit exceeded"
            );
            Err(AppError::RateLimited)
        }
    }
}

pub fn spawn_cleanup_worker(limiter: RateLimitState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(CHAT_WINDOW_SECS * 5));
        loop {
            interval.tick().await;
            limiter.cleanup().await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allows_under_limit() {
        let limiter = RateLimitState::new();
        for i in 0..3 {
            let result = limiter.check_with_limits("chat:u1", 3, 60).await;
            assert_eq!(result, Ok(2 - i), "request {} should be allowed", i + 1);
        }
    }

    #[tokio::test]
    async fn blocks_over_limit() {
        let limiter = RateLimitState::new();
        for _ in 0..3 {
            let _ = limiter.check_with_limits("chat:u1", 3, 60).await;
        }
        assert!(limiter.check_with_limits("chat:u1", 3, 60).await.is_err());
    }

    #[tokio::test]
    async fn users_have_separate_windows() {
        let limiter = RateLimitState::new();
        for _ in 0..3 {
            let _ = limiter.check_with_limits("chat:u1", 3, 60).await;
        }
        assert!(limiter.check_with_limits("chat:u2", 3, 60).await.is_ok());
    }

    #[test]
    fn demo_callers_are_keyed_by_peer_address() {
        let peer: SocketAddr = "203.0.113.7:51000".parse().unwrap();
        assert_eq!(chat_limit_key(&AuthUser::demo(), Some(peer)), "chat:demo:203.0.113.7");
        assert_eq!(chat_limit_key(&AuthUser::demo(), None), "chat:demo");

        let user = AuthUser {
            id: "user-42".into(),
            is_demo: false,
        };
        assert_eq!(chat_limit_key(&user, Some(peer)), "chat:user-42");
    }

    #[tokio::test]
    async fn cleanup_keeps_fresh_windows() {
        let limiter = RateLimitState::new();
        let _ = limiter.check_with_limits("chat:u1", 3, 60).await;
        limiter.cleanup().await;
        assert_eq!(limiter.len().await, 1);
    }
}
