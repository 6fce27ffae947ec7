use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use auth::rate_limit::RateLimitState;
use config::Config;
use services::gemini::GeminiClient;
use services::store::MoodStore;

#[derive(Clone)]
pub struct AppState {
    pub store: MoodStore,
    pub config: Arc<Config>,
    pub rate_limiter: RateLimitState,
    pub gemini: GeminiClient,
}

impl AppState {
    pub fn new(store: MoodStore, config: Config) -> Self {
        let gemini = GeminiClient::from_config(&config);
        Self {
            store,
            config: Arc::new(config),
            rate_limiter: RateLimitState::new(),
            gemini,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz));

    // Layers run outside-in, so the rate limiter sees the resolved user.
    let chat_routes = Router::new()
        .route("/api/chat/messages", post(handlers::chat::send_message))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::rate_limit::rate_limit_chat,
        ));

    let user_routes = Router::new()
        // Check-ins
        .route(
            "/api/mood-checkins",
            post(handlers::mood_checkins::submit_checkin)
                .get(handlers::mood_checkins::list_checkins)
                .delete(handlers::mood_checkins::clear_checkins),
        )
        .route(
            "/api/mood-checkins/trends",
            get(handlers::mood_checkins::get_trends),
        )
        .route(
            "/api/mood-checkins/daily",
            get(handlers::mood_checkins::get_daily_series),
        )
        // Stats
        .route("/api/stats/summary", get(handlers::stats::get_summary))
        .route(
            "/api/stats/distribution",
            get(handlers::stats::get_distribution),
        )
        .route("/api/stats/weekly", get(handlers::stats::get_weekly))
        .route("/api/stats/badges", get(handlers::stats::get_badges))
        .route("/api/stats/patterns", get(handlers::stats::get_patterns))
        // Insights
        .route("/api/insights", get(handlers::insights::get_insights))
        // Classification and chat
        .route("/api/classify", post(handlers::classify::classify_checkin))
        .route("/api/chat/context", get(handlers::chat::get_context))
        .merge(chat_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::resolve_user,
        ));

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = std::iter::once(&config.frontend_url)
        .chain(config.cors_extra_origins.iter())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .allow_credentials(true)
}
