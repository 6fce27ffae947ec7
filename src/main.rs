use anyhow::Context;

use mindbridge_api::auth::rate_limit::spawn_cleanup_worker;
use mindbridge_api::config::Config;
use mindbridge_api::services::store::MoodStore;
use mindbridge_api::{build_router, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mindbridge_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Config::from_env();

    let store = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url)
                .await
                .context("Failed to create database pool")?;
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");
            MoodStore::postgres(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, mood entries are kept in memory only");
            MoodStore::memory()
        }
    };

    if !config.allow_demo_user && config.jwt_secret.is_none() {
        tracing::warn!("Demo user disabled and JWT_SECRET unset, every request will be rejected");
    }

    let addr = config.listen_addr();
    let state = AppState::new(store, config);

    if state.gemini.is_configured() {
        tracing::info!(model = state.gemini.model(), "Generative API enabled");
    } else {
        tracing::info!("GEMINI_API_KEY not configured, companion and insights use fallback text");
    }

    spawn_cleanup_worker(state.rate_limiter.clone());

    let app = build_router(state);

    tracing::info!(addr = %addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
