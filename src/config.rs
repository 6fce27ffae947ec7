use std::env;

use chrono::FixedOffset;

#[derive(Debug, Clone)]
pub struct Config {
    /// Absent means entries live in process memory only.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,

    /// Shared secret of the hosted auth provider. Absent means bearer tokens are rejected.
    pub jwt_secret: Option<String>,
    pub jwt_audience: String,
    pub allow_demo_user: bool,

    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_url: String,

    pub default_tz_offset_minutes: i32,
    pub chat_rate_limit_per_minute: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            host: "0.0.0.0".into(),
            port: 8080,
            frontend_url: "http://localhost:4028".into(),
            cors_extra_origins: Vec::new(),
            jwt_secret: None,
            jwt_audience: "authenticated".into(),
            allow_demo_user: true,
            gemini_api_key: String::new(),
            gemini_model: "gemini-pro".into(),
            gemini_api_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            default_tz_offset_minutes: 0,
            chat_rate_limit_per_minute: 20,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .expect("PORT must be a number"),
            frontend_url: env::var("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            cors_extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),

            jwt_secret: env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()),
            jwt_audience: env::var("JWT_AUDIENCE").unwrap_or(defaults.jwt_audience),
            allow_demo_user: env::var("ALLOW_DEMO_USER")
                .unwrap_or_else(|_| "true".into())
                .parse()
                .unwrap_or(true),

            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_api_url: env::var("GEMINI_API_URL").unwrap_or(defaults.gemini_api_url),

            default_tz_offset_minutes: env::var("DEFAULT_TZ_OFFSET_MINUTES")
                .unwrap_or_else(|_| "0".into())
                .parse()
                .expect("DEFAULT_TZ_OFFSET_MINUTES must be a number"),
            chat_rate_limit_per_minute: env::var("CHAT_RATE_LIMIT_PER_MINUTE")
                .unwrap_or_else(|_| "20".into())
                .parse()
                .unwrap_or(20),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Offset for a request, preferring the client's own over the configured default.
    pub fn tz_offset(&self, requested_minutes: Option<i32>) -> Option<FixedOffset> {
        let minutes = requested_minutes.unwrap_or(self.default_tz_offset_minutes);
        FixedOffset::east_opt(minutes.checked_mul(60)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tz_offset_prefers_request_value() {
        let config = Config {
            default_tz_offset_minutes: 60,
            ..Config::default()
        };
        assert_eq!(config.tz_offset(None).unwrap().local_minus_utc(), 3600);
        assert_eq!(config.tz_offset(Some(-300)).unwrap().local_minus_utc(), -18000);
        assert!(config.tz_offset(Some(24 * 60)).is_none());
    }
}
