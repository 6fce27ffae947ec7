use jsonwebtoken::{decode, DecodingKey, TokenData, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Claims of an access token minted by the hosted auth provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

pub fn verify_token(token: &str, config: &Config) -> AppResult<TokenData<Claims>> {
    let secret = config.jwt_secret.as_ref().ok_or(AppError::Unauthorized)?;

    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.set_audience(&[config.jwt_audience.as_str()]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn config() -> Config {
        Config {
            jwt_secret: Some("test-secret".into()),
            ..Config::default()
        }
    }

    fn token(secret: &str, aud: &str, exp: i64) -> String {
        let claims = serde_json::json!({
            "sub": "0b6f1c2e-user",
            "aud": aud,
            "exp": exp,
            "role": "authenticated",
        });
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn in_an_hour() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[test]
    fn accepts_provider_token() {
        let data = verify_token(&token("test-secret", "authenticated", in_an_hour()), &config()).unwrap();
        assert_eq!(data.claims.sub, "0b6f1c2e-user");
        assert_eq!(data.claims.role.as_deref(), Some("authenticated"));
    }

    #[test]
    fn rejects_wrong_secret_audience_or_expiry() {
        let config = config();
        assert!(verify_token(&token("other", "authenticated", in_an_hour()), &config).is_err());
        assert!(verify_token(&token("test-secret", "anon", in_an_hour()), &config).is_err());
        assert!(verify_token(&token("test-secret", "authenticated", 1_000), &config).is_err());
    }

    #[test]
    fn rejects_everything_without_secret() {
        let config = Config::default();
        assert!(verify_token(&token("test-secret", "authenticated", in_an_hour()), &config).is_err());
    }
}
