use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::jwt::verify_token;
use crate::error::AppError;
use crate::models::mood::DEMO_USER_ID;
use crate::AppState;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub is_demo: bool,
}

impl AuthUser {
    pub fn demo() -> Self {
        Self {
            id: DEMO_USER_ID.to_string(),
            is_demo: true,
        }
    }
}

/// Resolves the owning user of a request. A bearer token must verify; with
/// no `Authorization` header the request runs as the demo user when allowed.
pub async fn resolve_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_user = match req.headers().get(AUTHORIZATION) {
        Some(value) => {
            let token = value
                .to_str()
                .ok()
                .and_then(|v| v.strip_prefix("Bearer "))
                .ok_or(AppError::Unauthorized)?;
            let token_data = verify_token(token, &state.config)?;
            AuthUser {
                id: token_data.claims.sub,
                is_demo: false,
            }
        }
        None if state.config.allow_demo_user => AuthUser::demo(),
        None => return Err(AppError::Unauthorized),
    };

    req.extensions_mut().insert(auth_user);
    Ok(next.run(req).await)
}
