//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use devcamper_core::error::CoreError;
use devcamper_core::types::DbId;

use crate::auth::cookie::token_from_jar;
use crate::auth::jwt::{hash_token, validate_token};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT.
///
/// The token is read from the `Authorization: Bearer` header, falling back
/// to the `token` cookie. A token is only accepted while its session is
/// active, so logout takes effect immediately. The role is the user's
/// current role, not the one recorded in the token.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's role name (`"user"`, `"publisher"` or `"admin"`).
    pub role: String,
    /// SHA-256 of the token's `jti`, identifying the session.
    pub token_hash: String,
}

fn unauthorized() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Not authorized to access this route".into(),
    ))
}

/// Pull the raw token from the request, header first.
fn token_from_parts(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    token_from_jar(&CookieJar::from_headers(&parts.headers))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts).ok_or_else(unauthorized)?;

        let claims = validate_token(&token, &state.config.jwt).map_err(|_| unauthorized())?;

        let token_hash = hash_token(&claims.jti);
        let session = state
            .store
            .find_active_session(&token_hash)
            .await?
            .ok_or_else(unauthorized)?;
        if session.user_id != claims.sub {
            return Err(unauthorized());
        }

        let user = state
            .store
            .find_user(claims.sub)
            .await?
            .ok_or_else(unauthorized)?;

        Ok(AuthUser {
            user_id: user.id,
            role: user.role,
            token_hash,
        })
    }
}
