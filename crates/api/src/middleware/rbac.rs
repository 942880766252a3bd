//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role is not
//! in the extractor's allowed set. Ownership checks happen in the handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use devcamper_core::error::CoreError;
use devcamper_core::roles::{ROLE_ADMIN, ROLE_PUBLISHER, ROLE_USER};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// Whether this user may modify a record owned by `owner_id`.
    pub fn owns_or_admin(&self, owner_id: devcamper_core::types::DbId) -> bool {
        self.user_id == owner_id || self.is_admin()
    }
}

async fn require_role(
    parts: &mut Parts,
    state: &AppState,
    allowed: &[&str],
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if !allowed.contains(&user.role.as_str()) {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "User role {} is not authorized to access this route",
            user.role
        ))));
    }
    Ok(user)
}

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, &[ROLE_ADMIN]).await.map(RequireAdmin)
    }
}

/// Requires `publisher` or `admin` role: creating bootcamps and courses.
pub struct RequirePublisher(pub AuthUser);

impl FromRequestParts<AppState> for RequirePublisher {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, &[ROLE_PUBLISHER, ROLE_ADMIN])
            .await
            .map(RequirePublisher)
    }
}

/// Requires `user` or `admin` role: writing reviews.
pub struct RequireReviewer(pub AuthUser);

impl FromRequestParts<AppState> for RequireReviewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, &[ROLE_USER, ROLE_ADMIN])
            .await
            .map(RequireReviewer)
    }
}
