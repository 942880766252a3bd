//! Admin-only handlers for the `/users` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use devcamper_core::error::CoreError;
use devcamper_core::query::Collection;
use devcamper_core::roles::{ALL_ROLES, ROLE_USER};
use devcamper_core::validation::{ensure_valid, validate_user, UserDraft, WriteMode};
use devcamper_db::advanced::{advanced_results, ListResponse};
use devcamper_db::aggregate::{parents_touched_by_user, refresh_parent_stat, AVERAGE_COST, AVERAGE_RATING};
use devcamper_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use devcamper_db::store::{SessionStore, UserStore};
use serde::Deserialize;

use super::{not_found, trimmed, write_then_refresh};
use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::extract::{parse_id, JsonBody};
use crate::middleware::rbac::RequireAdmin;
use crate::query::ListParams;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Request body for admin user creation and updates.
#[derive(Debug, Default, Deserialize)]
pub struct UserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

impl UserInput {
    fn validate(&self, mode: WriteMode) -> Result<(), CoreError> {
        let draft = UserDraft {
            name: self.name.as_deref(),
            email: self.email.as_deref(),
            password: self.password.as_deref(),
            role: self.role.as_deref(),
        };
        ensure_valid(validate_user(&draft, mode, ALL_ROLES))
    }
}

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    params: ListParams,
) -> AppResult<Json<ListResponse>> {
    let query = params.into_query(Collection::Users, &state)?;
    let response = advanced_results(&*state.store, Collection::Users, &query, None).await?;
    Ok(Json(response))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(raw_id): Path<String>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = load(&state, &raw_id).await?;
    Ok(Json(DataResponse::new(UserResponse::from(&user))))
}

/// POST /api/v1/users
///
/// Admins may assign any role, including `admin`.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    JsonBody(input): JsonBody<UserInput>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    input.validate(WriteMode::Create)?;

    let password = input.password.as_deref().unwrap_or_default();
    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        name: trimmed(&input.name).unwrap_or_default(),
        email: trimmed(&input.email).unwrap_or_default(),
        role: input.role.unwrap_or_else(|| ROLE_USER.to_string()),
        password_hash,
    };
    let user = state.store.create_user(&create).await?;

    tracing::info!(user_id = user.id, created_by = admin.user_id, "User created by admin");
    Ok((StatusCode::CREATED, Json(DataResponse::new(UserResponse::from(&user)))))
}

/// PUT /api/v1/users/{id}
///
/// A supplied password is re-hashed and ends every session of the user.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(raw_id): Path<String>,
    JsonBody(input): JsonBody<UserInput>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let existing = load(&state, &raw_id).await?;
    input.validate(WriteMode::Update)?;

    let update = UpdateUser {
        name: trimmed(&input.name),
        email: trimmed(&input.email),
        role: input.role.clone(),
    };
    let user = state
        .store
        .update_user(existing.id, &update)
        .await?
        .ok_or_else(|| not_found("User", existing.id))?;

    if let Some(password) = input.password.as_deref() {
        let password_hash = hash_password(password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
        state.store.set_password(user.id, &password_hash).await?;
        state.store.revoke_all_sessions(user.id).await?;
    }

    Ok(Json(DataResponse::new(UserResponse::from(&user))))
}

/// DELETE /api/v1/users/{id}
///
/// Deleting a user removes their bootcamps, courses and reviews. Bootcamps
/// that survive but lost children have their statistics refreshed.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(raw_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let existing = load(&state, &raw_id).await?;

    let mut touched = Vec::new();
    for spec in [&AVERAGE_COST, &AVERAGE_RATING] {
        for parent_id in parents_touched_by_user(&*state.store, existing.id, spec).await? {
            touched.push((parent_id, spec));
        }
    }

    let store = state.store.clone();
    let user_id = existing.id;
    write_then_refresh(async move {
        if !store.delete_user(user_id).await? {
            return Err(not_found("User", user_id));
        }
        for (parent_id, spec) in touched {
            refresh_parent_stat(&*store, parent_id, spec).await;
        }
        Ok::<_, AppError>(())
    })
    .await?;

    tracing::info!(user_id = existing.id, deleted_by = admin.user_id, "User deleted");
    Ok(Json(MessageResponse::empty()))
}

async fn load(state: &AppState, raw_id: &str) -> AppResult<User> {
    let id = parse_id(raw_id)?;
    state
        .store
        .find_user(id)
        .await?
        .ok_or_else(|| not_found("User", id))
}
