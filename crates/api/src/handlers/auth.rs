//! Handlers for the `/auth` resource: registration, login, sessions,
//! self-service profile updates and password reset.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use chrono::{TimeZone, Utc};
use devcamper_core::error::CoreError;
use devcamper_core::roles::{ROLE_USER, SELF_ASSIGNABLE_ROLES};
use devcamper_core::validation::{
    ensure_valid, validate_password, validate_user, UserDraft, WriteMode,
};
use devcamper_db::models::session::CreateSession;
use devcamper_db::models::user::{CreateUser, ResetToken, UpdateUser, User, UserResponse};
use devcamper_db::store::{SessionStore, UserStore};
use serde::Deserialize;

use super::trimmed;
use crate::auth::cookie::{cleared_token_cookie, token_cookie};
use crate::auth::jwt::{generate_access_token, generate_reset_token, hash_token};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse, TokenResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for `PUT /auth/updatedetails`. Only name and email may change.
#[derive(Debug, Deserialize)]
pub struct UpdateDetailsRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Request body for `PUT /auth/updatepassword`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Request body for `POST /auth/forgotpassword`.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Request body for `PUT /auth/resetpassword/{token}`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Self-registration may pick `user` or `publisher`, never `admin`.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(input): JsonBody<RegisterRequest>,
) -> AppResult<Response> {
    let draft = UserDraft {
        name: input.name.as_deref(),
        email: input.email.as_deref(),
        password: input.password.as_deref(),
        role: input.role.as_deref(),
    };
    ensure_valid(validate_user(&draft, WriteMode::Create, SELF_ASSIGNABLE_ROLES))?;

    let password_hash = hash_password(input.password.as_deref().unwrap_or_default())
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = state
        .store
        .create_user(&CreateUser {
            name: trimmed(&input.name).unwrap_or_default(),
            email: trimmed(&input.email).unwrap_or_default(),
            role: input.role.unwrap_or_else(|| ROLE_USER.to_string()),
            password_hash,
        })
        .await?;

    tracing::info!(user_id = user.id, role = %user.role, "User registered");
    token_response(&state, jar, &user, StatusCode::CREATED).await
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(input): JsonBody<LoginRequest>,
) -> AppResult<Response> {
    let (Some(email), Some(password)) = (input.email.as_deref(), input.password.as_deref()) else {
        return Err(AppError::BadRequest(
            "Please provide an email and password".into(),
        ));
    };

    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid credentials".into()));

    let user = state
        .store
        .find_user_by_email(email.trim())
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::debug!(user_id = user.id, "Login rejected: wrong password");
        return Err(invalid());
    }

    token_response(&state, jar, &user, StatusCode::OK).await
}

/// GET /api/v1/auth/logout
///
/// Revokes the session of the presented token and clears the cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    auth_user: AuthUser,
) -> AppResult<(CookieJar, Json<MessageResponse>)> {
    state.store.revoke_session(&auth_user.token_hash).await?;
    tracing::info!(user_id = auth_user.user_id, "User logged out");
    Ok(cleared_cookie_response(&state, jar))
}

/// GET /api/v1/auth/logoutall
///
/// Revokes every session of the user, on every device.
pub async fn logout_all(
    State(state): State<AppState>,
    jar: CookieJar,
    auth_user: AuthUser,
) -> AppResult<(CookieJar, Json<MessageResponse>)> {
    let revoked = state.store.revoke_all_sessions(auth_user.user_id).await?;
    tracing::info!(user_id = auth_user.user_id, revoked, "All sessions revoked");
    Ok(cleared_cookie_response(&state, jar))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = current_user(&state, &auth_user).await?;
    Ok(Json(DataResponse::new(UserResponse::from(&user))))
}

/// PUT /api/v1/auth/updatedetails
pub async fn update_details(
    State(state): State<AppState>,
    auth_user: AuthUser,
    JsonBody(input): JsonBody<UpdateDetailsRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let draft = UserDraft {
        name: input.name.as_deref(),
        email: input.email.as_deref(),
        ..Default::default()
    };
    ensure_valid(validate_user(&draft, WriteMode::Update, SELF_ASSIGNABLE_ROLES))?;

    let update = UpdateUser {
        name: trimmed(&input.name),
        email: trimmed(&input.email),
        role: None,
    };
    let user = state
        .store
        .update_user(auth_user.user_id, &update)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    Ok(Json(DataResponse::new(UserResponse::from(&user))))
}

/// PUT /api/v1/auth/updatepassword
///
/// Requires the current password. Every existing session is revoked and a
/// fresh token issued.
pub async fn update_password(
    State(state): State<AppState>,
    jar: CookieJar,
    auth_user: AuthUser,
    JsonBody(input): JsonBody<UpdatePasswordRequest>,
) -> AppResult<Response> {
    let user = current_user(&state, &auth_user).await?;

    let current_valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Password is incorrect".into(),
        )));
    }

    replace_password(&state, &user, &input.new_password).await?;
    token_response(&state, jar, &user, StatusCode::OK).await
}

/// POST /api/v1/auth/forgotpassword
///
/// Stores a hashed reset token and mails the plaintext link. Without SMTP
/// configured, the link is logged instead.
pub async fn forgot_password(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let user = state
        .store
        .find_user_by_email(input.email.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("There is no user with that email".into()))?;

    let (plaintext, token_hash) = generate_reset_token();
    let reset = ResetToken {
        token_hash,
        expires_at: Utc::now() + chrono::Duration::minutes(state.config.reset_token_expiry_mins),
    };
    state.store.set_reset_token(user.id, Some(&reset)).await?;

    let reset_url = format!(
        "{}/api/v1/auth/resetpassword/{plaintext}",
        state.config.public_url
    );

    match &state.mailer {
        Some(mailer) => {
            if let Err(e) = mailer.send_reset_link(&user.email, &reset_url).await {
                tracing::error!(user_id = user.id, error = %e, "Failed to send reset email");
                state.store.set_reset_token(user.id, None).await?;
                return Err(AppError::InternalError(format!("Email could not be sent: {e}")));
            }
        }
        None => {
            tracing::info!(user_id = user.id, %reset_url, "SMTP not configured; password reset link");
        }
    }

    Ok(Json(MessageResponse::message("Email sent")))
}

/// PUT /api/v1/auth/resetpassword/{token}
///
/// Consumes an unexpired reset token, sets the new password, revokes every
/// session and issues a fresh token.
pub async fn reset_password(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(token): Path<String>,
    JsonBody(input): JsonBody<ResetPasswordRequest>,
) -> AppResult<Response> {
    let user = state
        .store
        .find_user_by_reset_token(&hash_token(&token))
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid token".into()))?;

    replace_password(&state, &user, &input.password).await?;
    tracing::info!(user_id = user.id, "Password reset");
    token_response(&state, jar, &user, StatusCode::OK).await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn current_user(state: &AppState, auth_user: &AuthUser) -> AppResult<User> {
    state
        .store
        .find_user(auth_user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))
}

/// Validate and store a new password, then end every session of the user.
async fn replace_password(state: &AppState, user: &User, password: &str) -> AppResult<()> {
    if let Some(violation) = validate_password(password) {
        return Err(CoreError::InvalidFields(vec![violation]).into());
    }
    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    state.store.set_password(user.id, &password_hash).await?;
    let revoked = state.store.revoke_all_sessions(user.id).await?;
    tracing::debug!(user_id = user.id, revoked, "Sessions revoked after password change");
    Ok(())
}

/// Issue an access token, record its session, and build the response with
/// the token in both the body and an `HttpOnly` cookie.
async fn token_response(
    state: &AppState,
    jar: CookieJar,
    user: &User,
    status: StatusCode,
) -> AppResult<Response> {
    let (token, claims) = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let expires_at = Utc
        .timestamp_opt(claims.exp, 0)
        .single()
        .ok_or_else(|| AppError::InternalError("Token expiry out of range".into()))?;

    state
        .store
        .create_session(&CreateSession {
            user_id: user.id,
            token_hash: hash_token(&claims.jti),
            expires_at,
        })
        .await?;

    let cookie = token_cookie(
        &token,
        state.config.jwt.expiry_mins * 60,
        state.config.cookie_secure,
    );
    Ok((
        status,
        jar.add(cookie),
        Json(TokenResponse {
            success: true,
            token,
        }),
    )
        .into_response())
}

fn cleared_cookie_response(state: &AppState, jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    (
        jar.add(cleared_token_cookie(state.config.cookie_secure)),
        Json(MessageResponse::empty()),
    )
}
