use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use devcamper_core::error::{join_violations, CoreError};
use devcamper_db::error::{UQ_BOOTCAMP_NAME, UQ_REVIEW_PER_USER, UQ_USER_EMAIL};
use devcamper_db::StoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for persistence
/// failures, and adds HTTP-specific variants. Implements [`IntoResponse`] to
/// produce consistent `{success: false, error, code}` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `devcamper_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A storage error from any store adapter.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A lookup by something other than an id that found nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} not found with id of {id}"),
                ),
                CoreError::MalformedId(raw) => {
                    tracing::debug!(id = %raw, "Malformed identifier");
                    (
                        StatusCode::NOT_FOUND,
                        "NOT_FOUND",
                        "Resource not found".to_string(),
                    )
                }
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::InvalidFields(violations) => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    join_violations(violations),
                ),
                CoreError::InvalidQuery(msg) => {
                    (StatusCode::BAD_REQUEST, "INVALID_QUERY", msg.clone())
                }
                CoreError::Duplicate(msg) => (StatusCode::BAD_REQUEST, "DUPLICATE", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::LimitReached(msg) => {
                    (StatusCode::BAD_REQUEST, "LIMIT_REACHED", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Store errors ---
            AppError::Store(err) => classify_store_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "success": false,
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// Unique violations map to 400 with a message naming the duplicated value;
/// everything else is a 500 whose detail stays in the logs.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::Duplicate(constraint) => {
            let message = match constraint.as_str() {
                UQ_BOOTCAMP_NAME => "A bootcamp with that name already exists".to_string(),
                UQ_USER_EMAIL => "A user with that email already exists".to_string(),
                UQ_REVIEW_PER_USER => "You have already reviewed this bootcamp".to_string(),
                _ => "Duplicate field value entered".to_string(),
            };
            (StatusCode::BAD_REQUEST, "DUPLICATE", message)
        }
        other => {
            tracing::error!(error = %other, "Store error");
            internal()
        }
    }
}

#[cfg(test)]
mod tests {
    use devcamper_core::validation::FieldViolation;

    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn taxonomy_maps_to_statuses() {
        assert_eq!(
            status_of(CoreError::NotFound { entity: "Bootcamp", id: 9 }.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CoreError::MalformedId("abc".into()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CoreError::InvalidFields(vec![FieldViolation::new("name", "x")]).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CoreError::InvalidQuery("bad".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CoreError::Unauthorized("no".into()).into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(CoreError::Forbidden("no".into()).into()),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(CoreError::LimitReached("one".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(StoreError::Duplicate(UQ_USER_EMAIL.into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(StoreError::Internal("boom".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn duplicate_message_names_the_constraint_subject() {
        let (_, code, message) = classify_store_error(&StoreError::Duplicate(UQ_REVIEW_PER_USER.into()));
        assert_eq!(code, "DUPLICATE");
        assert_eq!(message, "You have already reviewed this bootcamp");
    }
}
