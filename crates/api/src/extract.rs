//! Request extractors whose rejections use the [`AppError`] body shape.

use axum::extract::FromRequest;
use devcamper_core::error::CoreError;
use devcamper_core::types::DbId;

use crate::error::AppError;

/// `axum::Json` whose rejection is an [`AppError`] (400 with the JSON
/// envelope) instead of axum's plain-text response.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Parse a path identifier. Anything that is not a positive integer is a
/// malformed id, reported as a 404.
pub fn parse_id(raw: &str) -> Result<DbId, AppError> {
    raw.parse::<DbId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::Core(CoreError::MalformedId(raw.to_string())))
}
