//! Shared response envelope types for API handlers.
//!
//! Single-record responses use `{ "success": true, "data": ... }`; list
//! responses use [`devcamper_db::advanced::ListResponse`].

use serde::Serialize;

/// Standard `{ "success": true, "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse::new(bootcamp)))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Body of every endpoint that issues an access token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

/// Body of endpoints that only report success (deletes, logout, forgot
/// password).
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub data: serde_json::Value,
}

impl MessageResponse {
    pub fn empty() -> Self {
        Self {
            success: true,
            data: serde_json::json!({}),
        }
    }

    pub fn message(text: &str) -> Self {
        Self {
            success: true,
            data: serde_json::Value::String(text.to_string()),
        }
    }
}
