//! Tests for `AppError` -> HTTP response mapping.
//!
//! These call `IntoResponse` directly; no router is involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use devcamper_api::error::AppError;
use devcamper_core::error::CoreError;
use devcamper_core::validation::FieldViolation;
use devcamper_db::error::UQ_BOOTCAMP_NAME;
use devcamper_db::StoreError;
use http_body_util::BodyExt;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Bootcamp",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Bootcamp not found with id of 42");
}

#[tokio::test]
async fn malformed_id_is_a_generic_404() {
    let (status, json) = error_to_response(CoreError::MalformedId("xyz".into()).into()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Resource not found");
}

#[tokio::test]
async fn validation_lists_every_message() {
    let err = CoreError::InvalidFields(vec![
        FieldViolation::new("name", "Please add a name"),
        FieldViolation::new("address", "Please add an address"),
    ]);
    let (status, json) = error_to_response(err.into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Please add a name, Please add an address");
}

#[tokio::test]
async fn duplicate_is_a_400() {
    let (status, json) =
        error_to_response(StoreError::Duplicate(UQ_BOOTCAMP_NAME.into()).into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "DUPLICATE");
    assert_eq!(json["error"], "A bootcamp with that name already exists");
}

#[tokio::test]
async fn bootcamp_limit_has_its_own_code() {
    let err = CoreError::LimitReached("The user with ID 7 has already published a bootcamp".into());
    let (status, json) = error_to_response(err.into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "LIMIT_REACHED");
    assert_eq!(json["error"], "The user with ID 7 has already published a bootcamp");
}

#[tokio::test]
async fn internal_errors_are_sanitized() {
    let err = AppError::InternalError("connection string postgres://secret".into());
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");

    let (status, json) = error_to_response(StoreError::Internal("table gone".into()).into()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn auth_errors_map_to_401_and_403() {
    let (status, json) = error_to_response(CoreError::Unauthorized("nope".into()).into()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");

    let (status, json) = error_to_response(CoreError::Forbidden("nope".into()).into()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}
