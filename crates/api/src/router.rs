//! Top-level router: `/health` at the root, the DevCamper resources under
//! `/api/v1`, and the middleware every request passes through.

use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method, Request, StatusCode, Uri};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::routes::{auth, bootcamps, courses, health, reviews, users};
use crate::state::AppState;

/// Version prefix of every resource route.
pub const API_PREFIX: &str = "/api/v1";

const REQUEST_ID_HEADER: &str = "x-request-id";

/// The `/api/v1` resource tree.
///
/// ```text
/// /bootcamps                          list, create (publisher/admin)
/// /bootcamps/{id}                     get, update, delete (owner/admin)
/// /bootcamps/{id}/courses             scoped list, create (owning publisher/admin)
/// /bootcamps/{id}/reviews             scoped list, create (user/admin)
/// /courses, /courses/{id}             list, get, update, delete (owner/admin)
/// /reviews, /reviews/{id}             list, get, update, delete (author/admin)
/// /auth/...                           register, login, sessions, password reset
/// /users, /users/{id}                 admin only
/// ```
fn api_v1() -> Router<AppState> {
    Router::new()
        .nest("/bootcamps", bootcamps::router())
        .nest("/courses", courses::router())
        .nest("/reviews", reviews::router())
        .nest("/auth", auth::router())
        .nest("/users", users::router())
}

/// Build the application router used by both `main.rs` and the
/// integration tests.
///
/// Every request gets an `x-request-id` (generated unless the client sent
/// one), which is recorded on its trace span and echoed on the response.
/// Handlers that outlive `REQUEST_TIMEOUT_SECS` are answered with 408.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .merge(health::router())
        .nest(API_PREFIX, api_v1())
        .fallback(route_not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(cors_layer(&config.cors_origins))
        .with_state(state)
}

fn request_span(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id,
    )
}

async fn route_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Route {} not found", uri.path()))
}

/// CORS for the browser front end. Credentials are allowed so the `token`
/// cookie travels with cross-origin requests; origins that do not parse
/// are skipped with a warning.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
}
