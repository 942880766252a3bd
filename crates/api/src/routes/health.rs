//! `GET /health`: liveness plus store reachability, for load balancers and
//! deploy checks. Mounted outside `/api/v1` and never authenticated.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use devcamper_db::store::StoreHealth;
use devcamper_db::StoreError;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreStatus {
    Up,
    Down,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub version: &'static str,
    pub store: StoreStatus,
}

/// Turn the store ping into the response. An unreachable store is 503.
fn report(ping: Result<(), StoreError>) -> (StatusCode, HealthResponse) {
    let store = match ping {
        Ok(()) => StoreStatus::Up,
        Err(e) => {
            tracing::warn!(error = %e, "Health check: store unreachable");
            StoreStatus::Down
        }
    };
    let status = match store {
        StoreStatus::Up => StatusCode::OK,
        StoreStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    };
    let body = HealthResponse {
        success: store == StoreStatus::Up,
        version: env!("CARGO_PKG_VERSION"),
        store,
    };
    (status, body)
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, body) = report(state.store.ping().await);
    (status, Json(body))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
