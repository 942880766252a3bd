use std::sync::Arc;

use devcamper_db::store::Store;

use crate::config::ServerConfig;
use crate::mail::ResetMailer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Persistence: PostgreSQL or the in-memory adapter.
    pub store: Arc<dyn Store>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// SMTP mailer for password reset links; `None` when SMTP is not configured.
    pub mailer: Option<Arc<ResetMailer>>,
}
