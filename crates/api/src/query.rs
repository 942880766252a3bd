//! Query-string extraction for list endpoints.
//!
//! List endpoints accept arbitrary `key=value` pairs (filters with optional
//! `[op]` suffixes plus `select`, `sort`, `page`, `limit`). The raw pairs are
//! kept in arrival order and parsed against the target collection's schema.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use devcamper_core::query::{Collection, ListQuery};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Raw query-string pairs of a list request.
#[derive(Debug, Clone, Default)]
pub struct ListParams(pub Vec<(String, String)>);

impl FromRequestParts<AppState> for ListParams {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(ListParams(pairs))
    }
}

impl ListParams {
    /// Parse into a [`ListQuery`] for `collection`, using the deployment's
    /// default order when no `sort` is given.
    pub fn into_query(self, collection: Collection, state: &AppState) -> AppResult<ListQuery> {
        Ok(ListQuery::parse(
            collection.schema(),
            &self.0,
            state.config.default_order,
        )?)
    }
}
