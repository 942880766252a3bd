//! Handlers for the `/reviews` resource and `/bootcamps/{id}/reviews`.
//!
//! Every successful write refreshes the reviewed bootcamp's
//! `averageRating` before the response is sent.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use devcamper_core::error::CoreError;
use devcamper_core::query::{Collection, Condition, Scalar};
use devcamper_core::validation::{ensure_valid, validate_review, ReviewDraft, WriteMode};
use devcamper_db::advanced::{advanced_results, expand, ListResponse, BOOTCAMP_SUMMARY};
use devcamper_db::aggregate::{refresh_parent_stat, AVERAGE_RATING};
use devcamper_db::models::review::{CreateReview, Review, UpdateReview};
use devcamper_db::store::ReviewStore;
use serde::Deserialize;
use serde_json::Value;

use super::{bootcamps, not_found, trimmed, write_then_refresh};
use crate::error::{AppError, AppResult};
use crate::extract::{parse_id, JsonBody};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireReviewer;
use crate::query::ListParams;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ReviewInput {
    pub title: Option<String>,
    pub text: Option<String>,
    pub rating: Option<i32>,
}

impl ReviewInput {
    fn validate(&self, mode: WriteMode) -> Result<(), CoreError> {
        let draft = ReviewDraft {
            title: self.title.as_deref(),
            text: self.text.as_deref(),
            rating: self.rating,
        };
        ensure_valid(validate_review(&draft, mode))
    }
}

/// GET /api/v1/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    params: ListParams,
) -> AppResult<Json<ListResponse>> {
    let query = params.into_query(Collection::Reviews, &state)?;
    let response = advanced_results(
        &*state.store,
        Collection::Reviews,
        &query,
        Some(&BOOTCAMP_SUMMARY),
    )
    .await?;
    Ok(Json(response))
}

/// GET /api/v1/bootcamps/{id}/reviews
pub async fn list_bootcamp_reviews(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    params: ListParams,
) -> AppResult<Json<ListResponse>> {
    let bootcamp = bootcamps::load(&state, &raw_id).await?;
    let parent = Collection::Reviews
        .schema()
        .field(BOOTCAMP_SUMMARY.field)
        .ok_or_else(|| AppError::InternalError("reviews have no bootcamp field".into()))?;

    let query = params
        .into_query(Collection::Reviews, &state)?
        .with_condition(Condition::eq(parent, Scalar::Int(bootcamp.id)));
    let response = advanced_results(&*state.store, Collection::Reviews, &query, None).await?;
    Ok(Json(response))
}

/// GET /api/v1/reviews/{id}
pub async fn get_review(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<DataResponse<Value>>> {
    let review = load(&state, &raw_id).await?;

    let mut rows = [serde_json::to_value(&review)
        .map_err(|e| AppError::InternalError(format!("Review serialization error: {e}")))?];
    expand(&*state.store, &mut rows, &BOOTCAMP_SUMMARY).await?;
    let [review] = rows;
    Ok(Json(DataResponse::new(review)))
}

/// POST /api/v1/bootcamps/{id}/reviews
///
/// One review per user per bootcamp; a second attempt is a 400.
pub async fn create_review(
    State(state): State<AppState>,
    RequireReviewer(user): RequireReviewer,
    Path(raw_id): Path<String>,
    JsonBody(input): JsonBody<ReviewInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Review>>)> {
    let bootcamp = bootcamps::load(&state, &raw_id).await?;
    input.validate(WriteMode::Create)?;

    let create = CreateReview {
        title: trimmed(&input.title).unwrap_or_default(),
        text: trimmed(&input.text).unwrap_or_default(),
        rating: input.rating.unwrap_or_default(),
        bootcamp_id: bootcamp.id,
        user_id: user.user_id,
    };

    let store = state.store.clone();
    let review = write_then_refresh(async move {
        let review = store.create_review(&create).await?;
        refresh_parent_stat(&*store, review.bootcamp_id, &AVERAGE_RATING).await;
        Ok::<_, AppError>(review)
    })
    .await?;

    tracing::info!(review_id = review.id, bootcamp_id = review.bootcamp_id, "Review created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(review))))
}

/// PUT /api/v1/reviews/{id}
pub async fn update_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
    JsonBody(input): JsonBody<ReviewInput>,
) -> AppResult<Json<DataResponse<Review>>> {
    let existing = load(&state, &raw_id).await?;
    ensure_author(&user, &existing, "update")?;
    input.validate(WriteMode::Update)?;

    let update = UpdateReview {
        title: trimmed(&input.title),
        text: trimmed(&input.text),
        rating: input.rating,
    };

    let rating_changed = update.rating.is_some();
    let store = state.store.clone();
    let review = write_then_refresh(async move {
        let review = store
            .update_review(existing.id, &update)
            .await?
            .ok_or_else(|| not_found("Review", existing.id))?;
        if rating_changed {
            refresh_parent_stat(&*store, review.bootcamp_id, &AVERAGE_RATING).await;
        }
        Ok::<_, AppError>(review)
    })
    .await?;
    Ok(Json(DataResponse::new(review)))
}

/// DELETE /api/v1/reviews/{id}
pub async fn delete_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let existing = load(&state, &raw_id).await?;
    ensure_author(&user, &existing, "delete")?;

    let store = state.store.clone();
    let removed = write_then_refresh(async move {
        let removed = store
            .delete_review(existing.id)
            .await?
            .ok_or_else(|| not_found("Review", existing.id))?;
        refresh_parent_stat(&*store, removed.bootcamp_id, &AVERAGE_RATING).await;
        Ok::<_, AppError>(removed)
    })
    .await?;

    tracing::info!(review_id = removed.id, bootcamp_id = removed.bootcamp_id, "Review deleted");
    Ok(Json(MessageResponse::empty()))
}

async fn load(state: &AppState, raw_id: &str) -> AppResult<Review> {
    let id = parse_id(raw_id)?;
    state
        .store
        .find_review(id)
        .await?
        .ok_or_else(|| not_found("Review", id))
}

fn ensure_author(user: &AuthUser, review: &Review, action: &str) -> AppResult<()> {
    if user.owns_or_admin(review.user_id) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(format!(
            "User {} is not authorized to {action} review {}",
            user.user_id, review.id
        ))))
    }
}
