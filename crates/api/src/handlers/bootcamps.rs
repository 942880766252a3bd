//! Handlers for the `/bootcamps` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use devcamper_core::error::CoreError;
use devcamper_core::naming::generate_slug;
use devcamper_core::query::Collection;
use devcamper_core::validation::{ensure_valid, validate_bootcamp, BootcampDraft, WriteMode};
use devcamper_db::advanced::{advanced_results, ListResponse};
use devcamper_db::models::bootcamp::{Bootcamp, CreateBootcamp, Location, UpdateBootcamp};
use devcamper_db::store::BootcampStore;
use serde::Deserialize;

use super::{not_found, trimmed};
use crate::error::{AppError, AppResult};
use crate::extract::{parse_id, JsonBody};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequirePublisher;
use crate::query::ListParams;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for creating or updating a bootcamp.
///
/// Derived statistics, the slug and the owner are not accepted from
/// clients; unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootcampInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub location: Option<Location>,
    pub careers: Option<Vec<String>>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
}

impl BootcampInput {
    fn validate(&self, mode: WriteMode) -> Result<(), CoreError> {
        let draft = BootcampDraft {
            name: self.name.as_deref(),
            description: self.description.as_deref(),
            website: self.website.as_deref(),
            phone: self.phone.as_deref(),
            email: self.email.as_deref(),
            address: self.address.as_deref(),
            careers: self.careers.as_deref(),
        };
        ensure_valid(validate_bootcamp(&draft, mode))
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/bootcamps
pub async fn list_bootcamps(
    State(state): State<AppState>,
    params: ListParams,
) -> AppResult<Json<ListResponse>> {
    let query = params.into_query(Collection::Bootcamps, &state)?;
    let response = advanced_results(&*state.store, Collection::Bootcamps, &query, None).await?;
    Ok(Json(response))
}

/// GET /api/v1/bootcamps/{id}
pub async fn get_bootcamp(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<DataResponse<Bootcamp>>> {
    let bootcamp = load(&state, &raw_id).await?;
    Ok(Json(DataResponse::new(bootcamp)))
}

/// POST /api/v1/bootcamps
///
/// Publishers may own a single bootcamp; admins may create any number.
pub async fn create_bootcamp(
    State(state): State<AppState>,
    RequirePublisher(user): RequirePublisher,
    JsonBody(input): JsonBody<BootcampInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Bootcamp>>)> {
    input.validate(WriteMode::Create)?;

    if !user.is_admin() && state.store.count_bootcamps_by_owner(user.user_id).await? > 0 {
        return Err(AppError::Core(CoreError::LimitReached(format!(
            "The user with ID {} has already published a bootcamp",
            user.user_id
        ))));
    }

    let name = trimmed(&input.name).unwrap_or_default();
    let create = CreateBootcamp {
        slug: generate_slug(&name),
        name,
        description: trimmed(&input.description).unwrap_or_default(),
        website: input.website,
        phone: input.phone,
        email: input.email,
        address: trimmed(&input.address).unwrap_or_default(),
        location: input.location.unwrap_or_default(),
        careers: input.careers.unwrap_or_default(),
        housing: input.housing.unwrap_or(false),
        job_assistance: input.job_assistance.unwrap_or(false),
        job_guarantee: input.job_guarantee.unwrap_or(false),
        accept_gi: input.accept_gi.unwrap_or(false),
        user_id: user.user_id,
    };

    let bootcamp = state.store.create_bootcamp(&create).await?;
    tracing::info!(bootcamp_id = bootcamp.id, user_id = user.user_id, "Bootcamp created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(bootcamp))))
}

/// PUT /api/v1/bootcamps/{id}
pub async fn update_bootcamp(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
    JsonBody(input): JsonBody<BootcampInput>,
) -> AppResult<Json<DataResponse<Bootcamp>>> {
    let existing = load(&state, &raw_id).await?;
    ensure_owner(&user, &existing, "update")?;
    input.validate(WriteMode::Update)?;

    let name = trimmed(&input.name);
    let update = UpdateBootcamp {
        slug: name.as_deref().map(generate_slug),
        name,
        description: trimmed(&input.description),
        website: input.website,
        phone: input.phone,
        email: input.email,
        address: trimmed(&input.address),
        location: input.location,
        careers: input.careers,
        housing: input.housing,
        job_assistance: input.job_assistance,
        job_guarantee: input.job_guarantee,
        accept_gi: input.accept_gi,
    };

    let bootcamp = state
        .store
        .update_bootcamp(existing.id, &update)
        .await?
        .ok_or_else(|| not_found("Bootcamp", existing.id))?;
    Ok(Json(DataResponse::new(bootcamp)))
}

/// DELETE /api/v1/bootcamps/{id}
///
/// Removes the bootcamp together with its courses and reviews.
pub async fn delete_bootcamp(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let existing = load(&state, &raw_id).await?;
    ensure_owner(&user, &existing, "delete")?;

    if !state.store.delete_bootcamp(existing.id).await? {
        return Err(not_found("Bootcamp", existing.id));
    }
    tracing::info!(bootcamp_id = existing.id, user_id = user.user_id, "Bootcamp deleted");
    Ok(Json(MessageResponse::empty()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse the path id and load the bootcamp, or 404.
pub(crate) async fn load(state: &AppState, raw_id: &str) -> AppResult<Bootcamp> {
    let id = parse_id(raw_id)?;
    state
        .store
        .find_bootcamp(id)
        .await?
        .ok_or_else(|| not_found("Bootcamp", id))
}

fn ensure_owner(user: &AuthUser, bootcamp: &Bootcamp, action: &str) -> AppResult<()> {
    if user.owns_or_admin(bootcamp.user_id) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(format!(
            "User {} is not authorized to {action} this bootcamp",
            user.user_id
        ))))
    }
}
