//! Handlers for the `/courses` resource and `/bootcamps/{id}/courses`.
//!
//! Every successful write refreshes the owning bootcamp's `averageCost`
//! before the response is sent.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use devcamper_core::error::CoreError;
use devcamper_core::query::{Collection, Condition, Scalar};
use devcamper_core::validation::{ensure_valid, validate_course, CourseDraft, WriteMode};
use devcamper_db::advanced::{advanced_results, expand, ListResponse, BOOTCAMP_SUMMARY};
use devcamper_db::aggregate::{refresh_parent_stat, AVERAGE_COST};
use devcamper_db::models::course::{Course, CreateCourse, UpdateCourse};
use devcamper_db::store::CourseStore;
use serde::Deserialize;
use serde_json::Value;

use super::{bootcamps, not_found, trimmed, write_then_refresh};
use crate::error::{AppError, AppResult};
use crate::extract::{parse_id, JsonBody};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequirePublisher;
use crate::query::ListParams;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Request body for creating or updating a course.
///
/// The owning bootcamp comes from the URL, never from the body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub weeks: Option<String>,
    pub tuition: Option<f64>,
    pub minimum_skill: Option<String>,
    pub scholarship_available: Option<bool>,
}

impl CourseInput {
    fn validate(&self, mode: WriteMode) -> Result<(), CoreError> {
        let draft = CourseDraft {
            title: self.title.as_deref(),
            description: self.description.as_deref(),
            weeks: self.weeks.as_deref(),
            tuition: self.tuition,
            minimum_skill: self.minimum_skill.as_deref(),
        };
        ensure_valid(validate_course(&draft, mode))
    }
}

/// GET /api/v1/courses
///
/// Each course embeds its bootcamp's name and description.
pub async fn list_courses(
    State(state): State<AppState>,
    params: ListParams,
) -> AppResult<Json<ListResponse>> {
    let query = params.into_query(Collection::Courses, &state)?;
    let response = advanced_results(
        &*state.store,
        Collection::Courses,
        &query,
        Some(&BOOTCAMP_SUMMARY),
    )
    .await?;
    Ok(Json(response))
}

/// GET /api/v1/bootcamps/{id}/courses
pub async fn list_bootcamp_courses(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    params: ListParams,
) -> AppResult<Json<ListResponse>> {
    let bootcamp = bootcamps::load(&state, &raw_id).await?;
    let parent = Collection::Courses
        .schema()
        .field(BOOTCAMP_SUMMARY.field)
        .ok_or_else(|| AppError::InternalError("courses have no bootcamp field".into()))?;

    let query = params
        .into_query(Collection::Courses, &state)?
        .with_condition(Condition::eq(parent, Scalar::Int(bootcamp.id)));
    let response = advanced_results(&*state.store, Collection::Courses, &query, None).await?;
    Ok(Json(response))
}

/// GET /api/v1/courses/{id}
pub async fn get_course(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<DataResponse<Value>>> {
    let course = load(&state, &raw_id).await?;

    let mut rows = [serde_json::to_value(&course)
        .map_err(|e| AppError::InternalError(format!("Course serialization error: {e}")))?];
    expand(&*state.store, &mut rows, &BOOTCAMP_SUMMARY).await?;
    let [course] = rows;
    Ok(Json(DataResponse::new(course)))
}

/// POST /api/v1/bootcamps/{id}/courses
///
/// Only the bootcamp's owner (or an admin) may add courses to it.
pub async fn create_course(
    State(state): State<AppState>,
    RequirePublisher(user): RequirePublisher,
    Path(raw_id): Path<String>,
    JsonBody(input): JsonBody<CourseInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Course>>)> {
    let bootcamp = bootcamps::load(&state, &raw_id).await?;
    if !user.owns_or_admin(bootcamp.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "User {} is not authorized to add a course to bootcamp {}",
            user.user_id, bootcamp.id
        ))));
    }
    input.validate(WriteMode::Create)?;

    let create = CreateCourse {
        title: trimmed(&input.title).unwrap_or_default(),
        description: trimmed(&input.description).unwrap_or_default(),
        weeks: trimmed(&input.weeks).unwrap_or_default(),
        tuition: input.tuition.unwrap_or_default(),
        minimum_skill: input.minimum_skill.unwrap_or_default(),
        scholarship_available: input.scholarship_available.unwrap_or(false),
        bootcamp_id: bootcamp.id,
        user_id: user.user_id,
    };

    let store = state.store.clone();
    let course = write_then_refresh(async move {
        let course = store.create_course(&create).await?;
        refresh_parent_stat(&*store, course.bootcamp_id, &AVERAGE_COST).await;
        Ok::<_, AppError>(course)
    })
    .await?;

    tracing::info!(course_id = course.id, bootcamp_id = course.bootcamp_id, "Course created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(course))))
}

/// PUT /api/v1/courses/{id}
pub async fn update_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
    JsonBody(input): JsonBody<CourseInput>,
) -> AppResult<Json<DataResponse<Course>>> {
    let existing = load(&state, &raw_id).await?;
    ensure_owner(&user, &existing, "update")?;
    input.validate(WriteMode::Update)?;

    let tuition_changed = input.tuition.is_some();
    let update = UpdateCourse {
        title: trimmed(&input.title),
        description: trimmed(&input.description),
        weeks: trimmed(&input.weeks),
        tuition: input.tuition,
        minimum_skill: input.minimum_skill,
        scholarship_available: input.scholarship_available,
    };

    let store = state.store.clone();
    let course = write_then_refresh(async move {
        let course = store
            .update_course(existing.id, &update)
            .await?
            .ok_or_else(|| not_found("Course", existing.id))?;
        if tuition_changed {
            refresh_parent_stat(&*store, course.bootcamp_id, &AVERAGE_COST).await;
        }
        Ok::<_, AppError>(course)
    })
    .await?;
    Ok(Json(DataResponse::new(course)))
}

/// DELETE /api/v1/courses/{id}
pub async fn delete_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let existing = load(&state, &raw_id).await?;
    ensure_owner(&user, &existing, "delete")?;

    let store = state.store.clone();
    let removed = write_then_refresh(async move {
        let removed = store
            .delete_course(existing.id)
            .await?
            .ok_or_else(|| not_found("Course", existing.id))?;
        refresh_parent_stat(&*store, removed.bootcamp_id, &AVERAGE_COST).await;
        Ok::<_, AppError>(removed)
    })
    .await?;

    tracing::info!(course_id = removed.id, bootcamp_id = removed.bootcamp_id, "Course deleted");
    Ok(Json(MessageResponse::empty()))
}

async fn load(state: &AppState, raw_id: &str) -> AppResult<Course> {
    let id = parse_id(raw_id)?;
    state
        .store
        .find_course(id)
        .await?
        .ok_or_else(|| not_found("Course", id))
}

fn ensure_owner(user: &AuthUser, course: &Course, action: &str) -> AppResult<()> {
    if user.owns_or_admin(course.user_id) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(format!(
            "User {} is not authorized to {action} course {}",
            user.user_id, course.id
        ))))
    }
}
