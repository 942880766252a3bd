//! Repository for the `courses` table.

use devcamper_core::types::DbId;
use sqlx::PgPool;

use crate::models::course::{Course, CreateCourse, UpdateCourse};

/// Column list shared across queries to avoid repetition.
pub const COLUMNS: &str = "id, title, description, weeks, tuition, minimum_skill, \
                           scholarship_available, bootcamp_id, user_id, created_at";

/// Provides CRUD operations for courses.
pub struct CourseRepo;

impl CourseRepo {
    /// Insert a new course, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCourse) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses (title, description, weeks, tuition, minimum_skill,
                                  scholarship_available, bootcamp_id, user_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.weeks)
            .bind(input.tuition)
            .bind(&input.minimum_skill)
            .bind(input.scholarship_available)
            .bind(input.bootcamp_id)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a course by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a course. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCourse,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "UPDATE courses SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                weeks = COALESCE($4, weeks),
                tuition = COALESCE($5, tuition),
                minimum_skill = COALESCE($6, minimum_skill),
                scholarship_available = COALESCE($7, scholarship_available)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.weeks)
            .bind(input.tuition)
            .bind(&input.minimum_skill)
            .bind(input.scholarship_available)
            .fetch_optional(pool)
            .await
    }

    /// Delete a course, returning the removed row.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("DELETE FROM courses WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
