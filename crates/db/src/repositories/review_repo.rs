//! Repository for the `reviews` table.

use devcamper_core::types::DbId;
use sqlx::PgPool;

use crate::models::review::{CreateReview, Review, UpdateReview};

/// Column list shared across queries to avoid repetition.
pub const COLUMNS: &str = "id, title, text, rating, bootcamp_id, user_id, created_at";

/// Provides CRUD operations for reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a new review, returning the created row.
    ///
    /// A second review by the same user for the same bootcamp violates
    /// `uq_reviews_bootcamp_user`.
    pub async fn create(pool: &PgPool, input: &CreateReview) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews (title, text, rating, bootcamp_id, user_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(&input.title)
            .bind(&input.text)
            .bind(input.rating)
            .bind(input.bootcamp_id)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a review. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateReview,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            "UPDATE reviews SET
                title = COALESCE($2, title),
                text = COALESCE($3, text),
                rating = COALESCE($4, rating)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.text)
            .bind(input.rating)
            .fetch_optional(pool)
            .await
    }

    /// Delete a review, returning the removed row.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("DELETE FROM reviews WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
