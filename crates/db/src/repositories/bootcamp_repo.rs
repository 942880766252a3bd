//! Repository for the `bootcamps` table.

use devcamper_core::types::DbId;
use sqlx::PgPool;

use crate::models::bootcamp::{Bootcamp, CreateBootcamp, Location, UpdateBootcamp};

/// Column list shared across queries to avoid repetition.
pub const COLUMNS: &str = "id, name, slug, description, website, phone, email, address, \
                           longitude, latitude, formatted_address, street, city, state, \
                           zipcode, country, careers, average_rating, average_cost, photo, \
                           housing, job_assistance, job_guarantee, accept_gi, user_id, created_at";

/// Provides CRUD operations for bootcamps.
pub struct BootcampRepo;

impl BootcampRepo {
    /// Insert a new bootcamp, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateBootcamp) -> Result<Bootcamp, sqlx::Error> {
        let query = format!(
            "INSERT INTO bootcamps (name, slug, description, website, phone, email, address,
                                    longitude, latitude, formatted_address, street, city, state,
                                    zipcode, country, careers, housing, job_assistance,
                                    job_guarantee, accept_gi, user_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                     $17, $18, $19, $20, $21)
             RETURNING {COLUMNS}"
        );
        let location = &input.location;
        sqlx::query_as::<_, Bootcamp>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.website)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.address)
            .bind(location.longitude)
            .bind(location.latitude)
            .bind(&location.formatted_address)
            .bind(&location.street)
            .bind(&location.city)
            .bind(&location.state)
            .bind(&location.zipcode)
            .bind(&location.country)
            .bind(&input.careers)
            .bind(input.housing)
            .bind(input.job_assistance)
            .bind(input.job_guarantee)
            .bind(input.accept_gi)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a bootcamp by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Bootcamp>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bootcamps WHERE id = $1");
        sqlx::query_as::<_, Bootcamp>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Count the bootcamps owned by a user.
    pub async fn count_by_owner(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM bootcamps WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Update a bootcamp. Only non-`None` fields in `input` are applied; a
    /// supplied `location` replaces the stored one wholesale.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBootcamp,
    ) -> Result<Option<Bootcamp>, sqlx::Error> {
        let query = format!(
            "UPDATE bootcamps SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                website = COALESCE($5, website),
                phone = COALESCE($6, phone),
                email = COALESCE($7, email),
                address = COALESCE($8, address),
                careers = COALESCE($9, careers),
                housing = COALESCE($10, housing),
                job_assistance = COALESCE($11, job_assistance),
                job_guarantee = COALESCE($12, job_guarantee),
                accept_gi = COALESCE($13, accept_gi),
                longitude = CASE WHEN $14 THEN $15 ELSE longitude END,
                latitude = CASE WHEN $14 THEN $16 ELSE latitude END,
                formatted_address = CASE WHEN $14 THEN $17 ELSE formatted_address END,
                street = CASE WHEN $14 THEN $18 ELSE street END,
                city = CASE WHEN $14 THEN $19 ELSE city END,
                state = CASE WHEN $14 THEN $20 ELSE state END,
                zipcode = CASE WHEN $14 THEN $21 ELSE zipcode END,
                country = CASE WHEN $14 THEN $22 ELSE country END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let replace_location = input.location.is_some();
        let location = input.location.clone().unwrap_or_default();
        let Location {
            longitude,
            latitude,
            formatted_address,
            street,
            city,
            state,
            zipcode,
            country,
        } = location;
        sqlx::query_as::<_, Bootcamp>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.website)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.address)
            .bind(&input.careers)
            .bind(input.housing)
            .bind(input.job_assistance)
            .bind(input.job_guarantee)
            .bind(input.accept_gi)
            .bind(replace_location)
            .bind(longitude)
            .bind(latitude)
            .bind(formatted_address)
            .bind(street)
            .bind(city)
            .bind(state)
            .bind(zipcode)
            .bind(country)
            .fetch_optional(pool)
            .await
    }

    /// Delete a bootcamp. Courses and reviews go with it (`ON DELETE CASCADE`).
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bootcamps WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
