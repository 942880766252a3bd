//! Reads and targeted writes for derived statistics.
//!
//! Table and column names are taken from the static collection schemas.

use devcamper_core::types::DbId;
use sqlx::PgPool;

pub struct StatRepo;

impl StatRepo {
    /// Collect `source_column` of every row in `table` whose
    /// `parent_column` equals `parent_id`.
    pub async fn child_values(
        pool: &PgPool,
        table: &str,
        parent_column: &str,
        source_column: &str,
        parent_id: DbId,
    ) -> Result<Vec<f64>, sqlx::Error> {
        let query = format!(
            "SELECT {source_column}::DOUBLE PRECISION FROM {table}
             WHERE {parent_column} = $1 AND {source_column} IS NOT NULL"
        );
        sqlx::query_scalar::<_, f64>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// Distinct `parent_column` values of the rows whose `owner_column` is
    /// `owner_id`.
    pub async fn parents_referenced_by(
        pool: &PgPool,
        table: &str,
        parent_column: &str,
        owner_column: &str,
        owner_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let query =
            format!("SELECT DISTINCT {parent_column} FROM {table} WHERE {owner_column} = $1");
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite one statistic column. `None` stores NULL.
    ///
    /// Returns `true` if the parent row exists.
    pub async fn write(
        pool: &PgPool,
        table: &str,
        column: &str,
        parent_id: DbId,
        value: Option<f64>,
    ) -> Result<bool, sqlx::Error> {
        let query = format!("UPDATE {table} SET {column} = $2 WHERE id = $1");
        let result = sqlx::query(&query)
            .bind(parent_id)
            .bind(value)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
