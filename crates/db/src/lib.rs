//! Persistence for the bootcamp directory.
//!
//! Storage is reached through the ports in [`store`]; [`advanced`] runs
//! generic list queries and [`aggregate`] keeps derived bootcamp statistics
//! in step with their courses and reviews.

pub mod advanced;
pub mod aggregate;
pub mod error;
pub mod models;
pub mod repositories;
pub mod store;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub use error::StoreError;

pub type DbPool = PgPool;

/// Open a connection pool to `database_url`.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the pool is usable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
