//! Errors surfaced by every store adapter.

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Constraint names shared by the PostgreSQL schema and the in-memory
/// adapter, so callers can map a duplicate to a specific message.
pub const UQ_BOOTCAMP_NAME: &str = "uq_bootcamps_name";
pub const UQ_USER_EMAIL: &str = "uq_users_email";
pub const UQ_REVIEW_PER_USER: &str = "uq_reviews_bootcamp_user";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A write collided with a uniqueness constraint (named).
    #[error("Duplicate value violates constraint '{0}'")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store was asked for something its schema does not describe.
    #[error("Store error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                return StoreError::Duplicate(constraint);
            }
        }
        StoreError::Database(err)
    }
}
