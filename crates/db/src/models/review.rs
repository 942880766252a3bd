//! Review entity model and DTOs.

use devcamper_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `reviews` table. One review per user per bootcamp.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: DbId,
    pub title: String,
    pub text: String,
    pub rating: i32,
    #[serde(rename = "bootcamp")]
    pub bootcamp_id: DbId,
    #[serde(rename = "user")]
    pub user_id: DbId,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateReview {
    pub title: String,
    pub text: String,
    pub rating: i32,
    pub bootcamp_id: DbId,
    pub user_id: DbId,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateReview {
    pub title: Option<String>,
    pub text: Option<String>,
    pub rating: Option<i32>,
}
