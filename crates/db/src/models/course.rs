//! Course entity model and DTOs.

use devcamper_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub weeks: String,
    pub tuition: f64,
    pub minimum_skill: String,
    pub scholarship_available: bool,
    #[serde(rename = "bootcamp")]
    pub bootcamp_id: DbId,
    #[serde(rename = "user")]
    pub user_id: DbId,
    pub created_at: Timestamp,
}

/// DTO for creating a course under a bootcamp.
#[derive(Debug, Clone)]
pub struct CreateCourse {
    pub title: String,
    pub description: String,
    pub weeks: String,
    pub tuition: f64,
    pub minimum_skill: String,
    pub scholarship_available: bool,
    pub bootcamp_id: DbId,
    pub user_id: DbId,
}

/// DTO for updating a course. The owning bootcamp and user never change.
#[derive(Debug, Clone, Default)]
pub struct UpdateCourse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub weeks: Option<String>,
    pub tuition: Option<f64>,
    pub minimum_skill: Option<String>,
    pub scholarship_available: Option<bool>,
}
