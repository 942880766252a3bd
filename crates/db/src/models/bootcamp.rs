//! Bootcamp entity model and DTOs.

use devcamper_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Structured address, stored flat on the `bootcamps` row and nested on
/// the wire.
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub formatted_address: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub country: Option<String>,
}

/// A row from the `bootcamps` table.
///
/// `average_cost` and `average_rating` are derived from the bootcamp's
/// courses and reviews and are never written from client input.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bootcamp {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: String,
    #[sqlx(flatten)]
    pub location: Location,
    pub careers: Vec<String>,
    pub average_rating: Option<f64>,
    pub average_cost: Option<f64>,
    pub photo: String,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    #[serde(rename = "user")]
    pub user_id: DbId,
    pub created_at: Timestamp,
}

/// DTO for creating a bootcamp.
#[derive(Debug, Clone)]
pub struct CreateBootcamp {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: String,
    pub location: Location,
    pub careers: Vec<String>,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    pub user_id: DbId,
}

/// DTO for updating a bootcamp. `slug` is set whenever `name` is.
#[derive(Debug, Clone, Default)]
pub struct UpdateBootcamp {
    pub name: Option<String>,
    pub slug: Option<String>,
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
