//! Per-resource route tables. They are composed under `/api/v1` in
//! [`crate::router`]; `health` is mounted at the root.

pub mod auth;
pub mod bootcamps;
pub mod courses;
pub mod health;
pub mod reviews;
pub mod users;
