//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. [`crate::store::PgStore`]
//! exposes them through the storage ports.

pub mod bootcamp_repo;
pub mod course_repo;
pub mod list_repo;
pub mod review_repo;
pub mod session_repo;
pub mod stat_repo;
pub mod user_repo;
