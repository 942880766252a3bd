//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row, serialized in the
//!   camelCase wire shape clients see
//! - A create DTO holding already-validated insert values
//! - An update DTO (all `Option` fields) for patches

pub mod bootcamp;
pub mod course;
pub mod review;
pub mod session;
pub mod user;
