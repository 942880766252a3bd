//! Domain logic for the bootcamp directory.
//!
//! Everything in this crate is pure: no database access, no HTTP. The
//! persistence and API crates build on these types.

pub mod aggregate;
pub mod error;
pub mod naming;
pub mod query;
pub mod roles;
pub mod types;
pub mod validation;
