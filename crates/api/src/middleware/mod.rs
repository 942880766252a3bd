//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a Bearer token or `token` cookie.
//! - [`rbac::RequirePublisher`] -- Requires `publisher` or `admin` role.
//! - [`rbac::RequireReviewer`] -- Requires `user` or `admin` role.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.

pub mod auth;
pub mod rbac;
