//! Credential helpers: JWT access tokens, session/reset token hashing,
//! the token cookie and Argon2id password hashing.

pub mod cookie;
pub mod jwt;
pub mod password;
