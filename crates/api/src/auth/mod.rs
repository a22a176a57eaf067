//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access tokens and refresh-token helpers.
//! - [`cookies`] -- Session, refresh and CSRF cookies.

pub mod cookies;
pub mod jwt;
pub mod password;
