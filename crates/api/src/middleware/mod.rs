//! Authentication, authorization and CSRF middleware.
//!
//! - [`auth::AuthUser`] -- Extracts the session principal from the session
//!   cookie or a Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires an admin.
//! - [`rbac::RequireRpTier`] -- Requires RP-tier access.
//! - [`csrf::verify_csrf`] -- Double-submit CSRF check on state-changing requests.

pub mod auth;
pub mod csrf;
pub mod rbac;
