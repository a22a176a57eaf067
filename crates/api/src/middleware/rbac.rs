//! Access-control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects with 403 when the principal
//! lacks the required privilege.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use cyarika_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires an admin.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.principal().is_admin {
            return Err(AppError::Core(CoreError::forbidden("Admin access required")));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires an active RP subscription (admins always pass).
pub struct RequireRpTier(pub AuthUser);

impl FromRequestParts<AppState> for RequireRpTier {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.principal().has_rp_access() {
            return Err(AppError::Core(CoreError::forbidden(
                "An active RP subscription is required",
            )));
        }
        Ok(RequireRpTier(user))
    }
}
