//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use cyarika_core::error::CoreError;
use cyarika_core::roles::Principal;

use crate::auth::cookies::{read_cookie, SESSION_COOKIE};
use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated caller.
///
/// The access token is read from `Authorization: Bearer <token>` when
/// present, otherwise from the `cyarika_session` cookie.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.id(), "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Principal);

impl AuthUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }

    pub fn principal(&self) -> &Principal {
        &self.0
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match parts.headers.get(AUTHORIZATION) {
            Some(header) => header
                .to_str()
                .ok()
                .and_then(|v| v.strip_prefix("Bearer "))
                .ok_or_else(|| {
                    unauthorized("Invalid Authorization format. Expected: Bearer <token>")
                })?,
            None => read_cookie(&parts.headers, SESSION_COOKIE)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| unauthorized("Not authenticated"))?,
        };

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        Ok(AuthUser(claims.principal()))
    }
}
