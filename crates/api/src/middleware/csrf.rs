//! Double-submit CSRF protection.
//!
//! State-changing requests that authenticate with session cookies must send
//! the `cyarika_csrf` cookie value back in the `X-CSRF-Token` header.
//! Requests without session cookies (Bearer clients, anonymous callers) are
//! not exposed to CSRF and pass through; the login, register and refresh
//! endpoints are exempt because they issue the token.

use axum::extract::Request;
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use cyarika_core::error::CoreError;

use crate::auth::cookies::{has_session_cookie, read_cookie, tokens_match, CSRF_COOKIE, CSRF_HEADER};
use crate::error::AppError;

const EXEMPT_SUFFIXES: [&str; 3] = ["/auth/login", "/auth/register", "/auth/refresh"];

fn is_state_changing(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Axum middleware; install with `axum::middleware::from_fn(verify_csrf)`.
pub async fn verify_csrf(request: Request, next: Next) -> Result<Response, AppError> {
    let path = request.uri().path();
    let headers = request.headers();

    let needs_check = is_state_changing(request.method())
        && !EXEMPT_SUFFIXES.iter().any(|suffix| path.ends_with(suffix))
        && has_session_cookie(headers);

    if needs_check {
        let cookie = read_cookie(headers, CSRF_COOKIE).filter(|v| !v.is_empty());
        let header = headers.get(CSRF_HEADER).and_then(|v| v.to_str().ok());

        let valid = matches!((cookie, header), (Some(c), Some(h)) if tokens_match(c, h));
        if !valid {
            tracing::warn!(method = %request.method(), path, "CSRF token missing or mismatched");
            return Err(AppError::Core(CoreError::forbidden(
                "Missing or invalid CSRF token",
            )));
        }
    }

    Ok(next.run(request).await)
}
