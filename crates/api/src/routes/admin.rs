//! Route definitions for the `/admin` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require an admin (enforced by handler extractors).
///
/// ```text
/// GET /users       -> list_users
/// PUT /users/{id}  -> update_user
/// GET /stats       -> stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/{id}", put(admin::update_user))
        .route("/stats", get(admin::stats))
}
