//! Route definitions for the `/prompts` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::prompts;
use crate::state::AppState;

/// Routes mounted at `/prompts`.
///
/// ```text
/// GET    /             -> list
/// POST   /             -> create (admin)
/// GET    /random       -> random
/// GET    /categories   -> categories
/// GET    /{id}         -> get
/// PUT    /{id}         -> update (admin)
/// DELETE /{id}         -> delete (admin)
/// POST   /{id}/use     -> record_use
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(prompts::list).post(prompts::create))
        .route("/random", get(prompts::random))
        .route("/categories", get(prompts::categories))
        .route(
            "/{id}",
            get(prompts::get)
                .put(prompts::update)
                .delete(prompts::delete),
        )
        .route("/{id}/use", post(prompts::record_use))
}
