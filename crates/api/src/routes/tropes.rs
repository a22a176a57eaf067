//! Route definitions for the `/tropes` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tropes;
use crate::state::AppState;

/// Routes mounted at `/tropes`.
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
        .route("/", get(tropes::list).post(tropes::create))
        .route("/random", get(tropes::random))
        .route("/categories", get(tropes::categories))
        .route(
            "/{id}",
            get(tropes::get)
                .put(tropes::update)
                .delete(tropes::delete),
        )
        .route("/{id}/use", post(tropes::record_use))
}
