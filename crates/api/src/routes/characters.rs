//! Route definitions for the `/characters` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::characters;
use crate::state::AppState;

/// Routes mounted at `/characters`.
///
/// ```text
/// GET    /                   -> list
/// POST   /                   -> create
/// POST   /import/tupperbox   -> import_tupperbox
/// GET    /{id}               -> get
/// PUT    /{id}               -> update
/// DELETE /{id}               -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(characters::list).post(characters::create))
        .route("/import/tupperbox", post(characters::import_tupperbox))
        .route(
            "/{id}",
            get(characters::get)
                .put(characters::update)
                .delete(characters::delete),
        )
}
