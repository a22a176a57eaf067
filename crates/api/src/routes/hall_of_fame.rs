//! Route definitions for the `/hall-of-fame` gallery.

use axum::routing::get;
use axum::Router;

use crate::handlers::hall_of_fame;
use crate::state::AppState;

/// Routes mounted at `/hall-of-fame`.
///
/// ```text
/// GET    /             -> list
/// GET    /random       -> random
/// GET    /stats        -> stats
/// GET    /characters   -> characters
/// GET    /export       -> export
/// GET    /{id}         -> get
/// DELETE /{id}         -> delete (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(hall_of_fame::list))
        .route("/random", get(hall_of_fame::random))
        .route("/stats", get(hall_of_fame::stats))
        .route("/characters", get(hall_of_fame::characters))
        .route("/export", get(hall_of_fame::export))
        .route(
            "/{id}",
            get(hall_of_fame::get).delete(hall_of_fame::delete),
        )
}
