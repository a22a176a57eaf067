pub mod admin;
pub mod auth;
pub mod characters;
pub mod hall_of_fame;
pub mod health;
pub mod messages;
pub mod prompts;
pub mod tropes;

use axum::Router;

use crate::middleware::csrf::verify_csrf;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout
/// /auth/me                                         current user
/// /auth/me/discord                                 link/unlink Discord (PUT)
///
/// /admin/users                                     list (admin only)
/// /admin/users/{id}                                update (admin only)
/// /admin/stats                                     counts (admin only)
///
/// /characters                                      list, create
/// /characters/{id}                                 get, update, delete
/// /characters/import/tupperbox                     Tupperbox import (POST)
///
/// /hall-of-fame                                    gallery page (public)
/// /hall-of-fame/random                             random gem (public)
/// /hall-of-fame/stats                              totals (public)
/// /hall-of-fame/characters                         per-character counts (public)
/// /hall-of-fame/export                             text/markdown download (public)
/// /hall-of-fame/{id}                               get (public), delete (admin)
///
/// /prompts, /tropes                                list, create (admin)
/// /prompts/random, /tropes/random                  serve and count
/// /prompts/categories, /tropes/categories          distinct categories
/// /prompts/{id}, /tropes/{id}                      get, update, delete (admin)
/// /prompts/{id}/use, /tropes/{id}/use              count a use (POST)
///
/// /messages/rooms/{room_id}                        read, send (RP tier)
/// ```
///
/// Every state-changing request that carries a session cookie passes the
/// double-submit CSRF check.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/characters", characters::router())
        .nest("/hall-of-fame", hall_of_fame::router())
        .nest("/prompts", prompts::router())
        .nest("/tropes", tropes::router())
        .nest("/messages", messages::router())
        .layer(axum::middleware::from_fn(verify_csrf))
}
