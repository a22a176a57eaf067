//! Route definitions for the `/messages` Matrix bridge.

use axum::routing::get;
use axum::Router;

use crate::handlers::messages;
use crate::state::AppState;

/// Routes mounted at `/messages`. RP tier required.
///
/// ```text
/// GET  /rooms/{room_id}   -> room_messages
/// POST /rooms/{room_id}   -> send_message
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/rooms/{room_id}",
        get(messages::room_messages).post(messages::send_message),
    )
}
