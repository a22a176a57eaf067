//! Handlers for `/messages`: the Matrix bridge, RP tier only.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use cyarika_core::error::CoreError;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::extract::{Json, Path, Query};
use crate::error::{AppError, AppResult};
use crate::matrix::{ClientRegistry, MatrixError, RoomMessage};
use crate::middleware::rbac::RequireRpTier;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_MESSAGE_LIMIT: u32 = 50;
const MAX_MESSAGE_LIMIT: u32 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct RoomMessagesParams {
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 4000))]
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct SentMessage {
    pub event_id: String,
}

fn registry(state: &AppState) -> Result<&Arc<ClientRegistry>, AppError> {
    state.matrix.as_ref().ok_or_else(|| {
        AppError::Core(CoreError::Unavailable(
            "Messaging is not configured on this server".into(),
        ))
    })
}

/// Homeserver refusals keep their meaning; anything else is an outage.
fn map_matrix_error(err: MatrixError) -> AppError {
    match err {
        MatrixError::Status { status, body } if status == reqwest::StatusCode::FORBIDDEN => {
            tracing::debug!(%body, "Homeserver refused room access");
            AppError::Core(CoreError::forbidden("Not allowed in this room"))
        }
        MatrixError::Status { status, .. } if status == reqwest::StatusCode::NOT_FOUND => {
            AppError::BadRequest("Unknown room".into())
        }
        other => AppError::ServiceUnavailable(other.to_string()),
    }
}

/// GET /api/v1/messages/rooms/{room_id}?limit=
pub async fn room_messages(
    RequireRpTier(user): RequireRpTier,
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Query(params): Query<RoomMessagesParams>,
) -> AppResult<Json<DataResponse<Vec<RoomMessage>>>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_MESSAGE_LIMIT)
        .clamp(1, MAX_MESSAGE_LIMIT);

    let client = registry(&state)?
        .client_for(user.id())
        .await
        .map_err(map_matrix_error)?;
    let data = client
        .room_messages(&room_id, limit)
        .await
        .map_err(map_matrix_error)?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/messages/rooms/{room_id}
pub async fn send_message(
    RequireRpTier(user): RequireRpTier,
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(input): Json<SendMessageRequest>,
) -> AppResult<(StatusCode, Json<SentMessage>)> {
    input.validate()?;

    let client = registry(&state)?
        .client_for(user.id())
        .await
        .map_err(map_matrix_error)?;
    let event_id = client
        .send_text(&room_id, &input.body)
        .await
        .map_err(map_matrix_error)?;

    tracing::info!(user_id = user.id(), %room_id, %event_id, "Message sent to Matrix room");
    Ok((StatusCode::CREATED, Json(SentMessage { event_id })))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn forbidden_status_maps_to_forbidden() {
        let err = map_matrix_error(MatrixError::Status {
            status: reqwest::StatusCode::FORBIDDEN,
            body: String::new(),
        });
        assert_matches!(err, AppError::Core(CoreError::Forbidden(_)));
    }

    #[test]
    fn not_found_status_maps_to_bad_request() {
        let err = map_matrix_error(MatrixError::Status {
            status: reqwest::StatusCode::NOT_FOUND,
            body: String::new(),
        });
        assert_matches!(err, AppError::BadRequest(_));
    }

    #[test]
    fn server_errors_map_to_unavailable() {
        let err = map_matrix_error(MatrixError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: "upstream".into(),
        });
        assert_matches!(err, AppError::ServiceUnavailable(_));
    }
}
