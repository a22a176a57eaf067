//! Handlers for the Hall-of-Fame gallery under `/hall-of-fame`.
//!
//! Reads are public; records are written only by the bot's star gate.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use cyarika_core::error::CoreError;
use cyarika_core::export::{self, ExportEntry, ExportFormat};
use cyarika_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use cyarika_core::types::{DbId, Timestamp};
use cyarika_db::models::hall_of_fame::{
    CharacterCount, HallOfFameFilter, HallOfFameMessage, HallOfFameStats,
};
use cyarika_db::repositories::HallOfFameRepo;
use serde::Deserialize;

use crate::extract::{Json, Path, Query};
use crate::error::{not_found, AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

/// Gallery filters shared by listing and export.
#[derive(Debug, Default, Deserialize)]
pub struct GalleryParams {
    pub character: Option<String>,
    pub min_stars: Option<i32>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Export only.
    pub format: Option<String>,
}

impl GalleryParams {
    fn filter(&self) -> Result<HallOfFameFilter, CoreError> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(CoreError::validation("'from' must not be after 'to'"));
            }
        }
        Ok(HallOfFameFilter {
            character_name: self
                .character
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            min_stars: self.min_stars,
            from: self.from,
            to: self.to,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RandomParams {
    pub min_stars: Option<i32>,
}

/// GET /api/v1/hall-of-fame
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<GalleryParams>,
) -> AppResult<Json<PageResponse<HallOfFameMessage>>> {
    let filter = params.filter()?;
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);

    let (data, total) = tokio::try_join!(
        HallOfFameRepo::list(&state.pool, &filter, limit, offset),
        HallOfFameRepo::count(&state.pool, &filter),
    )?;
    Ok(Json(PageResponse { data, total }))
}

/// GET /api/v1/hall-of-fame/random?min_stars=
pub async fn random(
    State(state): State<AppState>,
    Query(params): Query<RandomParams>,
) -> AppResult<Json<HallOfFameMessage>> {
    let min_stars = params.min_stars.unwrap_or(0);
    let record = HallOfFameRepo::random(&state.pool, min_stars)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No Hall of Fame messages with at least {min_stars} stars"))
        })?;
    Ok(Json(record))
}

/// GET /api/v1/hall-of-fame/stats
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<HallOfFameStats>> {
    Ok(Json(HallOfFameRepo::stats(&state.pool).await?))
}

/// GET /api/v1/hall-of-fame/characters
pub async fn characters(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CharacterCount>>>> {
    let data = HallOfFameRepo::characters(&state.pool).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/hall-of-fame/export?format=text|markdown
///
/// Every matching record, unpaginated, as a downloadable document.
pub async fn export(
    State(state): State<AppState>,
    Query(params): Query<GalleryParams>,
) -> AppResult<impl IntoResponse> {
    let format: ExportFormat = params.format.as_deref().unwrap_or("text").parse()?;
    let filter = params.filter()?;

    let records = HallOfFameRepo::list_all(&state.pool, &filter).await?;
    let entries: Vec<ExportEntry<'_>> = records
        .iter()
        .map(|r| ExportEntry {
            star_count: r.star_count,
            character_name: r.character_name.as_deref(),
            author_id: r.author_id,
            content: &r.content,
            added_at: r.added_at,
        })
        .collect();
    let body = export::render(format, &entries);

    tracing::debug!(records = records.len(), ?format, "Hall of Fame exported");

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"hall-of-fame.{}\"", format.extension()),
            ),
        ],
        body,
    ))
}

/// GET /api/v1/hall-of-fame/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<HallOfFameMessage>> {
    let record = HallOfFameRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("HallOfFameMessage", id))?;
    Ok(Json(record))
}

/// DELETE /api/v1/hall-of-fame/{id} (admin)
///
/// Removes the record only; the mirror post in Discord is left to moderators.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removed = HallOfFameRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("HallOfFameMessage", id))?;
    tracing::info!(
        admin_id = admin.id(),
        record_id = id,
        message_id = removed.message_id,
        "Hall of Fame record deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}
