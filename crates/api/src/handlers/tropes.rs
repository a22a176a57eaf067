//! Handlers for `/tropes`. Same shape as `/prompts`.

use axum::extract::State;
use axum::http::StatusCode;
use cyarika_core::prompts::{normalize_category, validate_text, MAX_LABEL_LENGTH, MAX_TEXT_LENGTH};
use cyarika_core::types::DbId;
use cyarika_db::models::trope::{CreateTrope, Trope, UpdateTrope};
use cyarika_db::repositories::TropeRepo;

use crate::extract::{Json, Path, Query};
use crate::error::{not_found, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{CatalogParams, CategoryParams};
use crate::response::DataResponse;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<CatalogParams>,
) -> AppResult<Json<DataResponse<Vec<Trope>>>> {
    let (category, sort) = params.parse()?;
    let data = TropeRepo::list(&state.pool, category.as_deref(), sort).await?;
    Ok(Json(DataResponse { data }))
}

pub async fn categories(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let data = TropeRepo::categories(&state.pool).await?;
    Ok(Json(DataResponse { data }))
}

pub async fn random(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<CategoryParams>,
) -> AppResult<Json<Trope>> {
    let category = params.category();
    let trope = TropeRepo::serve_random(&state.pool, category.as_deref())
        .await?
        .ok_or_else(|| match &category {
            Some(c) => AppError::NotFound(format!("No tropes in category '{c}'")),
            None => AppError::NotFound("No tropes available".into()),
        })?;
    Ok(Json(trope))
}

pub async fn get(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Trope>> {
    let trope = TropeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Trope", id))?;
    Ok(Json(trope))
}

pub async fn record_use(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Trope>> {
    let trope = TropeRepo::record_use(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Trope", id))?;
    Ok(Json(trope))
}

fn validate_fields(
    category: Option<&str>,
    name: Option<&str>,
    description: Option<&str>,
) -> Result<(), cyarika_core::error::CoreError> {
    if let Some(category) = category {
        validate_text("category", category, MAX_LABEL_LENGTH)?;
    }
    if let Some(name) = name {
        validate_text("name", name, MAX_LABEL_LENGTH)?;
    }
    if let Some(description) = description {
        validate_text("description", description, MAX_TEXT_LENGTH)?;
    }
    Ok(())
}

pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTrope>,
) -> AppResult<(StatusCode, Json<Trope>)> {
    validate_fields(
        Some(&input.category),
        Some(&input.name),
        Some(&input.description),
    )?;

    let input = CreateTrope {
        category: normalize_category(&input.category),
        name: input.name.trim().to_string(),
        description: input.description.trim().to_string(),
    };
    let trope = TropeRepo::create(&state.pool, &input).await?;
    tracing::info!(admin_id = admin.id(), trope_id = trope.id, "Trope created");
    Ok((StatusCode::CREATED, Json(trope)))
}

pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTrope>,
) -> AppResult<Json<Trope>> {
    validate_fields(
        input.category.as_deref(),
        input.name.as_deref(),
        input.description.as_deref(),
    )?;

    let input = UpdateTrope {
        category: input.category.as_deref().map(normalize_category),
        name: input.name.map(|n| n.trim().to_string()),
        description: input.description.map(|d| d.trim().to_string()),
    };
    let trope = TropeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Trope", id))?;
    Ok(Json(trope))
}

pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !TropeRepo::delete(&state.pool, id).await? {
        return Err(not_found("Trope", id));
    }
    tracing::info!(admin_id = admin.id(), trope_id = id, "Trope deleted");
    Ok(StatusCode::NO_CONTENT)
}
