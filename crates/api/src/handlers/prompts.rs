//! Handlers for `/prompts`.

use axum::extract::State;
use axum::http::StatusCode;
use cyarika_core::prompts::{normalize_category, validate_text, MAX_LABEL_LENGTH, MAX_TEXT_LENGTH};
use cyarika_core::types::DbId;
use cyarika_db::models::prompt::{CreatePrompt, Prompt, UpdatePrompt};
use cyarika_db::repositories::PromptRepo;

use crate::extract::{Json, Path, Query};
use crate::error::{not_found, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{CatalogParams, CategoryParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/prompts?category=&sort=
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<CatalogParams>,
) -> AppResult<Json<DataResponse<Vec<Prompt>>>> {
    let (category, sort) = params.parse()?;
    let data = PromptRepo::list(&state.pool, category.as_deref(), sort).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/prompts/categories
pub async fn categories(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let data = PromptRepo::categories(&state.pool).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/prompts/random?category=
///
/// Serving counts as a use.
pub async fn random(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<CategoryParams>,
) -> AppResult<Json<Prompt>> {
    let category = params.category();
    let prompt = PromptRepo::serve_random(&state.pool, category.as_deref())
        .await?
        .ok_or_else(|| match &category {
            Some(c) => AppError::NotFound(format!("No prompts in category '{c}'")),
            None => AppError::NotFound("No prompts available".into()),
        })?;
    Ok(Json(prompt))
}

/// GET /api/v1/prompts/{id}
pub async fn get(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Prompt>> {
    let prompt = PromptRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Prompt", id))?;
    Ok(Json(prompt))
}

/// POST /api/v1/prompts/{id}/use
pub async fn record_use(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Prompt>> {
    let prompt = PromptRepo::record_use(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Prompt", id))?;
    Ok(Json(prompt))
}

/// POST /api/v1/prompts (admin)
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreatePrompt>,
) -> AppResult<(StatusCode, Json<Prompt>)> {
    validate_text("category", &input.category, MAX_LABEL_LENGTH)?;
    validate_text("prompt_text", &input.prompt_text, MAX_TEXT_LENGTH)?;

    let input = CreatePrompt {
        category: normalize_category(&input.category),
        prompt_text: input.prompt_text.trim().to_string(),
    };
    let prompt = PromptRepo::create(&state.pool, &input).await?;
    tracing::info!(admin_id = admin.id(), prompt_id = prompt.id, "Prompt created");
    Ok((StatusCode::CREATED, Json(prompt)))
}

/// PUT /api/v1/prompts/{id} (admin)
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePrompt>,
) -> AppResult<Json<Prompt>> {
    if let Some(category) = &input.category {
        validate_text("category", category, MAX_LABEL_LENGTH)?;
    }
    if let Some(text) = &input.prompt_text {
        validate_text("prompt_text", text, MAX_TEXT_LENGTH)?;
    }

    let input = UpdatePrompt {
        category: input.category.as_deref().map(normalize_category),
        prompt_text: input.prompt_text.map(|t| t.trim().to_string()),
    };
    let prompt = PromptRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Prompt", id))?;
    Ok(Json(prompt))
}

/// DELETE /api/v1/prompts/{id} (admin)
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !PromptRepo::delete(&state.pool, id).await? {
        return Err(not_found("Prompt", id));
    }
    tracing::info!(admin_id = admin.id(), prompt_id = id, "Prompt deleted");
    Ok(StatusCode::NO_CONTENT)
}
