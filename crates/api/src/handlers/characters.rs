//! Handlers for `/characters`: owner-scoped character sheet CRUD and
//! Tupperbox import.

use axum::extract::State;
use axum::http::StatusCode;
use cyarika_core::character_sheet::{
    validate_name, validate_proxy_prefix, validate_score, validate_skills, validate_string_list,
    AbilityModifiers,
};
use cyarika_core::error::CoreError;
use cyarika_core::tupperbox::{parse_export, plan_import};
use cyarika_core::types::DbId;
use cyarika_db::models::character::{CharacterSheet, CreateCharacterSheet, UpdateCharacterSheet};
use cyarika_db::repositories::CharacterRepo;
use serde::Serialize;

use crate::extract::{Json, Path};
use crate::error::{not_found, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A sheet plus its derived ability modifiers.
#[derive(Debug, Serialize)]
pub struct CharacterResponse {
    #[serde(flatten)]
    pub sheet: CharacterSheet,
    pub modifiers: AbilityModifiers,
}

impl From<CharacterSheet> for CharacterResponse {
    fn from(sheet: CharacterSheet) -> Self {
        let modifiers = sheet.ability_scores().modifiers();
        Self { sheet, modifiers }
    }
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub created: usize,
    pub skipped: Vec<String>,
    pub characters: Vec<CharacterResponse>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

struct SheetFields<'a> {
    scores: [(&'static str, Option<i32>); 6],
    proxy_prefix: Option<&'a str>,
    skills: Option<&'a serde_json::Value>,
    feats: Option<&'a serde_json::Value>,
    abilities: Option<&'a serde_json::Value>,
}

fn validate_fields(fields: &SheetFields<'_>) -> Result<(), CoreError> {
    for (name, score) in fields.scores {
        if let Some(score) = score {
            validate_score(name, score)?;
        }
    }
    if let Some(prefix) = fields.proxy_prefix {
        validate_proxy_prefix(prefix)?;
    }
    if let Some(skills) = fields.skills {
        validate_skills(skills)?;
    }
    if let Some(feats) = fields.feats {
        validate_string_list("feats", feats)?;
    }
    if let Some(abilities) = fields.abilities {
        validate_string_list("abilities", abilities)?;
    }
    Ok(())
}

fn validate_create(input: &CreateCharacterSheet) -> Result<(), CoreError> {
    validate_name(&input.name)?;
    validate_fields(&SheetFields {
        scores: [
            ("strength", input.strength),
            ("dexterity", input.dexterity),
            ("constitution", input.constitution),
            ("intelligence", input.intelligence),
            ("wisdom", input.wisdom),
            ("charisma", input.charisma),
        ],
        proxy_prefix: input.proxy_prefix.as_deref(),
        skills: input.skills.as_ref(),
        feats: input.feats.as_ref(),
        abilities: input.abilities.as_ref(),
    })
}

fn validate_update(input: &UpdateCharacterSheet) -> Result<(), CoreError> {
    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    validate_fields(&SheetFields {
        scores: [
            ("strength", input.strength),
            ("dexterity", input.dexterity),
            ("constitution", input.constitution),
            ("intelligence", input.intelligence),
            ("wisdom", input.wisdom),
            ("charisma", input.charisma),
        ],
        proxy_prefix: input.proxy_prefix.as_deref(),
        skills: input.skills.as_ref(),
        feats: input.feats.as_ref(),
        abilities: input.abilities.as_ref(),
    })
}

/// Load a sheet the caller may access. Sheets owned by someone else are
/// reported as missing.
async fn find_accessible(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<CharacterSheet> {
    CharacterRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|sheet| user.principal().can_access(sheet.user_id))
        .ok_or_else(|| not_found("Character", id))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/characters
///
/// The caller's sheets; admins see every sheet.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<CharacterResponse>>>> {
    let sheets = if user.principal().is_admin {
        CharacterRepo::list_all(&state.pool).await?
    } else {
        CharacterRepo::list_for_user(&state.pool, user.id()).await?
    };
    Ok(Json(DataResponse {
        data: sheets.into_iter().map(CharacterResponse::from).collect(),
    }))
}

/// POST /api/v1/characters
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(mut input): Json<CreateCharacterSheet>,
) -> AppResult<(StatusCode, Json<CharacterResponse>)> {
    input.name = input.name.trim().to_string();
    validate_create(&input)?;

    let sheet = CharacterRepo::create(&state.pool, user.id(), &input).await?;
    tracing::info!(user_id = user.id(), character_id = sheet.id, "Character created");
    Ok((StatusCode::CREATED, Json(sheet.into())))
}

/// GET /api/v1/characters/{id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<CharacterResponse>> {
    let sheet = find_accessible(&state, &user, id).await?;
    Ok(Json(sheet.into()))
}

/// PUT /api/v1/characters/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateCharacterSheet>,
) -> AppResult<Json<CharacterResponse>> {
    input.name = input.name.map(|n| n.trim().to_string());
    validate_update(&input)?;
    find_accessible(&state, &user, id).await?;

    let sheet = CharacterRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Character", id))?;
    Ok(Json(sheet.into()))
}

/// DELETE /api/v1/characters/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_accessible(&state, &user, id).await?;
    if !CharacterRepo::delete(&state.pool, id).await? {
        return Err(not_found("Character", id));
    }
    tracing::info!(user_id = user.id(), character_id = id, "Character deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/characters/import/tupperbox
///
/// One sheet per tupper with default scores and the first bracket prefix as
/// proxy prefix. Names the caller already uses are skipped.
pub async fn import_tupperbox(
    State(state): State<AppState>,
    user: AuthUser,
    Json(document): Json<serde_json::Value>,
) -> AppResult<(StatusCode, Json<ImportResponse>)> {
    let export = parse_export(document)?;
    let existing = CharacterRepo::list_names_for_user(&state.pool, user.id()).await?;
    let plan = plan_import(&export, &existing);

    let inputs: Vec<CreateCharacterSheet> = plan
        .to_create
        .iter()
        .map(|tupper| CreateCharacterSheet {
            name: tupper.name.trim().to_string(),
            proxy_prefix: tupper.proxy_prefix().map(str::to_string),
            avatar_url: tupper.avatar_url.clone(),
            ..Default::default()
        })
        .collect();
    let characters: Vec<CharacterResponse> =
        CharacterRepo::create_many(&state.pool, user.id(), &inputs)
            .await?
            .into_iter()
            .map(CharacterResponse::from)
            .collect();

    tracing::info!(
        user_id = user.id(),
        created = characters.len(),
        skipped = plan.skipped.len(),
        "Tupperbox import finished"
    );

    Ok((
        StatusCode::CREATED,
        Json(ImportResponse {
            created: characters.len(),
            skipped: plan.skipped,
            characters,
        }),
    ))
}
