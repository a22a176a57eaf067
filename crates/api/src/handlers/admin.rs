//! Admin-only handlers: user management and platform counts.

use axum::extract::State;
use cyarika_core::roles::{validate_status, SubscriptionTier};
use cyarika_core::types::DbId;
use cyarika_db::models::hall_of_fame::HallOfFameFilter;
use cyarika_db::models::user::{UpdateUser, UserResponse};
use cyarika_db::repositories::{
    CharacterRepo, HallOfFameRepo, PromptRepo, SessionRepo, TropeRepo, UserRepo,
};
use serde::Serialize;

use crate::extract::{Json, Path};
use crate::error::{not_found, AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Row counts shown on the admin dashboard.
#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub users: i64,
    pub characters: i64,
    pub hall_of_fame: i64,
    pub prompts: i64,
    pub tropes: i64,
}

/// GET /api/v1/admin/users
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.iter().map(|u| u.to_response()).collect(),
    }))
}

/// PUT /api/v1/admin/users/{id}
///
/// Deactivating a user also revokes their sessions.
pub async fn update_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    if let Some(tier) = &input.subscription_tier {
        tier.parse::<SubscriptionTier>()?;
    }
    if let Some(status) = &input.subscription_status {
        validate_status(status)?;
    }
    if id == admin.id() && (input.is_admin == Some(false) || input.is_active == Some(false)) {
        return Err(AppError::BadRequest(
            "Admins cannot demote or deactivate themselves".into(),
        ));
    }

    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("User", id))?;

    if !user.is_active {
        let revoked = SessionRepo::revoke_all_for_user(&state.pool, id).await?;
        tracing::info!(user_id = id, revoked, "Revoked sessions of deactivated user");
    }

    tracing::info!(
        admin_id = admin.id(),
        user_id = id,
        is_admin = user.is_admin,
        tier = %user.subscription_tier,
        status = %user.subscription_status,
        "User updated by admin"
    );
    Ok(Json(user.to_response()))
}

/// GET /api/v1/admin/stats
pub async fn stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<AdminStats>> {
    let pool = &state.pool;
    let everything = HallOfFameFilter::default();
    let (users, characters, hall_of_fame, prompts, tropes) = tokio::try_join!(
        UserRepo::count(pool),
        CharacterRepo::count(pool),
        HallOfFameRepo::count(pool, &everything),
        PromptRepo::count(pool),
        TropeRepo::count(pool),
    )?;

    Ok(Json(AdminStats {
        users,
        characters,
        hall_of_fame,
        prompts,
        tropes,
    }))
}
