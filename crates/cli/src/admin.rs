//! Granting and revoking admin rights.

use anyhow::{anyhow, bail, Context};
use cyarika_api::auth::password::hash_password;
use cyarika_core::accounts::{validate_password, validate_username};
use cyarika_db::models::user::{CreateUser, User};
use cyarika_db::repositories::UserRepo;
use sqlx::PgPool;

/// Set the admin flag on an existing account.
pub async fn set_admin(pool: &PgPool, username: &str, is_admin: bool) -> anyhow::Result<()> {
    let updated = UserRepo::set_admin_by_username(pool, username, is_admin)
        .await
        .context("failed to update user")?;
    if !updated {
        bail!("no user named '{username}'");
    }
    tracing::info!(username, is_admin, "Admin flag updated");
    Ok(())
}

/// Create a new admin account.
pub async fn add_admin(pool: &PgPool, username: &str, password: &str) -> anyhow::Result<User> {
    let username = username.trim();
    validate_username(username)?;
    validate_password(password)?;

    if UserRepo::find_by_username(pool, username).await?.is_some() {
        bail!("user '{username}' already exists; use set-admin to promote it");
    }

    let password_hash =
        hash_password(password).map_err(|e| anyhow!("failed to hash password: {e}"))?;
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash,
            is_admin: true,
        },
    )
    .await
    .context("failed to create user")?;

    tracing::info!(user_id = user.id, username, "Admin account created");
    Ok(user)
}
