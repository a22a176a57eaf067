//! User entity model and DTOs.

use cyarika_core::roles::{Principal, SubscriptionTier};
use cyarika_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    pub discord_id: Option<i64>,
    pub is_admin: bool,
    pub subscription_tier: String,
    pub subscription_status: String,
    pub is_active: bool,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Tier after accounting for a lapsed subscription.
    pub fn effective_tier(&self) -> SubscriptionTier {
        SubscriptionTier::effective(&self.subscription_tier, &self.subscription_status)
    }

    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            is_admin: self.is_admin,
            subscription_tier: self.effective_tier(),
        }
    }

    pub fn to_response(&self) -> UserResponse {
        UserResponse {
            id: self.id,
            username: self.username.clone(),
            discord_id: self.discord_id.map(|id| id.to_string()),
            is_admin: self.is_admin,
            subscription_tier: self.subscription_tier.clone(),
            subscription_status: self.subscription_status.clone(),
            effective_tier: self.effective_tier(),
            is_active: self.is_active,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
        }
    }
}

/// Safe user representation for API responses (no password hash).
///
/// Discord snowflakes are rendered as strings; they exceed JavaScript's
/// safe integer range.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub discord_id: Option<String>,
    pub is_admin: bool,
    pub subscription_tier: String,
    pub subscription_status: String,
    pub effective_tier: SubscriptionTier,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
}

/// DTO for an admin update of a user. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    pub is_admin: Option<bool>,
    pub subscription_tier: Option<String>,
    pub subscription_status: Option<String>,
    pub is_active: Option<bool>,
}
