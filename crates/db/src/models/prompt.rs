//! Roleplay prompt model and DTOs.

use cyarika_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `prompts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Prompt {
    pub id: DbId,
    pub category: String,
    pub prompt_text: String,
    pub use_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a prompt.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePrompt {
    pub category: String,
    pub prompt_text: String,
}

/// DTO for updating a prompt. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePrompt {
    pub category: Option<String>,
    pub prompt_text: Option<String>,
}
