//! Trope model and DTOs.

use cyarika_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tropes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Trope {
    pub id: DbId,
    pub category: String,
    pub name: String,
    pub description: String,
    pub use_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a trope.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTrope {
    pub category: String,
    pub name: String,
    pub description: String,
}

/// DTO for updating a trope. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTrope {
    pub category: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}
