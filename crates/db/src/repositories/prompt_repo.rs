//! Repository for the `prompts` table.

use cyarika_core::prompts::CatalogSort;
use cyarika_core::types::DbId;
use sqlx::PgPool;

use super::catalog_order;
use crate::models::prompt::{CreatePrompt, Prompt, UpdatePrompt};

const COLUMNS: &str = "id, category, prompt_text, use_count, created_at, updated_at";

/// Provides CRUD and atomic serving for prompts.
pub struct PromptRepo;

impl PromptRepo {
    pub async fn create(pool: &PgPool, input: &CreatePrompt) -> Result<Prompt, sqlx::Error> {
        let query = format!(
            "INSERT INTO prompts (category, prompt_text)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Prompt>(&query)
            .bind(&input.category)
            .bind(&input.prompt_text)
            .fetch_one(pool)
            .await
    }

    /// Insert unless a prompt with the same text exists. Returns `true` if inserted.
    pub async fn insert_if_absent(pool: &PgPool, input: &CreatePrompt) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO prompts (category, prompt_text)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_prompts_prompt_text DO NOTHING",
        )
        .bind(&input.category)
        .bind(&input.prompt_text)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Prompt>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM prompts WHERE id = $1");
        sqlx::query_as::<_, Prompt>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List prompts, optionally restricted to one category.
    pub async fn list(
        pool: &PgPool,
        category: Option<&str>,
        sort: CatalogSort,
    ) -> Result<Vec<Prompt>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM prompts
             WHERE ($1::TEXT IS NULL OR category = $1)
             ORDER BY {}",
            catalog_order(sort, "prompt_text")
        );
        sqlx::query_as::<_, Prompt>(&query)
            .bind(category)
            .fetch_all(pool)
            .await
    }

    /// Distinct categories, alphabetically.
    pub async fn categories(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT DISTINCT category FROM prompts ORDER BY category ASC")
            .fetch_all(pool)
            .await
    }

    /// Pick a random prompt and count the use in one statement.
    ///
    /// Returns `None` when no prompt matches `category`.
    pub async fn serve_random(
        pool: &PgPool,
        category: Option<&str>,
    ) -> Result<Option<Prompt>, sqlx::Error> {
        let query = format!(
            "UPDATE prompts SET use_count = use_count + 1
             WHERE id = (
                SELECT id FROM prompts
                WHERE ($1::TEXT IS NULL OR category = $1)
                ORDER BY random()
                LIMIT 1
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Prompt>(&query)
            .bind(category)
            .fetch_optional(pool)
            .await
    }

    /// Count one use of a specific prompt.
    pub async fn record_use(pool: &PgPool, id: DbId) -> Result<Option<Prompt>, sqlx::Error> {
        let query = format!(
            "UPDATE prompts SET use_count = use_count + 1 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Prompt>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a prompt. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePrompt,
    ) -> Result<Option<Prompt>, sqlx::Error> {
        let query = format!(
            "UPDATE prompts SET
                category = COALESCE($2, category),
                prompt_text = COALESCE($3, prompt_text)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Prompt>(&query)
            .bind(id)
            .bind(&input.category)
            .bind(&input.prompt_text)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM prompts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM prompts")
            .fetch_one(pool)
            .await
    }
}
