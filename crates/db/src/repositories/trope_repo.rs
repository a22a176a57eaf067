//! Repository for the `tropes` table.

use cyarika_core::prompts::CatalogSort;
use cyarika_core::types::DbId;
use sqlx::PgPool;

use super::catalog_order;
use crate::models::trope::{CreateTrope, Trope, UpdateTrope};

const COLUMNS: &str = "id, category, name, description, use_count, created_at, updated_at";

/// Provides CRUD and atomic serving for tropes.
pub struct TropeRepo;

impl TropeRepo {
    pub async fn create(pool: &PgPool, input: &CreateTrope) -> Result<Trope, sqlx::Error> {
        let query = format!(
            "INSERT INTO tropes (category, name, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Trope>(&query)
            .bind(&input.category)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Insert unless a trope with the same name exists. Returns `true` if inserted.
    pub async fn insert_if_absent(pool: &PgPool, input: &CreateTrope) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO tropes (category, name, description)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_tropes_name DO NOTHING",
        )
        .bind(&input.category)
        .bind(&input.name)
        .bind(&input.description)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Trope>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tropes WHERE id = $1");
        sqlx::query_as::<_, Trope>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        category: Option<&str>,
        sort: CatalogSort,
    ) -> Result<Vec<Trope>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tropes
             WHERE ($1::TEXT IS NULL OR category = $1)
             ORDER BY {}",
            catalog_order(sort, "name")
        );
        sqlx::query_as::<_, Trope>(&query)
            .bind(category)
            .fetch_all(pool)
            .await
    }

    pub async fn categories(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT DISTINCT category FROM tropes ORDER BY category ASC")
            .fetch_all(pool)
            .await
    }

    /// Pick a random trope and count the use in one statement.
    pub async fn serve_random(
        pool: &PgPool,
        category: Option<&str>,
    ) -> Result<Option<Trope>, sqlx::Error> {
        let query = format!(
            "UPDATE tropes SET use_count = use_count + 1
             WHERE id = (
                SELECT id FROM tropes
                WHERE ($1::TEXT IS NULL OR category = $1)
                ORDER BY random()
                LIMIT 1
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Trope>(&query)
            .bind(category)
            .fetch_optional(pool)
            .await
    }

    pub async fn record_use(pool: &PgPool, id: DbId) -> Result<Option<Trope>, sqlx::Error> {
        let query = format!(
            "UPDATE tropes SET use_count = use_count + 1 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Trope>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTrope,
    ) -> Result<Option<Trope>, sqlx::Error> {
        let query = format!(
            "UPDATE tropes SET
                category = COALESCE($2, category),
                name = COALESCE($3, name),
                description = COALESCE($4, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Trope>(&query)
            .bind(id)
            .bind(&input.category)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tropes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tropes")
            .fetch_one(pool)
            .await
    }
}
