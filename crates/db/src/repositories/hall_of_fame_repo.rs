//! Repository for the `hall_of_fame` table.
//!
//! The star gate writes through [`HallOfFameRepo::upsert`] and
//! [`HallOfFameRepo::set_hall_message_id_if_absent`]; both are single
//! statements so concurrent reaction events cannot duplicate a record or
//! its mirror.

use cyarika_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::hall_of_fame::{
    CharacterCount, HallOfFameFilter, HallOfFameMessage, HallOfFameStats, UpsertHallOfFame,
    UpsertedHallOfFame,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, message_id, channel_id, guild_id, author_id, character_name, \
                       content, star_count, context_messages, hall_message_id, added_at, \
                       created_at, updated_at";

/// Filter predicate over `$1..$4`; each bound `NULL` disables its clause.
const FILTER: &str = "($1::TEXT IS NULL OR character_name = $1)
               AND ($2::INTEGER IS NULL OR star_count >= $2)
               AND ($3::TIMESTAMPTZ IS NULL OR added_at >= $3)
               AND ($4::TIMESTAMPTZ IS NULL OR added_at <= $4)";

/// Gallery order. `id` breaks ties so pages never overlap.
const ORDER: &str = "star_count DESC, added_at DESC, id DESC";

/// Provides persistence for immortalized messages.
pub struct HallOfFameRepo;

impl HallOfFameRepo {
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<HallOfFameMessage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM hall_of_fame WHERE id = $1");
        sqlx::query_as::<_, HallOfFameMessage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_message_id(
        pool: &PgPool,
        message_id: i64,
    ) -> Result<Option<HallOfFameMessage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM hall_of_fame WHERE message_id = $1");
        sqlx::query_as::<_, HallOfFameMessage>(&query)
            .bind(message_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a record or refresh the star count of an existing one.
    ///
    /// `inserted` is `true` only for the call that created the row. Content
    /// and context captured on insert are never overwritten.
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertHallOfFame,
    ) -> Result<UpsertedHallOfFame, sqlx::Error> {
        let query = format!(
            "INSERT INTO hall_of_fame
                (message_id, channel_id, guild_id, author_id, character_name, content,
                 star_count, context_messages)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (message_id) DO UPDATE SET
                star_count = EXCLUDED.star_count,
                character_name = COALESCE(hall_of_fame.character_name, EXCLUDED.character_name)
             RETURNING {COLUMNS}, (xmax = 0) AS inserted"
        );
        sqlx::query_as::<_, UpsertedHallOfFame>(&query)
            .bind(input.message_id)
            .bind(input.channel_id)
            .bind(input.guild_id)
            .bind(input.author_id)
            .bind(&input.character_name)
            .bind(&input.content)
            .bind(input.star_count)
            .bind(Json(&input.context_messages))
            .fetch_one(pool)
            .await
    }

    /// Refresh the star count of an existing record.
    ///
    /// Returns `None` when no record exists for `message_id`; unlike
    /// [`Self::upsert`] this never inserts.
    pub async fn update_star_count(
        pool: &PgPool,
        message_id: i64,
        star_count: i32,
        character_name: Option<&str>,
    ) -> Result<Option<HallOfFameMessage>, sqlx::Error> {
        let query = format!(
            "UPDATE hall_of_fame SET
                star_count = $2,
                character_name = COALESCE(character_name, $3)
             WHERE message_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HallOfFameMessage>(&query)
            .bind(message_id)
            .bind(star_count)
            .bind(character_name)
            .fetch_optional(pool)
            .await
    }

    /// Record the mirror post's id unless one is already set.
    ///
    /// Returns `false` when another writer got there first; the caller then
    /// owns a duplicate mirror and should delete it.
    pub async fn set_hall_message_id_if_absent(
        pool: &PgPool,
        message_id: i64,
        hall_message_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE hall_of_fame SET hall_message_id = $2
             WHERE message_id = $1 AND hall_message_id IS NULL",
        )
        .bind(message_id)
        .bind(hall_message_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete by source message, returning the removed row so the caller
    /// can clean up its mirror.
    pub async fn delete_by_message_id(
        pool: &PgPool,
        message_id: i64,
    ) -> Result<Option<HallOfFameMessage>, sqlx::Error> {
        let query = format!("DELETE FROM hall_of_fame WHERE message_id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, HallOfFameMessage>(&query)
            .bind(message_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete by primary key, returning the removed row.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<HallOfFameMessage>, sqlx::Error> {
        let query = format!("DELETE FROM hall_of_fame WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, HallOfFameMessage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of the gallery.
    pub async fn list(
        pool: &PgPool,
        filter: &HallOfFameFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<HallOfFameMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM hall_of_fame
             WHERE {FILTER}
             ORDER BY {ORDER}
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, HallOfFameMessage>(&query)
            .bind(&filter.character_name)
            .bind(filter.min_stars)
            .bind(filter.from)
            .bind(filter.to)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Every record matching `filter`, in gallery order. Used by export.
    pub async fn list_all(
        pool: &PgPool,
        filter: &HallOfFameFilter,
    ) -> Result<Vec<HallOfFameMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM hall_of_fame
             WHERE {FILTER}
             ORDER BY {ORDER}"
        );
        sqlx::query_as::<_, HallOfFameMessage>(&query)
            .bind(&filter.character_name)
            .bind(filter.min_stars)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_all(pool)
            .await
    }

    /// Number of records matching `filter`.
    pub async fn count(pool: &PgPool, filter: &HallOfFameFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM hall_of_fame WHERE {FILTER}");
        sqlx::query_scalar(&query)
            .bind(&filter.character_name)
            .bind(filter.min_stars)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_one(pool)
            .await
    }

    /// A uniformly random record with at least `min_stars` stars.
    pub async fn random(
        pool: &PgPool,
        min_stars: i32,
    ) -> Result<Option<HallOfFameMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM hall_of_fame
             WHERE star_count >= $1
             ORDER BY random()
             LIMIT 1"
        );
        sqlx::query_as::<_, HallOfFameMessage>(&query)
            .bind(min_stars)
            .fetch_optional(pool)
            .await
    }

    pub async fn stats(pool: &PgPool) -> Result<HallOfFameStats, sqlx::Error> {
        sqlx::query_as::<_, HallOfFameStats>(
            "SELECT
                COUNT(*) AS total_messages,
                COALESCE(SUM(star_count), 0)::BIGINT AS total_stars,
                MAX(star_count) AS max_stars,
                COUNT(DISTINCT character_name) AS distinct_characters
             FROM hall_of_fame",
        )
        .fetch_one(pool)
        .await
    }

    /// Distinct character names with their record counts, busiest first.
    pub async fn characters(pool: &PgPool) -> Result<Vec<CharacterCount>, sqlx::Error> {
        sqlx::query_as::<_, CharacterCount>(
            "SELECT character_name, COUNT(*) AS message_count
             FROM hall_of_fame
             WHERE character_name IS NOT NULL
             GROUP BY character_name
             ORDER BY message_count DESC, character_name ASC",
        )
        .fetch_all(pool)
        .await
    }
}
