//! Repository for the `character_sheets` table.

use cyarika_core::types::DbId;
use sqlx::PgPool;

use crate::models::character::{CharacterSheet, CreateCharacterSheet, UpdateCharacterSheet};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, strength, dexterity, constitution, intelligence, \
                       wisdom, charisma, hp_current, hp_max, armor_class, fortitude_save, \
                       reflex_save, will_save, skills, feats, abilities, pathcompanion_id, \
                       proxy_prefix, avatar_url, created_at, updated_at";

/// Provides CRUD operations for character sheets.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a sheet owned by `user_id`. Omitted fields take the column defaults.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateCharacterSheet,
    ) -> Result<CharacterSheet, sqlx::Error> {
        Self::insert_inner(pool, user_id, input).await
    }

    /// Insert several sheets for one user in a single transaction.
    ///
    /// Either every sheet is created or none is.
    pub async fn create_many(
        pool: &PgPool,
        user_id: DbId,
        inputs: &[CreateCharacterSheet],
    ) -> Result<Vec<CharacterSheet>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let mut sheets = Vec::with_capacity(inputs.len());
        for input in inputs {
            sheets.push(Self::insert_inner(&mut *tx, user_id, input).await?);
        }

        tx.commit().await?;
        Ok(sheets)
    }

    async fn insert_inner<'e, E>(
        executor: E,
        user_id: DbId,
        input: &CreateCharacterSheet,
    ) -> Result<CharacterSheet, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO character_sheets
                (user_id, name, strength, dexterity, constitution, intelligence, wisdom,
                 charisma, hp_current, hp_max, armor_class, fortitude_save, reflex_save,
                 will_save, skills, feats, abilities, pathcompanion_id, proxy_prefix, avatar_url)
             VALUES ($1, $2,
                 COALESCE($3, 10), COALESCE($4, 10), COALESCE($5, 10),
                 COALESCE($6, 10), COALESCE($7, 10), COALESCE($8, 10),
                 COALESCE($9, 0), COALESCE($10, 0), COALESCE($11, 10),
                 COALESCE($12, 0), COALESCE($13, 0), COALESCE($14, 0),
                 COALESCE($15, '{{}}'::jsonb), COALESCE($16, '[]'::jsonb), COALESCE($17, '[]'::jsonb),
                 $18, $19, $20)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CharacterSheet>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(input.strength)
            .bind(input.dexterity)
            .bind(input.constitution)
            .bind(input.intelligence)
            .bind(input.wisdom)
            .bind(input.charisma)
            .bind(input.hp_current)
            .bind(input.hp_max)
            .bind(input.armor_class)
            .bind(input.fortitude_save)
            .bind(input.reflex_save)
            .bind(input.will_save)
            .bind(&input.skills)
            .bind(&input.feats)
            .bind(&input.abilities)
            .bind(&input.pathcompanion_id)
            .bind(&input.proxy_prefix)
            .bind(&input.avatar_url)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CharacterSheet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM character_sheets WHERE id = $1");
        sqlx::query_as::<_, CharacterSheet>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's sheets alphabetically.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<CharacterSheet>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM character_sheets WHERE user_id = $1 ORDER BY name ASC, id ASC"
        );
        sqlx::query_as::<_, CharacterSheet>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List every sheet (admin view).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<CharacterSheet>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM character_sheets ORDER BY user_id ASC, name ASC, id ASC");
        sqlx::query_as::<_, CharacterSheet>(&query)
            .fetch_all(pool)
            .await
    }

    /// Names of a user's sheets, used to de-duplicate imports.
    pub async fn list_names_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT name FROM character_sheets WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Case-insensitive lookup of one of a user's sheets by name.
    pub async fn find_by_user_and_name(
        pool: &PgPool,
        user_id: DbId,
        name: &str,
    ) -> Result<Option<CharacterSheet>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM character_sheets
             WHERE user_id = $1 AND lower(name) = lower($2)
             ORDER BY id ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, CharacterSheet>(&query)
            .bind(user_id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Sheets with a proxy prefix belonging to the active user linked to
    /// `discord_id`. Longest prefix first so the most specific match wins.
    pub async fn list_proxies_for_discord_user(
        pool: &PgPool,
        discord_id: i64,
    ) -> Result<Vec<CharacterSheet>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM character_sheets
             WHERE user_id = (SELECT id FROM users WHERE discord_id = $1 AND is_active = true)
               AND proxy_prefix IS NOT NULL
               AND proxy_prefix <> ''
             ORDER BY length(proxy_prefix) DESC, id ASC"
        );
        sqlx::query_as::<_, CharacterSheet>(&query)
            .bind(discord_id)
            .fetch_all(pool)
            .await
    }

    /// Update a sheet. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCharacterSheet,
    ) -> Result<Option<CharacterSheet>, sqlx::Error> {
        let query = format!(
            "UPDATE character_sheets SET
                name = COALESCE($2, name),
                strength = COALESCE($3, strength),
                dexterity = COALESCE($4, dexterity),
                constitution = COALESCE($5, constitution),
                intelligence = COALESCE($6, intelligence),
                wisdom = COALESCE($7, wisdom),
                charisma = COALESCE($8, charisma),
                hp_current = COALESCE($9, hp_current),
                hp_max = COALESCE($10, hp_max),
                armor_class = COALESCE($11, armor_class),
                fortitude_save = COALESCE($12, fortitude_save),
                reflex_save = COALESCE($13, reflex_save),
                will_save = COALESCE($14, will_save),
                skills = COALESCE($15, skills),
                feats = COALESCE($16, feats),
                abilities = COALESCE($17, abilities),
                pathcompanion_id = COALESCE($18, pathcompanion_id),
                proxy_prefix = COALESCE($19, proxy_prefix),
                avatar_url = COALESCE($20, avatar_url)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CharacterSheet>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.strength)
            .bind(input.dexterity)
            .bind(input.constitution)
            .bind(input.intelligence)
            .bind(input.wisdom)
            .bind(input.charisma)
            .bind(input.hp_current)
            .bind(input.hp_max)
            .bind(input.armor_class)
            .bind(input.fortitude_save)
            .bind(input.reflex_save)
            .bind(input.will_save)
            .bind(&input.skills)
            .bind(&input.feats)
            .bind(&input.abilities)
            .bind(&input.pathcompanion_id)
            .bind(&input.proxy_prefix)
            .bind(&input.avatar_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete a sheet by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM character_sheets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM character_sheets")
            .fetch_one(pool)
            .await
    }
}
