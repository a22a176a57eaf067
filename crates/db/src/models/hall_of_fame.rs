//! Hall-of-Fame record model, filters and aggregate views.

use cyarika_core::hall_of_fame::ContextMessage;
use cyarika_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `hall_of_fame` table.
///
/// Discord snowflakes are serialized as strings for JavaScript clients.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HallOfFameMessage {
    pub id: DbId,
    #[serde(with = "snowflake")]
    pub message_id: i64,
    #[serde(with = "snowflake")]
    pub channel_id: i64,
    #[serde(with = "snowflake")]
    pub guild_id: i64,
    #[serde(with = "snowflake")]
    pub author_id: i64,
    pub character_name: Option<String>,
    pub content: String,
    pub star_count: i32,
    pub context_messages: Json<Vec<ContextMessage>>,
    #[serde(with = "snowflake::option")]
    pub hall_message_id: Option<i64>,
    pub added_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Result of an upsert: the current row and whether this call inserted it.
#[derive(Debug, Clone, FromRow)]
pub struct UpsertedHallOfFame {
    #[sqlx(flatten)]
    pub record: HallOfFameMessage,
    pub inserted: bool,
}

/// DTO for the star gate's upsert.
#[derive(Debug, Clone)]
pub struct UpsertHallOfFame {
    pub message_id: i64,
    pub channel_id: i64,
    pub guild_id: i64,
    pub author_id: i64,
    pub character_name: Option<String>,
    pub content: String,
    pub star_count: i32,
    /// Only written on insert; an existing record keeps its captured context.
    pub context_messages: Vec<ContextMessage>,
}

/// Gallery filters. `None` means "no constraint".
#[derive(Debug, Clone, Default)]
pub struct HallOfFameFilter {
    pub character_name: Option<String>,
    pub min_stars: Option<i32>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}

/// Aggregate numbers for the gallery header.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HallOfFameStats {
    pub total_messages: i64,
    pub total_stars: i64,
    pub max_stars: Option<i32>,
    pub distinct_characters: i64,
}

/// A character name and how many records it has.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CharacterCount {
    pub character_name: String,
    pub message_count: i64,
}

mod snowflake {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(id: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id)
    }

    pub mod option {
        use serde::Serializer;

        pub fn serialize<S: Serializer>(id: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
            match id {
                Some(id) => serializer.collect_str(id),
                None => serializer.serialize_none(),
            }
        }
    }
}
