//! The Hall-of-Fame star gate.
//!
//! Every reaction change on a message ends up here as a [`StarEvent`]
//! carrying the current star count. The gate compares that count with the
//! threshold and the stored record, then writes the record and keeps the
//! mirror post in the Hall channel in step.
//!
//! The database is the source of truth. Mirror calls are best effort: a
//! failed post, edit or delete is logged and the record update stands.

use std::sync::Arc;

use async_trait::async_trait;
use cyarika_core::hall_of_fame::{decide, render_mirror, ContextMessage, GateAction, MirrorView};
use cyarika_core::types::DbId;
use cyarika_db::models::hall_of_fame::{HallOfFameMessage, UpsertHallOfFame};
use cyarika_db::repositories::HallOfFameRepo;
use sqlx::PgPool;

use crate::error::BotError;

/// Posts, edits and deletes mirror messages in the Hall channel.
#[async_trait]
pub trait HallMirror: Send + Sync {
    /// Post a new mirror and return its message id.
    async fn post(&self, body: &str) -> Result<i64, BotError>;
    async fn edit(&self, hall_message_id: i64, body: &str) -> Result<(), BotError>;
    async fn delete(&self, hall_message_id: i64) -> Result<(), BotError>;
}

/// Supplies the message that preceded a starred one.
#[async_trait]
pub trait ContextSource: Send + Sync {
    async fn preceding(
        &self,
        channel_id: i64,
        message_id: i64,
    ) -> Result<Option<ContextMessage>, BotError>;
}

/// A starred message and its current star count.
#[derive(Debug, Clone)]
pub struct StarEvent {
    pub message_id: i64,
    pub channel_id: i64,
    pub guild_id: i64,
    pub author_id: i64,
    /// Webhook display name when the message was proxied.
    pub character_name: Option<String>,
    pub content: String,
    pub star_count: i32,
}

impl StarEvent {
    fn to_upsert(&self, context_messages: Vec<ContextMessage>) -> UpsertHallOfFame {
        UpsertHallOfFame {
            message_id: self.message_id,
            channel_id: self.channel_id,
            guild_id: self.guild_id,
            author_id: self.author_id,
            character_name: self.character_name.clone(),
            content: self.content.clone(),
            star_count: self.star_count,
            context_messages,
        }
    }
}

/// What the gate did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Ignored,
    Created { record_id: DbId },
    Updated { record_id: DbId },
    Removed { record_id: DbId },
}

pub struct StarGate {
    pool: PgPool,
    mirror: Arc<dyn HallMirror>,
    context: Arc<dyn ContextSource>,
    threshold: i32,
    star_emoji: String,
}

impl StarGate {
    pub fn new(
        pool: PgPool,
        mirror: Arc<dyn HallMirror>,
        context: Arc<dyn ContextSource>,
        threshold: i32,
        star_emoji: impl Into<String>,
    ) -> Self {
        Self {
            pool,
            mirror,
            context,
            threshold,
            star_emoji: star_emoji.into(),
        }
    }

    /// Apply one event. Only database failures are returned.
    pub async fn process(&self, event: &StarEvent) -> Result<GateOutcome, BotError> {
        let existing = HallOfFameRepo::find_by_message_id(&self.pool, event.message_id).await?;

        match (decide(existing.is_some(), event.star_count, self.threshold), existing) {
            (GateAction::Ignore, _) => Ok(GateOutcome::Ignored),
            (GateAction::Create, _) => self.create(event).await,
            (GateAction::Update, Some(existing)) => self.update(event, &existing).await,
            (GateAction::Remove, _) => self.remove(event.message_id, event.star_count).await,
            // decide() only answers Update when a record exists.
            (GateAction::Update, None) => self.create(event).await,
        }
    }

    /// Drop a message from the Hall regardless of threshold, e.g. after all
    /// of its reactions were cleared.
    pub async fn clear(&self, message_id: i64) -> Result<GateOutcome, BotError> {
        self.remove(message_id, 0).await
    }

    async fn capture_context(&self, event: &StarEvent) -> Vec<ContextMessage> {
        match self
            .context
            .preceding(event.channel_id, event.message_id)
            .await
        {
            Ok(message) => message.into_iter().collect(),
            Err(e) => {
                tracing::warn!(message_id = event.message_id, error = %e, "Could not capture context");
                Vec::new()
            }
        }
    }

    async fn create(&self, event: &StarEvent) -> Result<GateOutcome, BotError> {
        let context = self.capture_context(event).await;
        let upserted = HallOfFameRepo::upsert(&self.pool, &event.to_upsert(context)).await?;
        let record = upserted.record;

        if upserted.inserted {
            tracing::info!(
                record_id = record.id,
                message_id = record.message_id,
                stars = record.star_count,
                "Message entered the Hall of Fame"
            );
            self.post_mirror(&record).await;
            return Ok(GateOutcome::Created {
                record_id: record.id,
            });
        }

        // A concurrent event inserted the row; its caller owns the mirror.
        if let Some(hall_message_id) = record.hall_message_id {
            self.edit_mirror(&record, hall_message_id).await;
        }
        Ok(GateOutcome::Updated {
            record_id: record.id,
        })
    }

    async fn update(
        &self,
        event: &StarEvent,
        existing: &HallOfFameMessage,
    ) -> Result<GateOutcome, BotError> {
        let Some(record) = HallOfFameRepo::update_star_count(
            &self.pool,
            event.message_id,
            event.star_count,
            event.character_name.as_deref(),
        )
        .await?
        else {
            // Removed between the lookup and the update.
            return self.create(event).await;
        };

        match record.hall_message_id {
            Some(hall_message_id) if record.star_count != existing.star_count => {
                self.edit_mirror(&record, hall_message_id).await;
            }
            Some(_) => {}
            // An earlier post failed; try again.
            None => self.post_mirror(&record).await,
        }

        tracing::debug!(record_id = record.id, stars = record.star_count, "Hall of Fame count updated");
        Ok(GateOutcome::Updated {
            record_id: record.id,
        })
    }

    async fn remove(&self, message_id: i64, star_count: i32) -> Result<GateOutcome, BotError> {
        let Some(record) = HallOfFameRepo::delete_by_message_id(&self.pool, message_id).await?
        else {
            return Ok(GateOutcome::Ignored);
        };

        if let Some(hall_message_id) = record.hall_message_id {
            if let Err(e) = self.mirror.delete(hall_message_id).await {
                tracing::error!(
                    record_id = record.id,
                    hall_message_id,
                    error = %e,
                    "Failed to delete Hall of Fame mirror"
                );
            }
        }

        tracing::info!(
            record_id = record.id,
            message_id = record.message_id,
            stars = star_count,
            "Message left the Hall of Fame"
        );
        Ok(GateOutcome::Removed {
            record_id: record.id,
        })
    }

    fn render(&self, record: &HallOfFameMessage) -> String {
        render_mirror(&MirrorView {
            star_emoji: &self.star_emoji,
            star_count: record.star_count,
            guild_id: record.guild_id,
            channel_id: record.channel_id,
            message_id: record.message_id,
            author_id: record.author_id,
            character_name: record.character_name.as_deref(),
            content: &record.content,
        })
    }

    async fn post_mirror(&self, record: &HallOfFameMessage) {
        let hall_message_id = match self.mirror.post(&self.render(record)).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(record_id = record.id, error = %e, "Failed to post Hall of Fame mirror");
                return;
            }
        };

        match HallOfFameRepo::set_hall_message_id_if_absent(
            &self.pool,
            record.message_id,
            hall_message_id,
        )
        .await
        {
            Ok(true) => {}
            Ok(false) => {
                // Another mirror is already recorded, or the record is gone.
                tracing::warn!(record_id = record.id, hall_message_id, "Discarding duplicate mirror");
                if let Err(e) = self.mirror.delete(hall_message_id).await {
                    tracing::error!(hall_message_id, error = %e, "Failed to delete duplicate mirror");
                }
            }
            Err(e) => {
                tracing::error!(
                    record_id = record.id,
                    hall_message_id,
                    error = %e,
                    "Failed to record Hall of Fame mirror id"
                );
            }
        }
    }

    async fn edit_mirror(&self, record: &HallOfFameMessage, hall_message_id: i64) {
        if let Err(e) = self.mirror.edit(hall_message_id, &self.render(record)).await {
            tracing::error!(
                record_id = record.id,
                hall_message_id,
                error = %e,
                "Failed to edit Hall of Fame mirror"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use assert_matches::assert_matches;

    #[derive(Default)]
    struct RecordingMirror {
        posts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl HallMirror for RecordingMirror {
        async fn post(&self, body: &str) -> Result<i64, BotError> {
            let mut posts = self.posts.lock().unwrap();
            posts.push(body.to_string());
            Ok(7_000 + posts.len() as i64)
        }

        async fn edit(&self, _hall_message_id: i64, _body: &str) -> Result<(), BotError> {
            Ok(())
        }

        async fn delete(&self, _hall_message_id: i64) -> Result<(), BotError> {
            Ok(())
        }
    }

    struct LineBefore;

    #[async_trait]
    impl ContextSource for LineBefore {
        async fn preceding(
            &self,
            _channel_id: i64,
            _message_id: i64,
        ) -> Result<Option<ContextMessage>, BotError> {
            Ok(Some(ContextMessage {
                author: "rook".into(),
                content: "the tavern door creaks".into(),
                timestamp: chrono::Utc::now(),
            }))
        }
    }

    fn event(stars: i32) -> StarEvent {
        StarEvent {
            message_id: 811,
            channel_id: 20,
            guild_id: 10,
            author_id: 42,
            character_name: None,
            content: "and that is how the goat became mayor".into(),
            star_count: stars,
        }
    }

    #[sqlx::test(migrations = "../../db/migrations")]
    async fn update_of_vanished_record_recreates_it_with_context(pool: PgPool) {
        let mirror = Arc::new(RecordingMirror::default());
        let gate = StarGate::new(pool.clone(), mirror.clone(), Arc::new(LineBefore), 3, "⭐");

        assert_matches!(gate.process(&event(3)).await, Ok(GateOutcome::Created { .. }));
        let stale = HallOfFameRepo::find_by_message_id(&pool, 811)
            .await
            .unwrap()
            .unwrap();

        // Another event removes the record after this one looked it up.
        HallOfFameRepo::delete_by_message_id(&pool, 811).await.unwrap();

        let outcome = gate.update(&event(4), &stale).await.unwrap();
        assert_matches!(outcome, GateOutcome::Created { .. });

        let record = HallOfFameRepo::find_by_message_id(&pool, 811)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.star_count, 4);
        assert_eq!(record.context_messages.0.len(), 1);
        assert_eq!(record.context_messages.0[0].author, "rook");
        assert_eq!(mirror.posts.lock().unwrap().len(), 2);
    }
}
