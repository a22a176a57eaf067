//! Discord-backed implementations of the star gate seams.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cyarika_core::hall_of_fame::ContextMessage;
use serenity::builder::{CreateMessage, EditMessage, GetMessages};
use serenity::http::Http;
use serenity::model::channel::Message;
use serenity::model::id::{ChannelId, MessageId};

use crate::db_id;
use crate::error::BotError;
use crate::star_gate::{ContextSource, HallMirror};

/// Mirrors Hall-of-Fame records into one channel.
pub struct DiscordMirror {
    http: Arc<Http>,
    channel: ChannelId,
}

impl DiscordMirror {
    pub fn new(http: Arc<Http>, hall_channel_id: i64) -> Self {
        Self {
            http,
            channel: ChannelId::new(hall_channel_id as u64),
        }
    }
}

#[async_trait]
impl HallMirror for DiscordMirror {
    async fn post(&self, body: &str) -> Result<i64, BotError> {
        let message = self
            .channel
            .send_message(&self.http, CreateMessage::new().content(body))
            .await?;
        Ok(db_id(message.id.get()))
    }

    async fn edit(&self, hall_message_id: i64, body: &str) -> Result<(), BotError> {
        self.channel
            .edit_message(
                &self.http,
                MessageId::new(hall_message_id as u64),
                EditMessage::new().content(body),
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, hall_message_id: i64) -> Result<(), BotError> {
        self.channel
            .delete_message(&self.http, MessageId::new(hall_message_id as u64))
            .await?;
        Ok(())
    }
}

/// Reads channel history through the REST API.
pub struct DiscordContext {
    http: Arc<Http>,
}

impl DiscordContext {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ContextSource for DiscordContext {
    async fn preceding(
        &self,
        channel_id: i64,
        message_id: i64,
    ) -> Result<Option<ContextMessage>, BotError> {
        let messages = ChannelId::new(channel_id as u64)
            .messages(
                &self.http,
                GetMessages::new()
                    .before(MessageId::new(message_id as u64))
                    .limit(1),
            )
            .await?;
        Ok(messages.first().map(context_message))
    }
}

pub fn context_message(message: &Message) -> ContextMessage {
    ContextMessage {
        author: message.author.name.clone(),
        content: message.content.clone(),
        timestamp: DateTime::from_timestamp(message.timestamp.unix_timestamp(), 0)
            .unwrap_or_else(Utc::now),
    }
}
