//! Gateway event handler: feeds star reactions into the gate, runs prefix
//! commands and proxies character messages.

use std::sync::Arc;

use serenity::all::{
    ChannelId, Context, EventHandler, GatewayIntents, GuildId, Message, MessageId, Reaction,
    ReactionType, Ready,
};
use serenity::async_trait;
use sqlx::PgPool;

use crate::commands::{self, CommandEnv};
use crate::config::BotConfig;
use crate::db_id;
use crate::error::BotError;
use crate::mirror::{DiscordContext, DiscordMirror};
use crate::proxy;
use crate::star_gate::{StarEvent, StarGate};

/// Whether `reaction` is the configured star emoji. Custom emoji match by name.
pub fn is_star(reaction: &ReactionType, star_emoji: &str) -> bool {
    match reaction {
        ReactionType::Unicode(emoji) => emoji == star_emoji,
        ReactionType::Custom { name: Some(name), .. } => {
            name == star_emoji || star_emoji.trim_matches(':') == name
        }
        _ => false,
    }
}

/// Current number of star reactions on `message`.
pub fn count_stars(message: &Message, star_emoji: &str) -> i32 {
    message
        .reactions
        .iter()
        .find(|r| is_star(&r.reaction_type, star_emoji))
        .map(|r| i32::try_from(r.count).unwrap_or(i32::MAX))
        .unwrap_or(0)
}

pub struct Handler {
    pool: PgPool,
    config: Arc<BotConfig>,
}

impl Handler {
    pub fn new(pool: PgPool, config: BotConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }

    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::GUILD_MESSAGE_REACTIONS
            | GatewayIntents::MESSAGE_CONTENT
    }

    fn star_gate(&self, ctx: &Context) -> StarGate {
        StarGate::new(
            self.pool.clone(),
            Arc::new(DiscordMirror::new(
                ctx.http.clone(),
                self.config.hall_channel_id,
            )),
            Arc::new(DiscordContext::new(ctx.http.clone())),
            self.config.star_threshold,
            self.config.star_emoji.clone(),
        )
    }

    fn is_hall_channel(&self, channel_id: ChannelId) -> bool {
        db_id(channel_id.get()) == self.config.hall_channel_id
    }

    async fn on_reaction(&self, ctx: &Context, reaction: &Reaction) -> Result<(), BotError> {
        let Some(guild_id) = reaction.guild_id else {
            return Ok(());
        };
        if self.is_hall_channel(reaction.channel_id)
            || !is_star(&reaction.emoji, &self.config.star_emoji)
        {
            return Ok(());
        }

        let message = reaction.message(&ctx.http).await?;
        self.gate_message(ctx, guild_id, &message).await
    }

    async fn gate_message(
        &self,
        ctx: &Context,
        guild_id: GuildId,
        message: &Message,
    ) -> Result<(), BotError> {
        let event = StarEvent {
            message_id: db_id(message.id.get()),
            channel_id: db_id(message.channel_id.get()),
            guild_id: db_id(guild_id.get()),
            author_id: db_id(message.author.id.get()),
            character_name: message
                .webhook_id
                .map(|_| message.author.name.clone()),
            content: message.content.clone(),
            star_count: count_stars(message, &self.config.star_emoji),
        };

        let outcome = self.star_gate(ctx).process(&event).await?;
        tracing::debug!(message_id = event.message_id, stars = event.star_count, ?outcome, "Star gate");
        Ok(())
    }

    async fn on_message(&self, ctx: &Context, msg: &Message) -> Result<(), BotError> {
        let discord_user_id = db_id(msg.author.id.get());

        if let Some(command) = commands::parse(&self.config.command_prefix, &msg.content) {
            let env = CommandEnv {
                prefix: &self.config.command_prefix,
                star_emoji: &self.config.star_emoji,
                discord_user_id,
            };
            let reply = match commands::execute(&self.pool, env, &command).await {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::error!(?command, error = %e, "Command failed");
                    "Something went wrong, try again later.".to_string()
                }
            };
            msg.channel_id.say(&ctx.http, reply).await?;
            return Ok(());
        }

        if let Some(target) = proxy::resolve(&self.pool, discord_user_id, &msg.content).await? {
            proxy::relay(ctx, msg, &target).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        tracing::info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            "Connected to Discord"
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot || msg.webhook_id.is_some() || msg.guild_id.is_none() {
            return;
        }
        if let Err(e) = self.on_message(&ctx, &msg).await {
            tracing::error!(message_id = %msg.id, error = %e, "Failed to handle message");
        }
    }

    async fn reaction_add(&self, ctx: Context, reaction: Reaction) {
        if let Err(e) = self.on_reaction(&ctx, &reaction).await {
            tracing::error!(message_id = %reaction.message_id, error = %e, "Failed to handle reaction");
        }
    }

    async fn reaction_remove(&self, ctx: Context, reaction: Reaction) {
        if let Err(e) = self.on_reaction(&ctx, &reaction).await {
            tracing::error!(message_id = %reaction.message_id, error = %e, "Failed to handle reaction removal");
        }
    }

    async fn reaction_remove_emoji(&self, ctx: Context, reaction: Reaction) {
        if let Err(e) = self.on_reaction(&ctx, &reaction).await {
            tracing::error!(message_id = %reaction.message_id, error = %e, "Failed to handle emoji removal");
        }
    }

    async fn reaction_remove_all(&self, ctx: Context, channel_id: ChannelId, message_id: MessageId) {
        if self.is_hall_channel(channel_id) {
            return;
        }
        match self.star_gate(&ctx).clear(db_id(message_id.get())).await {
            Ok(outcome) => tracing::debug!(%message_id, ?outcome, "Reactions cleared"),
            Err(e) => tracing::error!(%message_id, error = %e, "Failed to handle cleared reactions"),
        }
    }
}
