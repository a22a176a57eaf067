//! Character proxying: a message starting with one of the author's proxy
//! prefixes is reposted through a channel webhook under the character's
//! name and avatar, and the original is deleted.

use cyarika_db::models::character::CharacterSheet;
use cyarika_db::repositories::{CharacterRepo, UserRepo};
use serenity::builder::{CreateWebhook, ExecuteWebhook};
use serenity::client::Context;
use serenity::model::channel::Message;
use serenity::model::webhook::Webhook;
use sqlx::PgPool;

use crate::error::BotError;

pub const WEBHOOK_NAME: &str = "Cyarika Proxy";

/// What to post in place of the original message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyTarget {
    pub character_name: String,
    pub avatar_url: Option<String>,
    pub body: String,
}

/// The first sheet whose prefix starts `content`, with the remaining text.
///
/// `sheets` must be ordered longest prefix first. A prefix with nothing
/// after it does not match.
pub fn match_proxy<'a>(
    content: &'a str,
    sheets: &'a [CharacterSheet],
) -> Option<(&'a CharacterSheet, &'a str)> {
    sheets.iter().find_map(|sheet| {
        let prefix = sheet.proxy_prefix.as_deref().filter(|p| !p.is_empty())?;
        let body = content.strip_prefix(prefix)?.trim();
        (!body.is_empty()).then_some((sheet, body))
    })
}

/// Resolve a message to a proxy target for the linked Discord user.
///
/// Returns `None` for unlinked or inactive users, users without RP access
/// and messages that match no prefix.
pub async fn resolve(
    pool: &PgPool,
    discord_user_id: i64,
    content: &str,
) -> Result<Option<ProxyTarget>, BotError> {
    let Some(user) = UserRepo::find_by_discord_id(pool, discord_user_id).await? else {
        return Ok(None);
    };
    if !user.principal().has_rp_access() {
        return Ok(None);
    }

    let sheets = CharacterRepo::list_proxies_for_discord_user(pool, discord_user_id).await?;
    Ok(match_proxy(content, &sheets).map(|(sheet, body)| ProxyTarget {
        character_name: sheet.name.clone(),
        avatar_url: sheet.avatar_url.clone(),
        body: body.to_string(),
    }))
}

async fn channel_webhook(ctx: &Context, msg: &Message) -> Result<Webhook, BotError> {
    let existing = msg
        .channel_id
        .webhooks(&ctx.http)
        .await?
        .into_iter()
        .find(|w| w.name.as_deref() == Some(WEBHOOK_NAME) && w.token.is_some());

    match existing {
        Some(webhook) => Ok(webhook),
        None => {
            tracing::info!(channel_id = %msg.channel_id, "Creating proxy webhook");
            Ok(msg
                .channel_id
                .create_webhook(&ctx.http, CreateWebhook::new(WEBHOOK_NAME))
                .await?)
        }
    }
}

/// Repost `msg` as `target` and delete the original.
pub async fn relay(ctx: &Context, msg: &Message, target: &ProxyTarget) -> Result<(), BotError> {
    let webhook = channel_webhook(ctx, msg).await?;

    let mut payload = ExecuteWebhook::new()
        .content(&target.body)
        .username(&target.character_name);
    if let Some(avatar_url) = &target.avatar_url {
        payload = payload.avatar_url(avatar_url);
    }
    webhook.execute(&ctx.http, false, payload).await?;

    msg.delete(&ctx.http).await?;
    tracing::debug!(
        message_id = %msg.id,
        character = %target.character_name,
        "Proxied message"
    );
    Ok(())
}
