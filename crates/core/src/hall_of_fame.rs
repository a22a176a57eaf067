//! Hall-of-Fame star gate policy and mirror rendering.
//!
//! A message enters the Hall of Fame when its star-emoji count reaches the
//! threshold and leaves it again when the count drops below. The record is
//! keyed by the Discord message id, so every decision here is a function of
//! "does a record exist" and "what is the count now", never of event history.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Star count at which a message is immortalized.
pub const DEFAULT_STAR_THRESHOLD: i32 = 10;

/// Reaction emoji counted as a star.
pub const DEFAULT_STAR_EMOJI: &str = "⭐";

/// Discord rejects messages longer than this.
const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Room left in a mirror post for the header and footer lines.
const MIRROR_CONTENT_BUDGET: usize = DISCORD_MESSAGE_LIMIT - 300;

/// One message captured as context for a starred message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMessage {
    pub author: String,
    pub content: String,
    pub timestamp: Timestamp,
}

/// What the gate should do with a message after a reaction change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateAction {
    /// Count reached the threshold and no record exists yet.
    Create,
    /// A record exists and the count is still at or above the threshold.
    Update,
    /// A record exists but the count fell below the threshold.
    Remove,
    /// No record and not enough stars.
    Ignore,
}

/// Decide the gate action for a message.
pub fn decide(has_record: bool, star_count: i32, threshold: i32) -> GateAction {
    let qualifies = star_count >= threshold;
    match (has_record, qualifies) {
        (false, true) => GateAction::Create,
        (true, true) => GateAction::Update,
        (true, false) => GateAction::Remove,
        (false, false) => GateAction::Ignore,
    }
}

/// Validate a configured star threshold.
pub fn validate_threshold(threshold: i32) -> Result<(), CoreError> {
    if threshold < 1 {
        return Err(CoreError::validation(format!(
            "Star threshold must be at least 1, got {threshold}"
        )));
    }
    Ok(())
}

/// Link to a message in the Discord client.
pub fn jump_url(guild_id: i64, channel_id: i64, message_id: i64) -> String {
    format!("https://discord.com/channels/{guild_id}/{channel_id}/{message_id}")
}

/// The fields a mirror post is rendered from.
#[derive(Debug, Clone, Copy)]
pub struct MirrorView<'a> {
    pub star_emoji: &'a str,
    pub star_count: i32,
    pub guild_id: i64,
    pub channel_id: i64,
    pub message_id: i64,
    pub author_id: i64,
    pub character_name: Option<&'a str>,
    pub content: &'a str,
}

/// Render the body of the mirrored Hall-of-Fame post.
///
/// The output always fits in a single Discord message.
pub fn render_mirror(view: &MirrorView<'_>) -> String {
    let speaker = match view.character_name {
        Some(name) => format!("**{name}** (<@{}>)", view.author_id),
        None => format!("<@{}>", view.author_id),
    };

    let quoted: String = truncate_chars(view.content, MIRROR_CONTENT_BUDGET)
        .lines()
        .map(|line| format!("> {line}\n"))
        .collect();

    format!(
        "{emoji} **{count}** | <#{channel}>\n{speaker}\n{quoted}{url}",
        emoji = view.star_emoji,
        count = view.star_count,
        channel = view.channel_id,
        url = jump_url(view.guild_id, view.channel_id, view.message_id),
    )
}

/// Truncate to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
