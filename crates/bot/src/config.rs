use cyarika_core::accounts::parse_snowflake;
use cyarika_core::hall_of_fame::{validate_threshold, DEFAULT_STAR_EMOJI, DEFAULT_STAR_THRESHOLD};

use crate::error::BotError;

pub const DEFAULT_COMMAND_PREFIX: &str = "!";

/// Bot configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    /// Channel the Hall-of-Fame mirrors are posted to.
    pub hall_channel_id: i64,
    pub star_emoji: String,
    pub star_threshold: i32,
    pub command_prefix: String,
}

impl BotConfig {
    /// | Env Var                   | Default |
    /// |---------------------------|---------|
    /// | `DISCORD_TOKEN`           | required |
    /// | `HALL_OF_FAME_CHANNEL_ID` | required |
    /// | `STAR_EMOJI`              | `⭐`     |
    /// | `STAR_THRESHOLD`          | `10`    |
    /// | `COMMAND_PREFIX`          | `!`     |
    pub fn from_env() -> Result<Self, BotError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, BotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| BotError::Config(format!("{name} must be set")))
        };

        let discord_token = required("DISCORD_TOKEN")?;
        let hall_channel_id = parse_snowflake(&required("HALL_OF_FAME_CHANNEL_ID")?)
            .map_err(|e| BotError::Config(format!("HALL_OF_FAME_CHANNEL_ID: {e}")))?;

        let star_emoji = lookup("STAR_EMOJI")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_STAR_EMOJI.to_string());

        let star_threshold = match lookup("STAR_THRESHOLD") {
            Some(raw) => raw.trim().parse::<i32>().map_err(|e| {
                BotError::Config(format!("STAR_THRESHOLD has invalid value '{raw}': {e}"))
            })?,
            None => DEFAULT_STAR_THRESHOLD,
        };
        validate_threshold(star_threshold)
            .map_err(|e| BotError::Config(format!("STAR_THRESHOLD: {e}")))?;

        let command_prefix = lookup("COMMAND_PREFIX")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string());

        Ok(Self {
            discord_token,
            hall_channel_id,
            star_emoji,
            star_threshold,
            command_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DISCORD_TOKEN", "token"),
        ("HALL_OF_FAME_CHANNEL_ID", "1234567890"),
    ];

    #[test]
    fn defaults() {
        let config = BotConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();
        assert_eq!(config.hall_channel_id, 1_234_567_890);
        assert_eq!(config.star_emoji, "⭐");
        assert_eq!(config.star_threshold, 10);
        assert_eq!(config.command_prefix, "!");
    }

    #[test]
    fn token_is_required() {
        let err = BotConfig::from_lookup(lookup_from(&[("HALL_OF_FAME_CHANNEL_ID", "1")]))
            .unwrap_err();
        assert_matches!(err, BotError::Config(msg) if msg.contains("DISCORD_TOKEN"));
    }

    #[test]
    fn channel_must_be_a_snowflake() {
        let err = BotConfig::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "token"),
            ("HALL_OF_FAME_CHANNEL_ID", "hall"),
        ]))
        .unwrap_err();
        assert_matches!(err, BotError::Config(msg) if msg.contains("HALL_OF_FAME_CHANNEL_ID"));
    }

    #[test]
    fn threshold_below_one_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("STAR_THRESHOLD", "0"));
        let err = BotConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert_matches!(err, BotError::Config(_));
    }

    #[test]
    fn overrides_apply() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([("STAR_EMOJI", "🌟"), ("STAR_THRESHOLD", "3"), ("COMMAND_PREFIX", "?")]);
        let config = BotConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.star_emoji, "🌟");
        assert_eq!(config.star_threshold, 3);
        assert_eq!(config.command_prefix, "?");
    }
}
