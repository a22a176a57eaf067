//! Prefix commands: `roll`, `prompt`, `trope`, `gem` and `help`.
//!
//! Parsing is pure; [`execute`] produces the reply text and touches only the
//! database, so both are testable without a gateway connection.

use cyarika_core::character_sheet::CheckTarget;
use cyarika_core::dice::{DiceExpr, RollResult};
use cyarika_core::error::CoreError;
use cyarika_core::hall_of_fame::{render_mirror, MirrorView};
use cyarika_core::prompts::normalize_category;
use cyarika_db::repositories::{CharacterRepo, HallOfFameRepo, PromptRepo, TropeRepo, UserRepo};
use sqlx::PgPool;

use crate::error::BotError;

/// A recognised command and its raw argument text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Roll(String),
    Prompt(Option<String>),
    Trope(Option<String>),
    Gem(String),
    Help,
}

/// Parse `content` if it starts with `prefix` and names a known command.
pub fn parse(prefix: &str, content: &str) -> Option<Command> {
    let rest = content.trim_start().strip_prefix(prefix)?;
    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest.trim_end(), ""),
    };
    let category = || Some(args.to_string()).filter(|a| !a.is_empty());

    match name.to_ascii_lowercase().as_str() {
        "roll" | "r" => Some(Command::Roll(args.to_string())),
        "prompt" => Some(Command::Prompt(category())),
        "trope" => Some(Command::Trope(category())),
        "gem" => Some(Command::Gem(args.to_string())),
        "help" => Some(Command::Help),
        _ => None,
    }
}

/// What a command needs besides the database.
#[derive(Debug, Clone, Copy)]
pub struct CommandEnv<'a> {
    pub prefix: &'a str,
    pub star_emoji: &'a str,
    /// Discord id of the invoking user.
    pub discord_user_id: i64,
}

/// Run a command and return the reply to post.
pub async fn execute(
    pool: &PgPool,
    env: CommandEnv<'_>,
    command: &Command,
) -> Result<String, BotError> {
    match command {
        Command::Roll(args) => roll(pool, env, args).await,
        Command::Prompt(category) => prompt(pool, category.as_deref()).await,
        Command::Trope(category) => trope(pool, category.as_deref()).await,
        Command::Gem(args) => gem(pool, env, args).await,
        Command::Help => Ok(help(env.prefix)),
    }
}

fn roll_dice(expr: &DiceExpr) -> RollResult {
    expr.roll(&mut rand::rng())
}

async fn roll(pool: &PgPool, env: CommandEnv<'_>, args: &str) -> Result<String, BotError> {
    if args.is_empty() {
        return Ok(format!(
            "Usage: `{0}roll 2d6+3` or `{0}roll <character> <ability|skill|save>`",
            env.prefix
        ));
    }

    let dice_error = match args.parse::<DiceExpr>() {
        Ok(expr) => return Ok(roll_dice(&expr).describe()),
        Err(e) => e,
    };

    let Some((name, target)) = args.rsplit_once(char::is_whitespace) else {
        return Ok(match dice_error {
            CoreError::Validation(msg) => msg,
            other => other.to_string(),
        });
    };
    let (name, target) = (name.trim(), target.trim());

    let Some(user) = UserRepo::find_by_discord_id(pool, env.discord_user_id).await? else {
        return Ok("Link your Discord account on the website to roll for your characters.".into());
    };
    let Some(sheet) = CharacterRepo::find_by_user_and_name(pool, user.id, name).await? else {
        return Ok(format!("You have no character named **{name}**."));
    };
    let Some(modifier) = sheet.check_modifier(&CheckTarget::parse(target)) else {
        return Ok(format!(
            "**{}** has no ability, save or skill called `{target}`.",
            sheet.name
        ));
    };

    let result = roll_dice(&DiceExpr::d20(modifier));
    Ok(format!("**{}** rolls {target}: {}", sheet.name, result.describe()))
}

async fn prompt(pool: &PgPool, category: Option<&str>) -> Result<String, BotError> {
    let category = category.map(normalize_category);
    Ok(
        match PromptRepo::serve_random(pool, category.as_deref()).await? {
            Some(p) => format!("**Prompt** ({}): {}", p.category, p.prompt_text),
            None => no_match("prompts", category.as_deref()),
        },
    )
}

async fn trope(pool: &PgPool, category: Option<&str>) -> Result<String, BotError> {
    let category = category.map(normalize_category);
    Ok(
        match TropeRepo::serve_random(pool, category.as_deref()).await? {
            Some(t) => format!("**{}** ({})\n{}", t.name, t.category, t.description),
            None => no_match("tropes", category.as_deref()),
        },
    )
}

fn no_match(kind: &str, category: Option<&str>) -> String {
    match category {
        Some(c) => format!("No {kind} in category `{c}`."),
        None => format!("No {kind} yet."),
    }
}

async fn gem(pool: &PgPool, env: CommandEnv<'_>, args: &str) -> Result<String, BotError> {
    let min_stars = if args.is_empty() {
        0
    } else {
        match args.parse::<i32>() {
            Ok(n) if n >= 0 => n,
            _ => return Ok(format!("Usage: `{}gem [min_stars]`", env.prefix)),
        }
    };

    Ok(match HallOfFameRepo::random(pool, min_stars).await? {
        Some(record) => render_mirror(&MirrorView {
            star_emoji: env.star_emoji,
            star_count: record.star_count,
            guild_id: record.guild_id,
            channel_id: record.channel_id,
            message_id: record.message_id,
            author_id: record.author_id,
            character_name: record.character_name.as_deref(),
            content: &record.content,
        }),
        None => format!("No Hall of Fame messages with at least {min_stars} stars yet."),
    })
}

fn help(prefix: &str) -> String {
    format!(
        "**Commands**\n\
         `{p}roll <dice>` roll dice, e.g. `{p}roll 2d6+3`\n\
         `{p}roll <character> <ability|skill|save>` d20 check for one of your characters\n\
         `{p}prompt [category]` a random roleplay prompt\n\
         `{p}trope [category]` a random trope\n\
         `{p}gem [min_stars]` a random Hall of Fame message\n\
         `{p}help` this message",
        p = prefix
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse("!", "!roll 2d6"), Some(Command::Roll("2d6".into())));
        assert_eq!(parse("!", "!prompt"), Some(Command::Prompt(None)));
        assert_eq!(
            parse("!", "!trope  Slow Burn "),
            Some(Command::Trope(Some("Slow Burn".into())))
        );
        assert_eq!(parse("!", "!gem 15"), Some(Command::Gem("15".into())));
        assert_eq!(parse("!", "!HELP"), Some(Command::Help));
    }

    #[test]
    fn ignores_other_messages() {
        assert_eq!(parse("!", "roll 2d6"), None);
        assert_eq!(parse("!", "!dance"), None);
        assert_eq!(parse("?", "!roll 2d6"), None);
    }

    #[test]
    fn multi_character_prefix() {
        assert_eq!(
            parse("cy!", "cy!roll Vex stealth"),
            Some(Command::Roll("Vex stealth".into()))
        );
    }

    #[test]
    fn help_mentions_prefix() {
        assert!(help("?").contains("`?roll <dice>`"));
    }
}
