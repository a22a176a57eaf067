//! Prefix commands and proxy resolution against a real database.

use cyarika_bot::commands::{execute, parse, Command, CommandEnv};
use cyarika_bot::proxy::{resolve, ProxyTarget};
use cyarika_db::models::character::CreateCharacterSheet;
use cyarika_db::models::hall_of_fame::UpsertHallOfFame;
use cyarika_db::models::prompt::CreatePrompt;
use cyarika_db::models::user::{CreateUser, UpdateUser, User};
use cyarika_db::repositories::{CharacterRepo, HallOfFameRepo, PromptRepo, UserRepo};
use sqlx::PgPool;

const DISCORD_ID: i64 = 123_456_789_012_345_678;

fn env() -> CommandEnv<'static> {
    CommandEnv {
        prefix: "!",
        star_emoji: "⭐",
        discord_user_id: DISCORD_ID,
    }
}

async fn run(pool: &PgPool, content: &str) -> String {
    let command = parse("!", content).expect("should parse");
    execute(pool, env(), &command).await.unwrap()
}

async fn linked_user(pool: &PgPool, tier: &str) -> User {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: "vexplayer".into(),
            password_hash: "not-a-real-hash".into(),
            is_admin: false,
        },
    )
    .await
    .unwrap();
    UserRepo::update(
        pool,
        user.id,
        &UpdateUser {
            subscription_tier: Some(tier.into()),
            subscription_status: Some("active".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    UserRepo::set_discord_id(pool, user.id, Some(DISCORD_ID))
        .await
        .unwrap()
        .unwrap()
}

async fn create_vex(pool: &PgPool, user: &User) {
    CharacterRepo::create(
        pool,
        user.id,
        &CreateCharacterSheet {
            name: "Vex".into(),
            dexterity: Some(16),
            reflex_save: Some(4),
            skills: Some(serde_json::json!({ "Stealth": 7 })),
            proxy_prefix: Some("vx:".into()),
            avatar_url: Some("https://img.example/vex.png".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
}

// ---------------------------------------------------------------------------
// !roll
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_roll_dice_notation(pool: PgPool) {
    let reply = run(&pool, "!roll 2d6+3").await;
    assert!(reply.starts_with("2d6+3: ["), "{reply}");
    assert!(reply.contains("+3 = **"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_roll_without_args_shows_usage(pool: PgPool) {
    assert!(run(&pool, "!roll").await.starts_with("Usage:"));
    assert_eq!(
        run(&pool, "!roll banana").await,
        "'banana' is not dice notation (try 2d6+3)"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_character_check_needs_linked_account(pool: PgPool) {
    let reply = run(&pool, "!roll Vex stealth").await;
    assert!(reply.contains("Link your Discord account"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_character_checks(pool: PgPool) {
    let user = linked_user(&pool, "rp").await;
    create_vex(&pool, &user).await;

    let skill = run(&pool, "!roll vex STEALTH").await;
    assert!(skill.starts_with("**Vex** rolls STEALTH: 1d20+7: ["), "{skill}");

    let ability = run(&pool, "!roll Vex dex").await;
    assert!(ability.contains("1d20+3: ["), "{ability}");

    let save = run(&pool, "!roll Vex reflex").await;
    assert!(save.contains("1d20+4: ["), "{save}");

    let unknown = run(&pool, "!roll Vex juggling").await;
    assert!(unknown.contains("no ability, save or skill called `juggling`"));

    let missing = run(&pool, "!roll Mira stealth").await;
    assert!(missing.contains("no character named **Mira**"));
}

// ---------------------------------------------------------------------------
// !prompt / !gem
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_prompt_counts_use(pool: PgPool) {
    let prompt = PromptRepo::create(
        &pool,
        &CreatePrompt {
            category: "mystery".into(),
            prompt_text: "A letter arrives with no sender.".into(),
        },
    )
    .await
    .unwrap();

    let reply = run(&pool, "!prompt Mystery").await;
    assert_eq!(reply, "**Prompt** (mystery): A letter arrives with no sender.");

    let served = PromptRepo::find_by_id(&pool, prompt.id).await.unwrap().unwrap();
    assert_eq!(served.use_count, 1);

    assert_eq!(run(&pool, "!prompt horror").await, "No prompts in category `horror`.");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_gem(pool: PgPool) {
    assert!(run(&pool, "!gem").await.starts_with("No Hall of Fame messages"));
    assert!(run(&pool, "!gem lots").await.starts_with("Usage:"));

    HallOfFameRepo::upsert(
        &pool,
        &UpsertHallOfFame {
            message_id: 77,
            channel_id: 20,
            guild_id: 10,
            author_id: 42,
            character_name: None,
            content: "legendary".into(),
            star_count: 12,
            context_messages: Vec::new(),
        },
    )
    .await
    .unwrap();

    let reply = run(&pool, "!gem 10").await;
    assert!(reply.starts_with("⭐ **12**"), "{reply}");
    assert!(reply.contains("> legendary"));
    assert!(run(&pool, "!gem 13").await.starts_with("No Hall of Fame messages"));
}

#[test]
fn test_help_is_a_command() {
    assert_eq!(parse("!", "!help"), Some(Command::Help));
}

// ---------------------------------------------------------------------------
// Proxy resolution
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_proxy_resolves_for_rp_user(pool: PgPool) {
    let user = linked_user(&pool, "rp").await;
    create_vex(&pool, &user).await;

    let target = resolve(&pool, DISCORD_ID, "vx: hello there").await.unwrap();
    assert_eq!(
        target,
        Some(ProxyTarget {
            character_name: "Vex".into(),
            avatar_url: Some("https://img.example/vex.png".into()),
            body: "hello there".into(),
        })
    );

    assert!(resolve(&pool, DISCORD_ID, "plain message").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_proxy_requires_rp_access(pool: PgPool) {
    let user = linked_user(&pool, "free").await;
    create_vex(&pool, &user).await;

    assert!(resolve(&pool, DISCORD_ID, "vx: hello").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_proxy_ignores_unlinked_accounts(pool: PgPool) {
    assert!(resolve(&pool, 1, "vx: hello").await.unwrap().is_none());
}
