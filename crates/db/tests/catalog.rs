//! Integration tests for prompt and trope catalogues, focused on the atomic
//! use-count increment.

use cyarika_core::prompts::CatalogSort;
use cyarika_db::models::prompt::{CreatePrompt, UpdatePrompt};
use cyarika_db::models::trope::CreateTrope;
use cyarika_db::repositories::{PromptRepo, TropeRepo};
use sqlx::PgPool;

fn prompt(category: &str, text: &str) -> CreatePrompt {
    CreatePrompt {
        category: category.to_string(),
        prompt_text: text.to_string(),
    }
}

fn trope(category: &str, name: &str) -> CreateTrope {
    CreateTrope {
        category: category.to_string(),
        name: name.to_string(),
        description: format!("{name} description"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_serve_random_increments_once(pool: PgPool) {
    let created = PromptRepo::create(&pool, &prompt("mystery", "A letter arrives."))
        .await
        .unwrap();
    assert_eq!(created.use_count, 0);

    let served = PromptRepo::serve_random(&pool, None).await.unwrap().unwrap();
    assert_eq!(served.id, created.id);
    assert_eq!(served.use_count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_serves_are_all_counted(pool: PgPool) {
    let created = PromptRepo::create(&pool, &prompt("mystery", "The lights go out."))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..20 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            PromptRepo::serve_random(&pool, Some("mystery")).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap().unwrap();
    }

    let after = PromptRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(after.use_count, 20);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_serve_random_respects_category(pool: PgPool) {
    PromptRepo::create(&pool, &prompt("romance", "A chance meeting."))
        .await
        .unwrap();

    assert!(PromptRepo::serve_random(&pool, Some("horror"))
        .await
        .unwrap()
        .is_none());
    let served = PromptRepo::serve_random(&pool, Some("romance"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(served.category, "romance");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_record_use_and_popular_sort(pool: PgPool) {
    let a = PromptRepo::create(&pool, &prompt("misc", "Alpha")).await.unwrap();
    let b = PromptRepo::create(&pool, &prompt("misc", "Beta")).await.unwrap();

    PromptRepo::record_use(&pool, b.id).await.unwrap();
    PromptRepo::record_use(&pool, b.id).await.unwrap();
    assert!(PromptRepo::record_use(&pool, 9_999).await.unwrap().is_none());

    let popular = PromptRepo::list(&pool, None, CatalogSort::Popular).await.unwrap();
    assert_eq!(popular[0].id, b.id);
    assert_eq!(popular[0].use_count, 2);

    let alpha = PromptRepo::list(&pool, None, CatalogSort::Alphabetical)
        .await
        .unwrap();
    assert_eq!(alpha[0].id, a.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_insert_if_absent_skips_existing_text(pool: PgPool) {
    assert!(PromptRepo::insert_if_absent(&pool, &prompt("misc", "Same"))
        .await
        .unwrap());
    assert!(!PromptRepo::insert_if_absent(&pool, &prompt("other", "Same"))
        .await
        .unwrap());
    assert_eq!(PromptRepo::count(&pool).await.unwrap(), 1);

    assert!(TropeRepo::insert_if_absent(&pool, &trope("drama", "Enemies to Lovers"))
        .await
        .unwrap());
    assert!(!TropeRepo::insert_if_absent(&pool, &trope("drama", "Enemies to Lovers"))
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_delete_and_categories(pool: PgPool) {
    let p = PromptRepo::create(&pool, &prompt("misc", "Original")).await.unwrap();
    PromptRepo::create(&pool, &prompt("action", "Chase")).await.unwrap();

    let updated = PromptRepo::update(
        &pool,
        p.id,
        &UpdatePrompt {
            prompt_text: Some("Rewritten".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.prompt_text, "Rewritten");
    assert_eq!(updated.category, "misc");

    assert_eq!(
        PromptRepo::categories(&pool).await.unwrap(),
        vec!["action".to_string(), "misc".to_string()]
    );

    assert!(PromptRepo::delete(&pool, p.id).await.unwrap());
    assert!(!PromptRepo::delete(&pool, p.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_trope_serve_random(pool: PgPool) {
    assert!(TropeRepo::serve_random(&pool, None).await.unwrap().is_none());

    let t = TropeRepo::create(&pool, &trope("drama", "Found Family")).await.unwrap();
    let served = TropeRepo::serve_random(&pool, None).await.unwrap().unwrap();
    assert_eq!(served.id, t.id);
    assert_eq!(served.use_count, 1);
}
