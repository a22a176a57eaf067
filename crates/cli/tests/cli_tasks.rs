use cyarika_api::auth::password::verify_password;
use cyarika_cli::admin::{add_admin, set_admin};
use cyarika_cli::defaults::{import, Defaults};
use cyarika_db::repositories::{PromptRepo, TropeRepo, UserRepo};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_import_defaults_is_idempotent(pool: PgPool) {
    let defaults = Defaults::bundled().unwrap();

    let first = import(&pool, &defaults).await.unwrap();
    assert_eq!(first.prompts, defaults.prompts.len());
    assert_eq!(first.tropes, defaults.tropes.len());

    let second = import(&pool, &defaults).await.unwrap();
    assert_eq!(second.prompts, 0);
    assert_eq!(second.tropes, 0);

    assert_eq!(
        PromptRepo::count(&pool).await.unwrap(),
        defaults.prompts.len() as i64
    );
    assert_eq!(
        TropeRepo::count(&pool).await.unwrap(),
        defaults.tropes.len() as i64
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_admin_then_demote(pool: PgPool) {
    let user = add_admin(&pool, " root ", "correct horse battery").await.unwrap();
    assert_eq!(user.username, "root");
    assert!(user.is_admin);
    assert!(verify_password("correct horse battery", &user.password_hash).unwrap());

    assert!(add_admin(&pool, "root", "another password").await.is_err());

    set_admin(&pool, "root", false).await.unwrap();
    let demoted = UserRepo::find_by_username(&pool, "root")
        .await
        .unwrap()
        .unwrap();
    assert!(!demoted.is_admin);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_set_admin_unknown_user_fails(pool: PgPool) {
    let err = set_admin(&pool, "ghost", true).await.unwrap_err();
    assert!(err.to_string().contains("ghost"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_admin_rejects_short_password(pool: PgPool) {
    assert!(add_admin(&pool, "root", "short").await.is_err());
}
