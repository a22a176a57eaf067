//! HTTP-level tests for admin user management and platform counts.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_user, get_auth, post_json, put_json_auth, token_for, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_routes_reject_members(pool: PgPool) {
    let member = token_for(&create_user(&pool, "member", false).await);
    let app = common::build_test_app(pool);

    for uri in ["/api/v1/admin/users", "/api/v1/admin/stats"] {
        let response = get_auth(app.clone(), uri, &member).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_grant_rp_subscription(pool: PgPool) {
    let admin = token_for(&create_user(&pool, "admin", true).await);
    let member = create_user(&pool, "member", false).await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/users/{}", member.id),
        &admin,
        json!({ "subscription_tier": "rp", "subscription_status": "active" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["subscription_tier"], "rp");
    assert_eq!(json["effective_tier"], "rp");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_tier_and_status_rejected(pool: PgPool) {
    let admin = token_for(&create_user(&pool, "admin", true).await);
    let member = create_user(&pool, "member", false).await;
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/admin/users/{}", member.id);

    let response = put_json_auth(app.clone(), &uri, &admin, json!({ "subscription_tier": "gold" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response =
        put_json_auth(app, &uri, &admin, json!({ "subscription_status": "someday" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_cannot_demote_self(pool: PgPool) {
    let admin_user = create_user(&pool, "admin", true).await;
    let admin = token_for(&admin_user);
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/users/{}", admin_user.id),
        &admin,
        json!({ "is_admin": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deactivated_user_cannot_log_in(pool: PgPool) {
    let admin = token_for(&create_user(&pool, "admin", true).await);
    let member = create_user(&pool, "member", false).await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/admin/users/{}", member.id),
        &admin,
        json!({ "is_active": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "username": "member", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_unknown_user_is_not_found(pool: PgPool) {
    let admin = token_for(&create_user(&pool, "admin", true).await);
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app,
        "/api/v1/admin/users/999999",
        &admin,
        json!({ "is_admin": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_users_and_stats(pool: PgPool) {
    let admin = token_for(&create_user(&pool, "admin", true).await);
    create_user(&pool, "member", false).await;
    let app = common::build_test_app(pool);

    let users = body_json(get_auth(app.clone(), "/api/v1/admin/users", &admin).await).await;
    assert_eq!(users["data"].as_array().unwrap().len(), 2);

    let stats = body_json(get_auth(app, "/api/v1/admin/stats", &admin).await).await;
    assert_eq!(stats["users"], 2);
    assert_eq!(stats["characters"], 0);
    assert_eq!(stats["hall_of_fame"], 0);
}
