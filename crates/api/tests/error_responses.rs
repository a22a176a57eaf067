//! Malformed query strings, path segments and JSON bodies are reported
//! through the standard `{ error, code }` envelope, not axum's plain-text
//! rejections.

mod common;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use common::{body_json, build_test_app, get, post_json, send};
use serde_json::json;
use sqlx::PgPool;

async fn assert_bad_request(response: Response<Body>) -> serde_json::Value {
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"), "got {content_type}");

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().is_some_and(|e| !e.is_empty()));
    json
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_numeric_query_param_is_json_400(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app.clone(), "/api/v1/hall-of-fame?min_stars=abc").await;
    assert_bad_request(response).await;

    let response = get(app, "/api/v1/hall-of-fame/random?min_stars=lots").await;
    assert_bad_request(response).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_numeric_path_id_is_json_400(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app, "/api/v1/hall-of-fame/notanid").await;
    assert_bad_request(response).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_missing_password_is_json_400(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(app, "/api/v1/auth/login", json!({ "username": "x" })).await;
    let json = assert_bad_request(response).await;
    assert!(json["error"].as_str().unwrap().contains("password"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unparseable_json_body_is_json_400(pool: PgPool) {
    let app = build_test_app(pool);

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/login")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{\"username\": "))
        .unwrap();
    assert_bad_request(send(app, request).await).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_json_content_type_is_json_415(pool: PgPool) {
    let app = build_test_app(pool);

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/login")
        .body(Body::from(r#"{"username":"x","password":"y"}"#))
        .unwrap();
    let response = send(app, request).await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNSUPPORTED_MEDIA_TYPE");
}
