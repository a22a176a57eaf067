#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use cyarika_api::auth::jwt::{generate_access_token, JwtConfig};
use cyarika_api::auth::password::hash_password;
use cyarika_api::config::ServerConfig;
use cyarika_api::router::build_app_router;
use cyarika_api::state::AppState;
use cyarika_db::models::user::{CreateUser, UpdateUser, User};
use cyarika_db::repositories::UserRepo;

pub const TEST_PASSWORD: &str = "test_password_123!";

/// A `ServerConfig` with safe defaults and no Matrix bridge.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        cookie_secure: false,
        jwt: JwtConfig {
            secret: "test-secret-not-for-production".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        matrix: None,
    }
}

/// The production router over `pool` with [`test_config`].
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config())
}

pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, username: &str, is_admin: bool) -> User {
    let password_hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash,
            is_admin,
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Insert a user with an active RP subscription.
pub async fn create_rp_user(pool: &PgPool, username: &str) -> User {
    let user = create_user(pool, username, false).await;
    UserRepo::update(
        pool,
        user.id,
        &UpdateUser {
            subscription_tier: Some("rp".into()),
            subscription_status: Some("active".into()),
            ..Default::default()
        },
    )
    .await
    .expect("update should succeed")
    .expect("user should exist")
}

/// A Bearer access token for `user`, signed with the test secret.
pub fn token_for(user: &User) -> String {
    generate_access_token(&user.principal(), &test_config().jwt)
        .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

fn builder(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    builder(method, uri, token)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, builder("GET", uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        builder("GET", uri, Some(token)).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, json_request("POST", uri, None, body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, json_request("POST", uri, Some(token), body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        builder("POST", uri, Some(token)).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn put_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, json_request("PUT", uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        builder("DELETE", uri, Some(token)).body(Body::empty()).unwrap(),
    )
    .await
}

/// A request authenticated only by cookies, as a browser would send it.
pub fn cookie_request(
    method: &str,
    uri: &str,
    cookies: &str,
    csrf: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(COOKIE, cookies);
    if let Some(csrf) = csrf {
        builder = builder.header("x-csrf-token", csrf);
    }
    match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body should be JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("body should be UTF-8")
}

/// `name=value` pairs from every `Set-Cookie` header, joined for a `Cookie`
/// request header.
pub fn cookie_header(response: &Response<Body>) -> String {
    response
        .headers()
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}
