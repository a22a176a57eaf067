//! Handlers for the `/auth` resource.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{SET_COOKIE, USER_AGENT};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::response::{AppendHeaders, IntoResponse};
use chrono::Utc;
use cyarika_core::accounts::{
    parse_snowflake, validate_username, LOCKOUT_MINUTES, MAX_FAILED_LOGINS,
};
use cyarika_core::error::CoreError;
use cyarika_db::models::session::CreateSession;
use cyarika_db::models::user::{CreateUser, User, UserResponse};
use cyarika_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::extract::Json;
use crate::auth::cookies::{
    cleared_cookies, generate_csrf_token, read_cookie, session_cookies, IssuedCookies,
    REFRESH_COOKIE,
};
use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{not_found, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

type SetCookies = AppendHeaders<[(HeaderName, String); 3]>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32))]
    pub username: String,
    #[validate(length(min = 8, max = 256))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /auth/refresh`. Browsers rely on the refresh cookie and
/// may send no body at all.
#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Body of `PUT /auth/me/discord`; `null` unlinks.
#[derive(Debug, Deserialize)]
pub struct LinkDiscordRequest {
    pub discord_id: Option<String>,
}

/// Returned by register, login and refresh alongside the session cookies.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// Echo this in `X-CSRF-Token` on state-changing requests.
    pub csrf_token: String,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_username(&input.username)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            password_hash,
            is_admin: false,
        },
    )
    .await?;
    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    let (cookies, body) = issue_session(&state, &user, user_agent(&headers)).await?;
    Ok((StatusCode::CREATED, cookies, Json(body)))
}

/// POST /api/v1/auth/login
///
/// Five consecutive failures lock the account for fifteen minutes.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid username or password".into()));

    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(invalid)?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::forbidden("Account is deactivated")));
    }

    if let Some(locked_until) = user.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Core(CoreError::forbidden(
                "Account is temporarily locked. Try again later.",
            )));
        }
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        let failures = UserRepo::increment_failed_login(&state.pool, user.id).await?;

        if failures >= MAX_FAILED_LOGINS {
            let until = Utc::now() + chrono::Duration::minutes(LOCKOUT_MINUTES);
            UserRepo::lock_account(&state.pool, user.id, until).await?;
            tracing::warn!(user_id = user.id, %until, "Account locked after failed logins");
        }

        return Err(invalid());
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let (cookies, body) = issue_session(&state, &user, user_agent(&headers)).await?;
    Ok((cookies, Json(body)))
}

/// POST /api/v1/auth/refresh
///
/// Rotates the refresh token: the presented one is revoked and a new
/// session is issued. The token comes from the body or the refresh cookie.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let input: RefreshRequest = if body.iter().all(u8::is_ascii_whitespace) {
        RefreshRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?
    };

    let token = input
        .refresh_token
        .or_else(|| read_cookie(&headers, REFRESH_COOKIE).map(str::to_string))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Missing refresh token".into())))?;

    let expired =
        || AppError::Core(CoreError::Unauthorized("Invalid or expired refresh token".into()));

    let session = SessionRepo::claim_by_hash(&state.pool, &hash_refresh_token(&token))
        .await?
        .ok_or_else(expired)?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::forbidden("Account is deactivated")));
    }

    let (cookies, body) = issue_session(&state, &user, user_agent(&headers)).await?;
    Ok((cookies, Json(body)))
}

/// POST /api/v1/auth/logout
///
/// Revokes every session of the caller, drops their Matrix client and
/// clears the cookies.
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth_user.id()).await?;
    if let Some(registry) = &state.matrix {
        registry.remove(auth_user.id()).await;
    }
    tracing::info!(user_id = auth_user.id(), revoked, "User logged out");

    let [a, b, c] = cleared_cookies(state.config.cookie_secure);
    Ok((
        StatusCode::NO_CONTENT,
        AppendHeaders([(SET_COOKIE, a), (SET_COOKIE, b), (SET_COOKIE, c)]),
    ))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.id())
        .await?
        .ok_or_else(|| not_found("User", auth_user.id()))?;
    Ok(Json(user.to_response()))
}

/// PUT /api/v1/auth/me/discord
///
/// Link the caller's Discord account so the bot can recognise them.
pub async fn link_discord(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<LinkDiscordRequest>,
) -> AppResult<Json<UserResponse>> {
    let discord_id = input
        .discord_id
        .as_deref()
        .map(parse_snowflake)
        .transpose()?;

    let user = UserRepo::set_discord_id(&state.pool, auth_user.id(), discord_id)
        .await?
        .ok_or_else(|| not_found("User", auth_user.id()))?;
    tracing::info!(user_id = user.id, linked = discord_id.is_some(), "Discord link updated");
    Ok(Json(user.to_response()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Generate tokens, persist a session row and build cookies plus body.
async fn issue_session(
    state: &AppState,
    user: &User,
    user_agent: Option<String>,
) -> AppResult<(SetCookies, AuthResponse)> {
    let jwt = &state.config.jwt;
    let access_token = generate_access_token(&user.principal(), jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_token, refresh_hash) = generate_refresh_token();
    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh_hash,
            expires_at: Utc::now() + chrono::Duration::days(jwt.refresh_token_expiry_days),
            user_agent,
        },
    )
    .await?;

    let csrf_token = generate_csrf_token();
    let expires_in = jwt.access_token_expiry_mins * 60;
    let [a, b, c] = session_cookies(
        &IssuedCookies {
            access_token: &access_token,
            access_max_age_secs: expires_in,
            refresh_token: &refresh_token,
            refresh_max_age_secs: jwt.refresh_token_expiry_days * 86_400,
            csrf_token: &csrf_token,
        },
        state.config.cookie_secure,
    );

    Ok((
        AppendHeaders([(SET_COOKIE, a), (SET_COOKIE, b), (SET_COOKIE, c)]),
        AuthResponse {
            access_token,
            refresh_token,
            expires_in,
            csrf_token,
            user: user.to_response(),
        },
    ))
}
