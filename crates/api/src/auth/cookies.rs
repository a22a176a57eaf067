//! Session, refresh and CSRF cookies.
//!
//! The access and refresh tokens live in `HttpOnly` cookies. A third,
//! script-readable cookie carries the CSRF token that state-changing
//! requests must echo in the `X-CSRF-Token` header (double submit).

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use rand::Rng;

pub const SESSION_COOKIE: &str = "cyarika_session";
pub const REFRESH_COOKIE: &str = "cyarika_refresh";
pub const CSRF_COOKIE: &str = "cyarika_csrf";
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Value of cookie `name` from the request's `Cookie` headers.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Whether the request carries any session cookie, i.e. relies on ambient
/// browser credentials and therefore needs CSRF protection.
pub fn has_session_cookie(headers: &HeaderMap) -> bool {
    read_cookie(headers, SESSION_COOKIE).is_some() || read_cookie(headers, REFRESH_COOKIE).is_some()
}

fn set_cookie(name: &str, value: &str, max_age_secs: i64, http_only: bool, secure: bool) -> String {
    let mut cookie = format!("{name}={value}; Path=/; Max-Age={max_age_secs}; SameSite=Lax");
    if http_only {
        cookie.push_str("; HttpOnly");
    }
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Tokens issued for one login or refresh.
pub struct IssuedCookies<'a> {
    pub access_token: &'a str,
    pub access_max_age_secs: i64,
    pub refresh_token: &'a str,
    pub refresh_max_age_secs: i64,
    pub csrf_token: &'a str,
}

/// `Set-Cookie` values for a fresh session.
pub fn session_cookies(issued: &IssuedCookies<'_>, secure: bool) -> [String; 3] {
    [
        set_cookie(
            SESSION_COOKIE,
            issued.access_token,
            issued.access_max_age_secs,
            true,
            secure,
        ),
        set_cookie(
            REFRESH_COOKIE,
            issued.refresh_token,
            issued.refresh_max_age_secs,
            true,
            secure,
        ),
        // The CSRF cookie outlives the access token so the SPA can still
        // send it on the refresh call.
        set_cookie(
            CSRF_COOKIE,
            issued.csrf_token,
            issued.refresh_max_age_secs,
            false,
            secure,
        ),
    ]
}

/// `Set-Cookie` values that expire every session cookie.
pub fn cleared_cookies(secure: bool) -> [String; 3] {
    [
        set_cookie(SESSION_COOKIE, "", 0, true, secure),
        set_cookie(REFRESH_COOKIE, "", 0, true, secure),
        set_cookie(CSRF_COOKIE, "", 0, false, secure),
    ]
}

/// 32 random bytes, hex encoded.
pub fn generate_csrf_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Constant-time comparison of two tokens.
pub fn tokens_match(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn reads_cookie_among_several() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; cyarika_csrf=abc123; cyarika_session=jwt"),
        );
        assert_eq!(read_cookie(&headers, CSRF_COOKIE), Some("abc123"));
        assert_eq!(read_cookie(&headers, SESSION_COOKIE), Some("jwt"));
        assert_eq!(read_cookie(&headers, REFRESH_COOKIE), None);
        assert!(has_session_cookie(&headers));
    }

    #[test]
    fn reads_cookie_across_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1"));
        headers.append(COOKIE, HeaderValue::from_static("cyarika_refresh=r"));
        assert_eq!(read_cookie(&headers, REFRESH_COOKIE), Some("r"));
        assert!(!has_session_cookie(&HeaderMap::new()));
    }

    #[test]
    fn session_cookie_attributes() {
        let issued = IssuedCookies {
            access_token: "acc",
            access_max_age_secs: 900,
            refresh_token: "ref",
            refresh_max_age_secs: 604_800,
            csrf_token: "tok",
        };
        let [session, refresh, csrf] = session_cookies(&issued, true);
        assert_eq!(
            session,
            "cyarika_session=acc; Path=/; Max-Age=900; SameSite=Lax; HttpOnly; Secure"
        );
        assert!(refresh.contains("HttpOnly"));
        assert!(!csrf.contains("HttpOnly"));
        assert!(csrf.starts_with("cyarika_csrf=tok;"));
    }

    #[test]
    fn cleared_cookies_expire_immediately() {
        for cookie in cleared_cookies(false) {
            assert!(cookie.contains("Max-Age=0"));
            assert!(!cookie.contains("Secure"));
        }
    }

    #[test]
    fn csrf_tokens() {
        let a = generate_csrf_token();
        let b = generate_csrf_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert!(tokens_match(&a, &a.clone()));
        assert!(!tokens_match(&a, &b));
        assert!(!tokens_match("short", "longer"));
    }
}
