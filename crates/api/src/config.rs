use crate::auth::jwt::JwtConfig;
use crate::matrix::MatrixConfig;

/// A missing or malformed environment variable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Read `name` through `lookup` and parse it, falling back to `default`.
pub(crate) fn parse_or<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(e) => Err(ConfigError::Invalid {
                name,
                reason: e.to_string(),
                value,
            }),
        },
        None => Ok(default),
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Whether session cookies carry the `Secure` attribute (default: `false`).
    pub cookie_secure: bool,
    pub jwt: JwtConfig,
    /// `None` when the Matrix bridge is not configured.
    pub matrix: Option<MatrixConfig>,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `COOKIE_SECURE`        | `false`                    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&lookup, "PORT", 3000u16)?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in &cors_origins {
            if let Err(e) = axum::http::HeaderValue::from_str(origin) {
                return Err(ConfigError::Invalid {
                    name: "CORS_ORIGINS",
                    value: origin.clone(),
                    reason: e.to_string(),
                });
            }
        }

        let request_timeout_secs = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30u64)?;
        let cookie_secure = parse_or(&lookup, "COOKIE_SECURE", false)?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            cookie_secure,
            jwt: JwtConfig::from_lookup(&lookup)?,
            matrix: MatrixConfig::from_lookup(&lookup)?,
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

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = ServerConfig::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(!config.cookie_secure);
        assert_eq!(config.jwt.access_token_expiry_mins, 15);
        assert!(config.matrix.is_none());
    }

    #[test]
    fn missing_secret_is_an_error() {
        let err = ServerConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_matches!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = ServerConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert_matches!(err, ConfigError::Invalid { name: "PORT", .. });
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
        ]))
        .unwrap();
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn unrepresentable_cors_origin_is_an_error() {
        let err = ServerConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("CORS_ORIGINS", "https://ok.example,bad\u{7f}origin"),
        ]))
        .unwrap_err();
        assert_matches!(err, ConfigError::Invalid { name: "CORS_ORIGINS", .. });
    }

    #[test]
    fn matrix_requires_both_url_and_token() {
        let partial = ServerConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("MATRIX_HOMESERVER_URL", "https://matrix.example"),
        ]))
        .unwrap();
        assert!(partial.matrix.is_none());

        let full = ServerConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("MATRIX_HOMESERVER_URL", "https://matrix.example/"),
            ("MATRIX_ACCESS_TOKEN", "tok"),
            ("MATRIX_CLIENT_IDLE_SECS", "60"),
        ]))
        .unwrap();
        let matrix = full.matrix.unwrap();
        assert_eq!(matrix.homeserver_url, "https://matrix.example");
        assert_eq!(matrix.client_idle_secs, 60);
    }
}
