//! Matrix messaging bridge.
//!
//! [`client::MatrixClient`] talks to the homeserver's client-server API;
//! [`registry::ClientRegistry`] keeps one client per signed-in user and
//! evicts clients that have been idle longer than the configured timeout.

pub mod client;
pub mod registry;

pub use client::{MatrixClient, MatrixError, RoomMessage};
pub use registry::ClientRegistry;

use crate::config::{parse_or, ConfigError};

/// Default idle timeout before a user's client is evicted: 30 minutes.
pub const DEFAULT_CLIENT_IDLE_SECS: u64 = 1800;

/// Homeserver connection settings.
#[derive(Debug, Clone)]
pub struct MatrixConfig {
    /// Base URL without a trailing slash.
    pub homeserver_url: String,
    pub access_token: String,
    pub client_idle_secs: u64,
}

impl MatrixConfig {
    /// | Env Var                   | Default |
    /// |---------------------------|---------|
    /// | `MATRIX_HOMESERVER_URL`   | unset   |
    /// | `MATRIX_ACCESS_TOKEN`     | unset   |
    /// | `MATRIX_CLIENT_IDLE_SECS` | `1800`  |
    ///
    /// Returns `Ok(None)` unless both the URL and the token are set.
    pub fn from_lookup<F>(lookup: &F) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("MATRIX_HOMESERVER_URL").filter(|v| !v.trim().is_empty());
        let token = lookup("MATRIX_ACCESS_TOKEN").filter(|v| !v.trim().is_empty());
        let (Some(url), Some(access_token)) = (url, token) else {
            return Ok(None);
        };

        Ok(Some(Self {
            homeserver_url: url.trim().trim_end_matches('/').to_string(),
            access_token,
            client_idle_secs: parse_or(lookup, "MATRIX_CLIENT_IDLE_SECS", DEFAULT_CLIENT_IDLE_SECS)?,
        }))
    }
}
