//! Per-user Matrix client registry with idle eviction.
//!
//! Clients are created on first use and dropped once they have been idle
//! for longer than the configured timeout, or when their user logs out.
//! [`crate::background::registry_sweeper`] calls [`ClientRegistry::evict_idle`]
//! on an interval.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use cyarika_core::types::DbId;
use tokio::sync::RwLock;

use super::client::{MatrixClient, MatrixError};
use super::MatrixConfig;

struct Entry {
    client: Arc<MatrixClient>,
    last_used: Instant,
}

pub struct ClientRegistry {
    config: MatrixConfig,
    idle_timeout: Duration,
    clients: RwLock<HashMap<DbId, Entry>>,
}

impl ClientRegistry {
    pub fn new(config: MatrixConfig) -> Self {
        let idle_timeout = Duration::from_secs(config.client_idle_secs);
        Self {
            config,
            idle_timeout,
            clients: RwLock::new(HashMap::new()),
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// The user's client, created if absent. Marks it as used now.
    pub async fn client_for(&self, user_id: DbId) -> Result<Arc<MatrixClient>, MatrixError> {
        let mut clients = self.clients.write().await;
        let now = Instant::now();

        if let Some(entry) = clients.get_mut(&user_id) {
            entry.last_used = now;
            return Ok(Arc::clone(&entry.client));
        }

        let client = Arc::new(MatrixClient::new(&self.config, user_id)?);
        clients.insert(
            user_id,
            Entry {
                client: Arc::clone(&client),
                last_used: now,
            },
        );
        tracing::debug!(user_id, "Matrix client created");
        Ok(client)
    }

    /// Drop a user's client. Returns `true` if one was registered.
    pub async fn remove(&self, user_id: DbId) -> bool {
        self.clients.write().await.remove(&user_id).is_some()
    }

    /// Evict clients idle longer than the timeout. Returns the count evicted.
    pub async fn evict_idle(&self) -> usize {
        self.evict_idle_at(Instant::now()).await
    }

    async fn evict_idle_at(&self, now: Instant) -> usize {
        let mut clients = self.clients.write().await;
        let before = clients.len();
        clients.retain(|_, entry| now.saturating_duration_since(entry.last_used) <= self.idle_timeout);
        before - clients.len()
    }

    pub async fn len(&self) -> usize {
        self.clients.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
