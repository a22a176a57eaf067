use std::sync::Arc;

use crate::config::ServerConfig;
use crate::matrix::ClientRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub pool: cyarika_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Per-user Matrix clients; `None` when the bridge is not configured.
    pub matrix: Option<Arc<ClientRegistry>>,
}

impl AppState {
    pub fn new(pool: cyarika_db::DbPool, config: ServerConfig) -> Self {
        let matrix = config
            .matrix
            .clone()
            .map(|matrix| Arc::new(ClientRegistry::new(matrix)));
        Self {
            pool,
            config: Arc::new(config),
            matrix,
        }
    }
}
