//! Periodic eviction of idle Matrix clients.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::matrix::ClientRegistry;

/// Sweep at a quarter of the idle timeout, but never more often than this.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

pub fn sweep_interval(idle_timeout: Duration) -> Duration {
    (idle_timeout / 4).max(MIN_SWEEP_INTERVAL)
}

/// Run the sweeper loop until `cancel` is triggered.
pub async fn run(registry: Arc<ClientRegistry>, cancel: CancellationToken) {
    let period = sweep_interval(registry.idle_timeout());
    tracing::info!(
        idle_secs = registry.idle_timeout().as_secs(),
        interval_secs = period.as_secs(),
        "Matrix client sweeper started"
    );

    let mut interval = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Matrix client sweeper stopping");
                break;
            }
            _ = interval.tick() => {
                let evicted = registry.evict_idle().await;
                if evicted > 0 {
                    tracing::info!(evicted, "Evicted idle Matrix clients");
                } else {
                    tracing::debug!("No idle Matrix clients to evict");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::MatrixConfig;

    #[test]
    fn interval_is_quarter_of_idle_with_floor() {
        assert_eq!(
            sweep_interval(Duration::from_secs(1800)),
            Duration::from_secs(450)
        );
        assert_eq!(sweep_interval(Duration::from_secs(2)), MIN_SWEEP_INTERVAL);
    }

    #[tokio::test]
    async fn stops_on_cancel() {
        let registry = Arc::new(ClientRegistry::new(MatrixConfig {
            homeserver_url: "https://matrix.example".to_string(),
            access_token: "tok".to_string(),
            client_idle_secs: 60,
        }));
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(registry, cancel.clone()));

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("sweeper should stop promptly")
            .unwrap();
    }
}
