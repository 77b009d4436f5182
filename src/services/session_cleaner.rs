use crate::services::store::UserStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// `tokio::time::interval` rejects a zero period.
const MIN_CLEAN_INTERVAL: Duration = Duration::from_secs(1);

/// Periodically drops sessions that have been idle longer than `idle_timeout`.
pub struct SessionCleaner {
    store: Arc<dyn UserStore>,
    idle_timeout: Duration,
    interval: Duration,
}

impl SessionCleaner {
    pub fn new(store: Arc<dyn UserStore>, idle_timeout: Duration, interval: Duration) -> Self {
        if interval < MIN_CLEAN_INTERVAL {
            warn!(
                "Session clean interval {:?} too short, using {:?}",
                interval, MIN_CLEAN_INTERVAL
            );
        }
        Self {
            store,
            idle_timeout,
            interval: interval.max(MIN_CLEAN_INTERVAL),
        }
    }

    /// One sweep. Returns the number of sessions removed.
    pub async fn sweep(&self) -> u64 {
        let idle = chrono::Duration::from_std(self.idle_timeout)
            .unwrap_or_else(|_| chrono::Duration::seconds(600));
        match self.store.remove_idle_sessions(Utc::now() - idle).await {
            Ok(removed) => {
                if removed > 0 {
                    info!("Removed {} idle sessions", removed);
                }
                removed
            }
            Err(e) => {
                error!("Session cleanup failed: {}", e);
                0
            }
        }
    }

    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.sweep().await;
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            debug!("Session cleaner stopping");
                            break;
                        }
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserSession;
    use crate::services::MemoryUserStore;

    async fn seed(store: &MemoryUserStore, key: &str, idle: chrono::Duration) {
        let seen = Utc::now() - idle;
        store
            .insert_session(&UserSession {
                session_key: key.to_string(),
                user_id: "u".to_string(),
                login_time: seen,
                last_seen: seen,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_sweep_removes_only_stale_sessions() {
        let store = Arc::new(MemoryUserStore::new());
        seed(&store, "stale", chrono::Duration::minutes(11)).await;
        seed(&store, "fresh", chrono::Duration::minutes(1)).await;

        let cleaner = SessionCleaner::new(
            store.clone(),
            Duration::from_secs(600),
            Duration::from_secs(60),
        );
        assert_eq!(cleaner.sweep().await, 1);
        assert_eq!(store.session_count(), 1);
        assert!(store.get_session("fresh").await.is_ok());
    }

    #[tokio::test]
    async fn test_spawned_cleaner_stops_on_shutdown() {
        let store = Arc::new(MemoryUserStore::new());
        seed(&store, "stale", chrono::Duration::minutes(30)).await;

        let (tx, rx) = watch::channel(false);
        let handle = SessionCleaner::new(
            store.clone(),
            Duration::from_secs(600),
            Duration::from_millis(10),
        )
        .spawn(rx);

        // The first tick fires immediately.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.session_count(), 0);

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("cleaner did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn test_zero_interval_is_clamped() {
        let store = Arc::new(MemoryUserStore::new());
        seed(&store, "stale", chrono::Duration::minutes(30)).await;

        let (tx, rx) = watch::channel(false);
        let handle = SessionCleaner::new(store.clone(), Duration::from_secs(600), Duration::ZERO)
            .spawn(rx);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.session_count(), 0);
        assert!(!handle.is_finished());

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("cleaner did not stop")
            .unwrap();
    }
}
