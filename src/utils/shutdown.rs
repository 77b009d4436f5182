use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tokio::time::Duration;
use tracing::{error, info, warn};

/// Fans the shutdown signal out to background tasks and counts in-flight requests.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    shutdown_tx: watch::Sender<bool>,
    in_flight: Arc<AtomicUsize>,
    shutting_down: Arc<AtomicBool>,
}

/// Decrements the in-flight count when dropped.
pub struct InFlight {
    counter: Arc<AtomicUsize>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            shutdown_tx,
            in_flight: Arc::new(AtomicUsize::new(0)),
            shutting_down: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn enter(&self) -> InFlight {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        InFlight {
            counter: self.in_flight.clone(),
        }
    }

    pub fn trigger(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
        self.shutdown_tx.send_replace(true);
    }

    /// Signals shutdown and waits up to `timeout` for in-flight requests to finish.
    pub async fn drain(&self, timeout: Duration) {
        info!("Starting graceful shutdown process");
        self.trigger();

        let start = std::time::Instant::now();
        loop {
            let active = self.in_flight();
            if active == 0 {
                info!("All requests have completed");
                break;
            }
            if start.elapsed() >= timeout {
                warn!("Graceful shutdown timeout reached. {} requests still active", active);
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_flight_guard() {
        let coordinator = ShutdownCoordinator::new();
        {
            let _a = coordinator.enter();
            let _b = coordinator.enter();
            assert_eq!(coordinator.in_flight(), 2);
        }
        assert_eq!(coordinator.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_trigger_notifies_subscribers() {
        let coordinator = ShutdownCoordinator::new();
        let mut rx = coordinator.subscribe();
        assert!(!coordinator.is_shutting_down());

        coordinator.trigger();
        rx.changed().await.unwrap();
        assert!(*rx.borrow());
        assert!(coordinator.is_shutting_down());
    }

    #[tokio::test]
    async fn test_drain_times_out_with_active_requests() {
        let coordinator = ShutdownCoordinator::new();
        let _guard = coordinator.enter();

        let start = std::time::Instant::now();
        coordinator.drain(Duration::from_millis(100)).await;
        assert!(start.elapsed() >= Duration::from_millis(90));
        assert!(coordinator.is_shutting_down());
    }
}
