mod app;
mod config;
mod error;
mod frontend;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;
mod state;
mod tests;
mod utils;

use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Settings;
use services::SessionCleaner;
use utils::{shutdown_signal, ShutdownCoordinator};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "malicious_mango=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load configuration ({}), using defaults", e);
        Settings::default()
    });

    tracing::info!("Starting server...");
    tracing::info!("Configuration: {:?}", settings);

    let store = app::connect_store(&settings).await;
    let coordinator = ShutdownCoordinator::new();

    let cleaner = store.clone().map(|store| {
        SessionCleaner::new(
            store,
            Duration::from_secs(settings.session.idle_timeout_secs),
            Duration::from_secs(settings.session.clean_interval_secs),
        )
        .spawn(coordinator.subscribe())
    });

    let state = app::build_state(&settings, store.clone(), coordinator.clone());
    let app = app::build_app(state, settings.upload.max_body_bytes);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    let shutdown = {
        let coordinator = coordinator.clone();
        async move {
            shutdown_signal().await;
            coordinator.trigger();
        }
    };
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    coordinator.drain(SHUTDOWN_GRACE).await;
    if let Some(cleaner) = cleaner {
        if let Err(e) = cleaner.await {
            tracing::error!("Session cleaner ended abnormally: {}", e);
        }
    }
    if let Some(store) = store {
        store.close().await;
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}
