use crate::config::Settings;
use crate::frontend::{register_upload_button, DirectiveRegistry, RouteTable};
use crate::handlers::spa_fallback;
use crate::middleware::{cors_layer, logging, track_requests};
use crate::models::create_pool;
use crate::routes::*;
use crate::services::{
    AuthService, MemoryUserStore, MySqlUserStore, ProfileService, UploadService, UserStore,
};
use crate::state::AppState;
use crate::utils::ShutdownCoordinator;
use axum::handler::Handler;
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Database url selecting the process-local store instead of MySQL.
pub const MEMORY_DATABASE_URL: &str = "memory://";

/// Connects to MySQL when configured. Failure is logged and the server continues without a database.
pub async fn connect_store(settings: &Settings) -> Option<Arc<dyn UserStore>> {
    let Some(database) = &settings.database else {
        tracing::info!("No database configured, continuing without database");
        return None;
    };

    if database.url == MEMORY_DATABASE_URL {
        tracing::warn!("Using in-memory store, accounts are lost on restart");
        return Some(Arc::new(MemoryUserStore::new()));
    }

    match create_pool(&database.url, database.max_connections).await {
        Ok(pool) => {
            tracing::info!("Successfully connected to database");
            Some(Arc::new(MySqlUserStore::new(pool)))
        }
        Err(e) => {
            tracing::error!("Failed to connect to database: {}", e);
            tracing::warn!("Continuing without database");
            None
        }
    }
}

pub fn build_state(
    settings: &Settings,
    store: Option<Arc<dyn UserStore>>,
    shutdown_coordinator: ShutdownCoordinator,
) -> AppState {
    let mut directives = DirectiveRegistry::new();
    register_upload_button(&mut directives);

    let www_root = PathBuf::from(&settings.server.www_root);
    let auth_service = store
        .as_ref()
        .map(|store| Arc::new(AuthService::new(store.clone(), &settings.auth)));
    let profile_service = store.map(|store| Arc::new(ProfileService::new(store)));

    AppState {
        views: Arc::new(RouteTable::default_views()),
        directives: Arc::new(directives),
        auth_service,
        profile_service,
        upload_service: Arc::new(UploadService::new(www_root.clone())),
        shutdown_coordinator,
        www_root,
    }
}

pub fn build_app(state: AppState, max_body_bytes: usize) -> Router {
    // Files from the www root first, then the view table decides.
    let static_files =
        ServeDir::new(&state.www_root).fallback(spa_fallback.with_state(state.clone()));

    Router::new()
        .merge(create_health_routes())
        .merge(create_view_routes())
        .merge(create_auth_routes())
        .merge(create_profile_routes())
        .merge(create_upload_routes(max_body_bytes))
        .fallback_service(static_files)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer())
                .layer(CompressionLayer::new())
                .layer(axum::middleware::from_fn(logging::log_requests))
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    track_requests,
                )),
        )
        .with_state(state)
}
