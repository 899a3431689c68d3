//! ItemStore HTTP server
//!
//! Thin axum layer over the catalog: decodes JSON, converts prices between
//! decimal major units and integer minor units, and maps catalog errors to
//! status codes.

pub mod handlers;
pub mod routes;

use axum::{extract::DefaultBodyLimit, extract::Extension, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};

pub use crate::config::ServerConfig;
use crate::storage::ItemStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ItemStore>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn ItemStore>, config: ServerConfig) -> Self {
        Self { store, config }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish()
    }
}

/// Build the router with all routes and layers
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    let app = Router::new()
        .merge(routes::store_routes())
        .merge(routes::health_routes())
        .layer(Extension(Arc::new(state)))
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeout_secs)))
        .layer(TraceLayer::new_for_http());

    if config.enable_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Start the ItemStore HTTP server
pub async fn start_server(config: ServerConfig, store: Arc<dyn ItemStore>) -> anyhow::Result<()> {
    info!(
        addr = %config.http_addr,
        port = config.http_port,
        "Starting ItemStore HTTP server"
    );

    crate::metrics::init_metrics();
    crate::metrics::set_live_items(store.stats().live_records);

    let addr = format!("{}:{}", config.http_addr, config.http_port);
    let app = build_router(AppState::new(store, config));

    let listener = TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Metrics: http://{}/_metrics", addr);
    info!("Health: http://{}/_health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!(error = %e, "Server error");
            anyhow::anyhow!("Server failed: {}", e)
        })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
