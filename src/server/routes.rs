//! HTTP routes definition

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Catalog routes
///
/// - POST /store/add     - Add a batch of items
/// - POST /store/search  - Search items by name prefix
/// - POST /store/delete  - Delete items by code
/// - GET  /store/stats   - Table and index statistics
/// - GET  /store/:code   - Fetch one item
pub fn store_routes() -> Router {
    Router::new()
        .route("/store/add", post(handlers::add_items))
        .route("/store/search", post(handlers::search_items))
        .route("/store/delete", post(handlers::delete_items))
        .route("/store/stats", get(handlers::catalog_stats))
        .route("/store/:code", get(handlers::fetch_item))
}

/// Health check routes
pub fn health_routes() -> Router {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/_health", get(handlers::health_check))
        .route("/_metrics", get(handlers::metrics_endpoint))
}
