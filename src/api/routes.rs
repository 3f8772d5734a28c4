//! API Routes
//!
//! Configures the Axum router with the product endpoints.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_product, delete_product, get_product, get_products_by_model, health_handler,
    stats_handler, update_product,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /api/products` - Create a product
/// - `GET /api/products/:id` - Get a product (cache-aside)
/// - `PUT /api/products/:id` - Replace a product and invalidate its cache entry
/// - `DELETE /api/products/:id` - Delete a product and invalidate its cache entry
/// - `GET /api/products/model/:model` - List products of a model (uncached)
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/products", post(create_product))
        .route(
            "/api/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/api/products/model/:model", get(get_products_by_model))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
