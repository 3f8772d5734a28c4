//! API Handlers
//!
//! HTTP request handlers mapping the product endpoints onto `ProductService`.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use super::error::{ApiError, Result};
use crate::cache::CacheStatsSnapshot;
use crate::database::Product;
use crate::service::ProductService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<ProductService>,
}

impl AppState {
    pub fn new(products: Arc<ProductService>) -> Self {
        Self { products }
    }
}

fn validate(product: &Product) -> Result<()> {
    if !product.has_model() {
        return Err(ApiError::InvalidRequest("model must not be blank".to_string()));
    }
    Ok(())
}

/// Handler for POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    Json(product): Json<Product>,
) -> Result<Json<Product>> {
    validate(&product)?;
    let created = state.products.create_product(product).await?;
    Ok(Json(created))
}

/// Handler for GET /api/products/:id
///
/// Responds 404 with an empty body when the product does not exist.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let response = match state.products.get_product_by_id(&id).await? {
        Some(product) => Json(product).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    };
    Ok(response)
}

/// Handler for GET /api/products/model/:model
pub async fn get_products_by_model(
    State(state): State<AppState>,
    Path(model): Path<String>,
) -> Result<Json<Vec<Product>>> {
    let products = state.products.get_products_by_model(&model).await?;
    Ok(Json(products))
}

/// Handler for PUT /api/products/:id
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(product): Json<Product>,
) -> Result<Json<Product>> {
    validate(&product)?;
    let updated = state.products.update_product(&id, product).await?;
    Ok(Json(updated))
}

/// Handler for DELETE /api/products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.products.delete_product(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStatsSnapshot> {
    Json(state.products.stats())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
