//! Store adapter contract.

use async_trait::async_trait;

use super::models::Product;
use crate::error::Result;

/// Durable CRUD over products, keyed by product id.
///
/// Implementations hold no caching logic.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Insert when `product.id` is absent (assigning a fresh id), otherwise
    /// replace the document with that id. Last write wins.
    async fn save(&self, product: Product) -> Result<Product>;

    /// Exact match on id.
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>>;

    /// All products with the given model.
    async fn find_by_model(&self, model: &str) -> Result<Vec<Product>>;

    /// Remove the product with the given id. Missing ids are not an error.
    async fn delete_by_id(&self, id: &str) -> Result<()>;
}

/// Generate a fresh product id in the same format MongoDB would.
pub fn new_product_id() -> String {
    mongodb::bson::oid::ObjectId::new().to_hex()
}
