//! Product repository.
//!
//! Plain CRUD against the `products` collection. Caching is layered on top
//! by `ProductService`, never here.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::database::models::{Attributes, Product};
use crate::database::store::{ProductStore, new_product_id};
use crate::database::Database;
use crate::error::Result;

/// Stored shape of a product. The id lives in `_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProductDocument {
    #[serde(rename = "_id")]
    id: String,

    model: String,

    #[serde(default)]
    name: String,

    #[serde(default)]
    price: f64,

    #[serde(default)]
    specs: Attributes,

    #[serde(default)]
    warranty: Attributes,
}

impl ProductDocument {
    fn from_product(id: String, product: Product) -> Self {
        Self {
            id,
            model: product.model,
            name: product.name,
            price: product.price,
            specs: product.specs,
            warranty: product.warranty,
        }
    }
}

impl From<ProductDocument> for Product {
    fn from(doc: ProductDocument) -> Self {
        Self {
            id: Some(doc.id),
            model: doc.model,
            name: doc.name,
            price: doc.price,
            specs: doc.specs,
            warranty: doc.warranty,
        }
    }
}

/// Repository for products stored in MongoDB.
pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    pub fn new(db: &Database, collection: &str) -> Self {
        Self {
            collection: db.collection(collection),
        }
    }

    /// Create the secondary index used by model lookups.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let index = IndexModel::builder().keys(doc! { "model": 1 }).build();
        self.collection.create_index(index).await?;
        debug!("Ensured index on products.model");
        Ok(())
    }
}

#[async_trait]
impl ProductStore for MongoProductRepository {
    fn name(&self) -> &'static str {
        "mongodb"
    }

    async fn save(&self, product: Product) -> Result<Product> {
        let document = match product.id.clone() {
            None => {
                let document = ProductDocument::from_product(new_product_id(), product);
                self.collection.insert_one(&document).await?;
                debug!("Inserted product {}", document.id);
                document
            }
            Some(id) => {
                let document = ProductDocument::from_product(id, product);
                let options = mongodb::options::ReplaceOptions::builder()
                    .upsert(true)
                    .build();

                self.collection
                    .replace_one(doc! { "_id": document.id.as_str() }, &document)
                    .with_options(options)
                    .await?;
                debug!("Replaced product {}", document.id);
                document
            }
        };

        Ok(document.into())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>> {
        let result = self.collection.find_one(doc! { "_id": id }).await?;
        debug!("DB get product {}: {:?}", id, result.is_some());
        Ok(result.map(Product::from))
    }

    async fn find_by_model(&self, model: &str) -> Result<Vec<Product>> {
        let cursor = self.collection.find(doc! { "model": model }).await?;
        let documents: Vec<ProductDocument> = cursor.try_collect().await?;
        debug!("DB found {} products for model {}", documents.len(), model);
        Ok(documents.into_iter().map(Product::from).collect())
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        debug!("Deleted product {}: {}", id, result.deleted_count > 0);
        Ok(())
    }
}
