//! In-process product store.
//!
//! Keeps products in insertion order. Used for local runs without MongoDB
//! and as the store behind the service tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use super::models::Product;
use super::store::{ProductStore, new_product_id};
use crate::error::Result;

#[derive(Debug, Default)]
struct Inner {
    /// id -> (insertion sequence, product)
    products: HashMap<String, (u64, Product)>,
    next_seq: u64,
}

/// Product store backed by a `HashMap` behind a `parking_lot::RwLock`.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    inner: RwLock<Inner>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored products.
    pub fn len(&self) -> usize {
        self.inner.read().products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn save(&self, mut product: Product) -> Result<Product> {
        let id = product.id.get_or_insert_with(new_product_id).clone();

        let mut inner = self.inner.write();
        // Replacing keeps the original insertion position.
        let existing = inner.products.get(&id).map(|(seq, _)| *seq);
        let seq = match existing {
            Some(seq) => seq,
            None => {
                inner.next_seq += 1;
                inner.next_seq
            }
        };
        inner.products.insert(id.clone(), (seq, product.clone()));

        debug!("Saved product {} to memory store", id);
        Ok(product)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>> {
        Ok(self.inner.read().products.get(id).map(|(_, p)| p.clone()))
    }

    async fn find_by_model(&self, model: &str) -> Result<Vec<Product>> {
        let inner = self.inner.read();
        let mut matches: Vec<&(u64, Product)> = inner
            .products
            .values()
            .filter(|(_, p)| p.model == model)
            .collect();
        matches.sort_by_key(|(seq, _)| *seq);

        Ok(matches.into_iter().map(|(_, p)| p.clone()).collect())
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        let removed = self.inner.write().products.remove(id).is_some();
        debug!("Deleted product {} from memory store: {}", id, removed);
        Ok(())
    }
}
