//! MongoDB connection for the product store.

use mongodb::{Client, Collection, bson::doc, options::ClientOptions};
use tracing::info;

use super::MongoProductRepository;
use crate::error::Result;

const APP_NAME: &str = "product-cache";

/// Connected MongoDB client scoped to one database.
#[derive(Debug, Clone)]
pub struct Database {
    client: Client,
    db: mongodb::Database,
}

impl Database {
    /// Connect and ping `db_name`, failing fast if the server is unreachable.
    ///
    /// # Errors
    /// Returns `StoreUnavailable` if the URI is invalid or the ping fails.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some(APP_NAME.to_string());

        let client = Client::with_options(options)?;
        let db = client.database(db_name);
        db.run_command(doc! { "ping": 1 }).await?;

        info!(database = db_name, "Connected to MongoDB");
        Ok(Self { client, db })
    }

    /// Open the products collection, creating its indexes.
    pub async fn products(&self, collection: &str) -> Result<MongoProductRepository> {
        let repo = MongoProductRepository::new(self, collection);
        repo.ensure_indexes().await?;
        info!(collection, "Products collection ready");
        Ok(repo)
    }

    pub(crate) fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    /// Close the client, waiting for in-flight operations to finish.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        info!("MongoDB client shut down");
    }
}
