//! Database module exports.

mod memory;
mod models;
mod mongo;
mod repository;
mod store;

pub use memory::MemoryProductStore;
pub use models::*;
pub use mongo::Database;
pub use repository::MongoProductRepository;
pub use store::{ProductStore, new_product_id};
