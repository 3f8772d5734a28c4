//! Repository module - MongoDB-backed data access layer.

mod product_repository;

pub use product_repository::MongoProductRepository;
