//! Product Cache - cache-aside product catalog
//!
//! Serves a product catalog stored in MongoDB, with single-product reads
//! cached in Redis.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `database` - Product model and store adapters (MongoDB, in-memory)
//! - `cache` - Cache clients (Redis, Moka), populate guard, statistics
//! - `service` - `ProductService`, the cache-aside coordinator
//! - `api` - Axum HTTP transport

pub mod api;
pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod service;

pub use api::{AppState, create_router};
pub use config::Config;
pub use error::{Error, Result};
pub use service::ProductService;
