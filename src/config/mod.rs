//! Configuration module for the product cache service.
//!
//! Loads configuration from environment variables. `main` loads `.env`
//! into the environment first.

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, bail};

use crate::cache::{CacheConfig, DEFAULT_MAX_CAPACITY};

/// Where products are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    MongoDb,
    Memory,
}

/// Where cached products live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackend {
    #[default]
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(Self::MongoDb),
            "memory" => Ok(Self::Memory),
            other => bail!("unknown STORE_BACKEND '{}'", other),
        }
    }
}

impl FromStr for CacheBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => bail!("unknown CACHE_BACKEND '{}'", other),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // HTTP
    pub server_port: u16,

    // Store
    pub store_backend: StoreBackend,
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub mongodb_collection: String,

    // Cache
    pub cache_backend: CacheBackend,
    pub redis_url: String,
    pub cache: CacheConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    /// Fails if `CACHE_TTL` is missing or any value does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let ttl_secs: u64 = var("CACHE_TTL")
            .context("CACHE_TTL must be set")?
            .trim()
            .parse()
            .context("CACHE_TTL must be a whole number of seconds")?;
        if ttl_secs == 0 {
            bail!("CACHE_TTL must be at least 1 second");
        }

        let max_capacity: u64 = match var("CACHE_MAX_CAPACITY") {
            Some(v) => v.trim().parse().context("CACHE_MAX_CAPACITY must be a number")?,
            None => DEFAULT_MAX_CAPACITY,
        };

        let populate_guard = match var("CACHE_POPULATE_GUARD") {
            Some(v) => parse_bool(&v).context("CACHE_POPULATE_GUARD must be true or false")?,
            None => true,
        };

        // REDIS_URL wins; otherwise build it from host and port
        let redis_url = match var("REDIS_URL") {
            Some(url) => url,
            None => {
                let host = var("REDIS_HOST").unwrap_or_else(|| "localhost".to_string());
                let port: u16 = match var("REDIS_PORT") {
                    Some(p) => p.trim().parse().context("REDIS_PORT must be a port number")?,
                    None => 6379,
                };
                format!("redis://{}:{}", host, port)
            }
        };

        let server_port: u16 = match var("SERVER_PORT") {
            Some(p) => p.trim().parse().context("SERVER_PORT must be a port number")?,
            None => 8080,
        };

        Ok(Self {
            server_port,
            store_backend: var("STORE_BACKEND")
                .map(|v| v.parse::<StoreBackend>())
                .transpose()?
                .unwrap_or_default(),
            mongodb_uri: var("MONGODB_URI")
                .unwrap_or_else(|| "mongodb://localhost:27017".to_string()),
            mongodb_database: var("MONGODB_DATABASE")
                .unwrap_or_else(|| "product_catalog".to_string()),
            mongodb_collection: var("MONGODB_COLLECTION")
                .unwrap_or_else(|| "products".to_string()),
            cache_backend: var("CACHE_BACKEND")
                .map(|v| v.parse::<CacheBackend>())
                .transpose()?
                .unwrap_or_default(),
            redis_url,
            cache: CacheConfig::with_ttl(ttl_secs)
                .max_capacity(max_capacity)
                .populate_guard(populate_guard),
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
