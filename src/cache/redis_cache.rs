//! Redis cache client.
//!
//! Uses a `ConnectionManager`, which reconnects on its own. The client owns
//! the connection until `close` is called; afterwards every call fails with
//! `CacheUnavailable`.

use async_trait::async_trait;
use parking_lot::Mutex;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::info;

use super::CacheClient;
use crate::error::{Error, Result};

/// Cache client backed by Redis.
pub struct RedisCacheClient {
    conn: Mutex<Option<ConnectionManager>>,
}

impl RedisCacheClient {
    /// Connect to the Redis server at `url` (e.g. `redis://localhost:6379`).
    ///
    /// # Errors
    /// Returns error if the URL is invalid or the server is unreachable.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        info!("Successfully connected to Redis");

        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }

    /// Take a handle to the shared connection.
    ///
    /// The lock is released before any command is awaited.
    fn connection(&self) -> Result<ConnectionManager> {
        self.conn
            .lock()
            .clone()
            .ok_or_else(|| Error::cache("redis client is closed"))
    }
}

#[async_trait]
impl CacheClient for RedisCacheClient {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.connection()?;
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> Result<()> {
        let mut conn = self.connection()?;
        let _: () = conn.set_ex(key, value, ttl_secs).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection()?;
        let _: () = conn.del(key).await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        if self.conn.lock().take().is_some() {
            info!("Redis connection released");
        }
        Ok(())
    }
}

impl std::fmt::Debug for RedisCacheClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheClient")
            .field("open", &self.conn.lock().is_some())
            .finish()
    }
}
