//! Error types shared by the store adapters, cache clients and the
//! product service.

use thiserror::Error;

/// Boxed source error from a backing service client.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures surfaced by product operations.
///
/// A missing product is not an error: reads return `None` and
/// update/delete treat it as a normal outcome.
#[derive(Debug, Error)]
pub enum Error {
    /// The document store could not complete the request.
    #[error("document store unavailable: {0}")]
    StoreUnavailable(#[source] BoxError),

    /// The cache could not complete the request.
    #[error("cache unavailable: {0}")]
    CacheUnavailable(#[source] BoxError),

    /// A product could not be encoded for, or decoded from, the cache.
    #[error("cached product serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Build a `CacheUnavailable` from a plain message.
    pub fn cache(msg: impl Into<String>) -> Self {
        let msg: String = msg.into();
        Self::CacheUnavailable(msg.into())
    }

    /// Build a `StoreUnavailable` from a plain message.
    pub fn store(msg: impl Into<String>) -> Self {
        let msg: String = msg.into();
        Self::StoreUnavailable(msg.into())
    }
}

impl From<mongodb::error::Error> for Error {
    fn from(err: mongodb::error::Error) -> Self {
        Self::StoreUnavailable(Box::new(err))
    }
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Self::CacheUnavailable(Box::new(err))
    }
}

/// Convenience result type for product operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let err = Error::cache("connection refused");
        assert!(matches!(err, Error::CacheUnavailable(_)));
        assert_eq!(err.to_string(), "cache unavailable: connection refused");

        let err = Error::store("timed out");
        assert!(matches!(err, Error::StoreUnavailable(_)));
        assert_eq!(err.to_string(), "document store unavailable: timed out");
    }

    #[test]
    fn test_serde_error_converts() {
        let parse = serde_json::from_slice::<serde_json::Value>(b"{not json").unwrap_err();
        let err: Error = parse.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
