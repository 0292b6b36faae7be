//! Cache service trait and error types.

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The backend could not be reached while connecting.
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    /// A command failed on an established connection.
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Read-through cache of short key -> long URL.
///
/// Mappings are immutable and never deleted, so an entry can never go stale
/// and there is no invalidation. Only store hits are written.
///
/// Failures are reported, not swallowed: callers treat an `Err` from
/// [`get_url`](Self::get_url) as a miss and fall back to the store.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis with a fixed TTL
/// - [`crate::infrastructure::cache::NullCache`] - caching disabled
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Cached long URL for `short_key`, `Ok(None)` on a miss.
    async fn get_url(&self, short_key: &str) -> CacheResult<Option<String>>;

    /// Caches `long_url` under `short_key`.
    async fn set_url(&self, short_key: &str, long_url: &str) -> CacheResult<()>;

    async fn health_check(&self) -> bool;

    /// Short backend name for health reporting.
    fn backend(&self) -> &'static str;
}
