//! Redis-backed cache.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError};
use tracing::{debug, info};

use super::service::{CacheError, CacheResult, CacheService};

/// Namespace for all keys written by this service.
const KEY_PREFIX: &str = "shortkey:";

fn cache_key(short_key: &str) -> String {
    format!("{KEY_PREFIX}{short_key}")
}

fn connection_error(context: &str) -> impl FnOnce(RedisError) -> CacheError + '_ {
    move |e| CacheError::ConnectionError(format!("{context}: {e}"))
}

fn operation_error(command: &'static str) -> impl FnOnce(RedisError) -> CacheError {
    move |e| CacheError::OperationError(format!("{command} failed: {e}"))
}

/// Caches mappings as plain string values with a fixed expiry.
///
/// The TTL does not guard freshness (mappings never change); it only keeps
/// rarely used keys from accumulating.
pub struct RedisCache {
    conn: ConnectionManager,
    ttl_seconds: u64,
}

impl RedisCache {
    /// Opens a managed connection and checks it with `PING`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is malformed or the
    /// server does not answer.
    pub async fn connect(redis_url: &str, ttl_seconds: u64) -> CacheResult<Self> {
        let client = Client::open(redis_url).map_err(connection_error("Invalid Redis URL"))?;
        let mut conn = ConnectionManager::new(client)
            .await
            .map_err(connection_error("Redis unreachable"))?;

        conn.ping::<()>()
            .await
            .map_err(connection_error("Redis PING failed"))?;

        info!(ttl_seconds, "Redis cache ready");
        Ok(Self { conn, ttl_seconds })
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, short_key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();
        let cached: Option<String> = conn
            .get(cache_key(short_key))
            .await
            .map_err(operation_error("GET"))?;

        debug!(short_key, hit = cached.is_some(), "Cache lookup");
        Ok(cached)
    }

    async fn set_url(&self, short_key: &str, long_url: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(cache_key(short_key), long_url, self.ttl_seconds)
            .await
            .map_err(operation_error("SETEX"))
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
