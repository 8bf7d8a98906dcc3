//! Key/value cache gateway.
//!
//! Caching is strictly best-effort: an unreachable store behaves like an
//! empty cache, writes are dropped silently, and no error ever reaches the
//! request path. The concrete store is chosen once at startup.

mod noop;
mod redis_cache;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub use noop::NoOpCache;
pub use redis_cache::RedisCache;

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Cached value, `None` on a miss or when the store is unavailable
    async fn get(&self, key: &str) -> Option<String>;

    /// Stores a value with a TTL; failures are logged and ignored
    async fn set(&self, key: &str, value: &str, ttl: Duration);
}

/// Connects to Redis, falling back to [`NoOpCache`] when it is unreachable
pub async fn connect(redis_url: &str) -> Arc<dyn CacheStore> {
    match RedisCache::connect(redis_url).await {
        Ok(cache) => {
            tracing::info!("Redis cache connected");
            Arc::new(cache)
        }
        Err(e) => {
            tracing::warn!(
                "Redis unavailable ({}), continuing without cache: {}",
                crate::core::database::redacted_url(redis_url),
                e
            );
            Arc::new(NoOpCache)
        }
    }
}
