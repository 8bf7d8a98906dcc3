use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;
use tokio::time::timeout;

use super::CacheStore;

/// Upper bound for a single cache round trip
const OPERATION_TIMEOUT: Duration = Duration::from_secs(2);

/// Upper bound for the initial connection attempt
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum RedisConnectError {
    #[error("{0}")]
    Redis(#[from] redis::RedisError),

    #[error("connection attempt timed out")]
    Timeout,
}

/// Redis-backed cache over a multiplexed, auto-reconnecting connection
#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    pub async fn connect(url: &str) -> Result<Self, RedisConnectError> {
        let client = redis::Client::open(url)?;
        let mut manager = timeout(CONNECT_TIMEOUT, ConnectionManager::new(client))
            .await
            .map_err(|_| RedisConnectError::Timeout)??;

        let _: String = timeout(CONNECT_TIMEOUT, redis::cmd("PING").query_async(&mut manager))
            .await
            .map_err(|_| RedisConnectError::Timeout)??;

        Ok(Self { manager })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.manager.clone();
        match timeout(OPERATION_TIMEOUT, conn.get::<_, Option<String>>(key)).await {
            Ok(Ok(value)) => {
                tracing::debug!(
                    "Cache {} for {}",
                    if value.is_some() { "hit" } else { "miss" },
                    key
                );
                value
            }
            Ok(Err(e)) => {
                tracing::warn!("Cache read failed for {}: {}", key, e);
                None
            }
            Err(_) => {
                tracing::warn!("Cache read timed out for {}", key);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) {
        let mut conn = self.manager.clone();
        let ttl_secs = ttl.as_secs().max(1);
        match timeout(
            OPERATION_TIMEOUT,
            conn.set_ex::<_, _, ()>(key, value, ttl_secs),
        )
        .await
        {
            Ok(Ok(())) => tracing::debug!("Cached {} for {}s", key, ttl_secs),
            Ok(Err(e)) => tracing::warn!("Cache write failed for {}: {}", key, e),
            Err(_) => tracing::warn!("Cache write timed out for {}", key),
        }
    }
}
