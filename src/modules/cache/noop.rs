use async_trait::async_trait;
use std::time::Duration;

use super::CacheStore;

/// Always-miss cache used when no cache store is reachable
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpCache;

#[async_trait]
impl CacheStore for NoOpCache {
    async fn get(&self, _key: &str) -> Option<String> {
        None
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) {}
}
