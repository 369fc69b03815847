//! Cached fetch layer
//!
//! `fetch_json` is the only way handlers reach an upstream API: it checks the
//! shared cache, goes to the network on a miss and stores what came back.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::cache::{cache_key, CacheStats, CacheStore};
use crate::error::{ProxyError, Result};
use crate::upstream::Transport;

// == Cached Fetcher ==
/// Fetches upstream JSON through a shared TTL cache.
///
/// Cloning is cheap; every clone shares the same cache and transport.
/// The cache lock is released while the upstream request is in flight, so
/// two concurrent misses for one key both go upstream and the later write
/// wins.
#[derive(Clone)]
pub struct CachedFetcher {
    cache: Arc<RwLock<CacheStore>>,
    transport: Arc<dyn Transport>,
}

impl CachedFetcher {
    pub fn new(cache: CacheStore, transport: Arc<dyn Transport>) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            transport,
        }
    }

    // == Fetch JSON ==
    /// Returns the parsed JSON for `GET url?params`, from cache when possible.
    ///
    /// # Errors
    /// - [`ProxyError::Transport`] when the upstream cannot be reached
    /// - [`ProxyError::UpstreamHttp`] on a non-2xx status
    /// - [`ProxyError::UpstreamFormat`] when the body is not JSON
    ///
    /// Failed fetches are not cached.
    pub async fn fetch_json(&self, url: &str, params: &[(&str, &str)]) -> Result<Value> {
        let key = cache_key(url, params);

        // Write lock: a hit updates LRU order and stats
        let cached = self.cache.write().await.get(&key);
        if let Some(value) = cached {
            debug!(url, "cache hit");
            return Ok(value);
        }

        info!(url, "cache miss, fetching upstream");
        let response = self.transport.get(url, params).await?;

        if !response.is_success() {
            return Err(ProxyError::UpstreamHttp {
                status: response.status,
                url: url.to_string(),
            });
        }

        let value: Value = serde_json::from_slice(&response.body)
            .map_err(|e| ProxyError::UpstreamFormat(format!("{} ({})", e, url)))?;

        self.cache.write().await.insert(key, value.clone());
        Ok(value)
    }

    /// Snapshot of the cache counters.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }
}
