//! Cache layer that orchestrates TTL checks with network fetching.

use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use super::storage::{CacheEntry, CacheStorage};
use super::traits::{CacheResult, CacheStats};
use crate::pokeapi::ResourceResult;

/// Default time-to-live for cached responses.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Cache layer that manages TTL logic and network fetching.
///
/// This layer sits between the resource client and the fetcher. Entries
/// older than the TTL are refetched; a failed refetch is an error, the
/// stale entry is never served.
pub struct CacheLayer {
  storage: Arc<dyn CacheStorage>,
  ttl: Duration,
}

impl CacheLayer {
  /// Create a new cache layer with the given storage backend.
  pub fn new(storage: impl CacheStorage + 'static) -> Self {
    Self {
      storage: Arc::new(storage),
      ttl: DEFAULT_TTL,
    }
  }

  /// Set the time-to-live for cached data.
  pub fn with_ttl(mut self, ttl: Duration) -> Self {
    self.ttl = ttl;
    self
  }

  pub fn ttl(&self) -> Duration {
    self.ttl
  }

  fn is_fresh(&self, entry: &CacheEntry) -> bool {
    entry.stored_at.elapsed() < self.ttl
  }

  /// Fetch with a cache-first strategy.
  ///
  /// 1. If a fresh entry exists for `key`, return it without calling `fetcher`
  /// 2. Otherwise call `fetcher`, store its result under `key` with the
  ///    current timestamp, and return it
  /// 3. Fetch errors propagate and leave the cache untouched
  pub async fn fetch<F, Fut>(&self, key: &str, fetcher: F) -> ResourceResult<CacheResult<Arc<Value>>>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ResourceResult<Value>>,
  {
    if let Some(entry) = self.storage.get(key) {
      if self.is_fresh(&entry) {
        tracing::debug!(key, "cache hit");
        return Ok(CacheResult::from_cache(entry.payload, entry.stored_at));
      }
      tracing::debug!(key, "cache entry expired");
    } else {
      tracing::debug!(key, "cache miss");
    }

    let payload = Arc::new(fetcher().await?);
    let stored_at = Instant::now();
    self.storage.put(CacheEntry {
      key: key.to_string(),
      payload: Arc::clone(&payload),
      stored_at,
    });

    Ok(CacheResult::from_network(payload, stored_at))
  }

  /// Purge every entry.
  pub fn clear(&self) {
    self.storage.clear();
  }

  /// Size and keys, taken from a snapshot of the storage.
  pub fn stats(&self) -> CacheStats {
    let keys = self.storage.keys();
    CacheStats {
      size: keys.len(),
      keys,
    }
  }
}
