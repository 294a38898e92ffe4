//! Cache storage trait and in-memory implementation.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::time::Instant;

/// A single cached response.
#[derive(Debug, Clone)]
pub struct CacheEntry {
  /// Normalized request key (path relative to the API base)
  pub key: String,
  /// The full decoded response body
  pub payload: Arc<Value>,
  /// When the response was stored
  pub stored_at: Instant,
}

/// Trait for cache storage backends.
pub trait CacheStorage: Send + Sync {
  /// Get the entry for a key, regardless of age.
  fn get(&self, key: &str) -> Option<CacheEntry>;

  /// Store an entry, replacing any previous entry with the same key.
  fn put(&self, entry: CacheEntry);

  /// Remove every entry.
  fn clear(&self);

  /// Snapshot of the stored keys.
  fn keys(&self) -> Vec<String>;
}

/// Storage implementation that doesn't cache anything.
/// Used when caching is disabled - all operations are no-ops.
pub struct NoopStorage;

impl CacheStorage for NoopStorage {
  fn get(&self, _key: &str) -> Option<CacheEntry> {
    None // Always miss
  }

  fn put(&self, _entry: CacheEntry) {}

  fn clear(&self) {}

  fn keys(&self) -> Vec<String> {
    Vec::new()
  }
}

/// HashMap-backed storage. Unbounded in the number of keys.
#[derive(Default)]
pub struct MemoryStorage {
  entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  // Every critical section is a single map operation, so a poisoned lock
  // cannot leave the map half-updated.
  fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl CacheStorage for MemoryStorage {
  fn get(&self, key: &str) -> Option<CacheEntry> {
    self.entries().get(key).cloned()
  }

  fn put(&self, entry: CacheEntry) {
    self.entries().insert(entry.key.clone(), entry);
  }

  fn clear(&self) {
    self.entries().clear();
  }

  fn keys(&self) -> Vec<String> {
    let mut keys: Vec<String> = self.entries().keys().cloned().collect();
    keys.sort();
    keys
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn entry(key: &str, payload: Value) -> CacheEntry {
    CacheEntry {
      key: key.to_string(),
      payload: Arc::new(payload),
      stored_at: Instant::now(),
    }
  }

  #[test]
  fn test_put_replaces_existing_entry() {
    let storage = MemoryStorage::new();
    storage.put(entry("/pokemon/1", json!({"name": "old"})));
    storage.put(entry("/pokemon/1", json!({"name": "new"})));

    let cached = storage.get("/pokemon/1").unwrap();
    assert_eq!(cached.payload["name"], "new");
    assert_eq!(storage.keys().len(), 1);
  }

  #[test]
  fn test_keys_are_sorted_snapshot() {
    let storage = MemoryStorage::new();
    storage.put(entry("/pokemon/b", json!({})));
    storage.put(entry("/pokemon/a", json!({})));

    let keys = storage.keys();
    storage.put(entry("/pokemon/c", json!({})));

    assert_eq!(keys, vec!["/pokemon/a", "/pokemon/b"]);
  }

  #[test]
  fn test_clear() {
    let storage = MemoryStorage::new();
    storage.put(entry("/pokemon/1", json!({})));
    storage.clear();
    assert!(storage.get("/pokemon/1").is_none());
    assert!(storage.keys().is_empty());
  }

  #[test]
  fn test_noop_storage_always_misses() {
    let storage = NoopStorage;
    storage.put(entry("/pokemon/1", json!({})));
    assert!(storage.get("/pokemon/1").is_none());
  }
}
