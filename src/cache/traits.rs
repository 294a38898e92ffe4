//! Result and diagnostics types for the caching system.

use tokio::time::Instant;

/// Result from a cache operation, including data and metadata about the source.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: CacheSource,
  /// When the data was stored
  pub stored_at: Instant,
}

impl<T> CacheResult<T> {
  /// Create a new cache result from fresh network data.
  pub fn from_network(data: T, stored_at: Instant) -> Self {
    Self {
      data,
      source: CacheSource::Network,
      stored_at,
    }
  }

  /// Create a new cache result from a still-valid entry.
  pub fn from_cache(data: T, stored_at: Instant) -> Self {
    Self {
      data,
      source: CacheSource::Cache,
      stored_at,
    }
  }
}

/// Indicates where a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Fetched from the network on this call
  Network,
  /// Served from a cache entry within its TTL
  Cache,
}

/// Point-in-time view of the cache contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
  pub size: usize,
  /// Cached keys, sorted
  pub keys: Vec<String>,
}
