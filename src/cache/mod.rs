//! In-memory response cache with time-to-live semantics.
//!
//! This module provides an API-agnostic caching mechanism that:
//! - Stores one entry per normalized request key, replaced wholesale on refetch
//! - Treats entries as valid only while younger than the configured TTL
//! - Never sweeps stale entries; they are simply ignored at read time
//! - Reports diagnostics from a snapshot of the key set

mod layer;
mod storage;
mod traits;

pub use layer::CacheLayer;
pub use storage::{CacheEntry, CacheStorage, MemoryStorage, NoopStorage};
pub use traits::{CacheResult, CacheSource, CacheStats};
