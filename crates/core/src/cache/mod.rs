//! In-memory caching primitives.
//!
//! - `CacheEntry` / `CacheLifetime`: expirable value holder
//! - `ExpiringCache`: case-insensitive query cache with TTL and sweeping
//! - `hash`: fingerprints for derived-asset markers

pub mod entry;
pub mod hash;
pub mod memory;

pub use entry::{CacheEntry, CacheLifetime};
pub use memory::{ExpiringCache, cache_key};
