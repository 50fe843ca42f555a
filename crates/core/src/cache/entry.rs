//! Expirable value holder shared by the in-memory caches.

use std::time::Duration;

use tokio::time::Instant;

/// How long a cached value stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLifetime {
    /// Entries never expire by time; only an explicit clear removes them.
    Never,
    /// Entries expire once they are older than the given duration.
    After(Duration),
}

impl CacheLifetime {
    /// Build a lifetime from a minute count where 0 or less means "never".
    pub fn from_minutes(minutes: i64) -> Self {
        if minutes <= 0 {
            Self::Never
        } else {
            Self::After(Duration::from_secs(minutes.unsigned_abs().saturating_mul(60)))
        }
    }

    /// Whether values with this lifetime can expire at all.
    pub fn expires(&self) -> bool {
        matches!(self, Self::After(_))
    }

    /// Whether something of the given age has outlived this lifetime.
    pub fn is_elapsed(&self, age: Duration) -> bool {
        match self {
            Self::Never => false,
            Self::After(ttl) => age > *ttl,
        }
    }
}

/// A cached value together with the instant it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub created_at: Instant,
}

impl<T> CacheEntry<T> {
    /// Wrap a value stamped with the current instant.
    pub fn new(value: T) -> Self {
        Self { value, created_at: Instant::now() }
    }

    /// Check whether the entry has outlived `lifetime`.
    pub fn is_expired(&self, lifetime: CacheLifetime) -> bool {
        lifetime.is_elapsed(self.created_at.elapsed())
    }
}
