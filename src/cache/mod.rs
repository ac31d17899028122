//! Cache storage for upstream API responses
//!
//! Pure storage with no policy: entries map a request URL to a response body
//! and an expiry instant. Expired entries are kept and returned so callers
//! can fall back to stale data when the upstream is unavailable or the daily
//! quota is exhausted. Two interchangeable backends are provided: an
//! in-process map (lost on restart) and a disk-backed store that survives
//! restarts and swallows its own I/O failures.

mod disk;
mod memory;

pub use disk::DiskCache;
pub use memory::MemoryCache;

use std::time::Duration;

use chrono::{DateTime, Utc};

/// A single cached upstream response
///
/// Entries are replaced wholesale on refresh; body and expiry are always
/// written together, so no torn entry is ever observable.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The raw response body
    pub body: String,
    /// Instant after which the entry counts as stale
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Creates an entry expiring `ttl` from now
    pub fn new(body: impl Into<String>, ttl: Duration) -> Self {
        Self {
            body: body.into(),
            expires_at: expiry_after(ttl),
        }
    }

    /// Whether the entry is past its TTL
    ///
    /// Stale entries are still usable as a degraded fallback; this only
    /// marks them unfit for the fresh-cache fast path.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Key-to-entry storage behind the fetch layer
///
/// `get` returns the entry whether or not it has expired; absence and
/// expiry are distinct signals. `set` replaces any previous entry for the
/// key. Implementations must be safe for concurrent use.
pub trait CacheStore: Send + Sync {
    /// Returns the entry for `key`, expired or not
    fn get(&self, key: &str) -> Option<CacheEntry>;

    /// Stores `body` under `key` with the given time-to-live
    fn set(&self, key: &str, body: &str, ttl: Duration);
}

/// Converts a TTL into an absolute expiry, saturating on overflow
fn expiry_after(ttl: Duration) -> DateTime<Utc> {
    let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
    Utc::now().checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC)
}
