//! Durable cache persisted as JSON files
//!
//! Lets cached responses survive process restarts. Each entry is one JSON
//! record in an XDG-compliant cache directory (`~/.cache/cricfeed/` on
//! Linux), named by the SHA-256 of its key so arbitrary request URLs map to
//! valid file names. Persistence is best-effort: a failed read is a cache
//! miss and a failed write is a no-op, never an error for the caller.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

use super::{expiry_after, CacheEntry, CacheStore};

/// On-disk representation of a cache entry
#[derive(Debug, Serialize, Deserialize)]
struct DiskRecord {
    /// The cached response body
    body: String,
    /// Expiry instant in epoch milliseconds
    expires_at: i64,
    /// When the record was last written, ISO-8601
    updated_at: String,
}

/// File-backed response cache
///
/// Writes are confirmed before `set` returns, so a `get` issued afterwards
/// by the same process observes the new record.
#[derive(Debug, Clone)]
pub struct DiskCache {
    /// Directory where cache records are stored
    cache_dir: PathBuf,
}

impl DiskCache {
    /// Creates a cache under the XDG cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no
    /// home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "cricfeed")?;
        Some(Self {
            cache_dir: project_dirs.cache_dir().to_path_buf(),
        })
    }

    /// Creates a cache rooted at a specific directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Path of the record for `key`: SHA-256 hex of the key plus `.json`
    fn record_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.cache_dir.join(format!("{:x}.json", digest))
    }

    fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    fn try_set(&self, key: &str, body: &str, ttl: Duration) -> std::io::Result<()> {
        self.ensure_dir()?;

        let record = DiskRecord {
            body: body.to_string(),
            expires_at: expiry_after(ttl).timestamp_millis(),
            updated_at: Utc::now().to_rfc3339(),
        };

        let json = serde_json::to_string(&record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        fs::write(self.record_path(key), json)
    }
}

impl CacheStore for DiskCache {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        let path = self.record_path(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "durable cache read failed");
                return None;
            }
        };

        let record: DiskRecord = match serde_json::from_str(&content) {
            Ok(record) => record,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "durable cache record unreadable");
                return None;
            }
        };

        let expires_at = DateTime::from_timestamp_millis(record.expires_at)?;
        Some(CacheEntry {
            body: record.body,
            expires_at,
        })
    }

    fn set(&self, key: &str, body: &str, ttl: Duration) {
        if let Err(e) = self.try_set(key, body, ttl) {
            warn!(error = %e, "durable cache write failed");
        }
    }
}
