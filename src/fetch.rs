//! Fetch orchestration: cache, quota, and single-flight in front of upstream
//!
//! `fetch` is total over its input space. Upstream failures, empty bodies,
//! and an exhausted quota never surface as errors; they degrade to the last
//! cached body for the key, or to a small synthesized JSON payload when no
//! cached data exists. Callers therefore need no failure branches for this
//! layer.

use std::time::Duration;

use serde_json::json;
use tracing::{error, info, warn};

use crate::cache::{CacheEntry, CacheStore, DiskCache, MemoryCache};
use crate::config::FeedConfig;
use crate::quota::QuotaGuard;
use crate::singleflight::FlightGroup;
use crate::upstream::{HttpUpstream, Upstream, UpstreamError};

/// The guard every inbound request goes through before the upstream
///
/// Owns all coordination state (cache, quota counter, per-key locks) as
/// instance fields; construct one and hand it to request handlers by
/// reference or `Arc`.
pub struct FetchOrchestrator<U: Upstream> {
    upstream: U,
    memory: MemoryCache,
    durable: Option<DiskCache>,
    quota: QuotaGuard,
    flights: FlightGroup,
}

impl FetchOrchestrator<HttpUpstream> {
    /// Builds an orchestrator over a real HTTP upstream
    pub fn from_config(config: &FeedConfig) -> Result<Self, UpstreamError> {
        Ok(Self::new(HttpUpstream::from_config(config)?, config.daily_limit))
    }
}

impl<U: Upstream> FetchOrchestrator<U> {
    /// Creates an orchestrator with an in-memory cache only
    pub fn new(upstream: U, daily_limit: u32) -> Self {
        Self {
            upstream,
            memory: MemoryCache::new(),
            durable: None,
            quota: QuotaGuard::new(daily_limit),
            flights: FlightGroup::new(),
        }
    }

    /// Adds a durable store behind the in-memory cache
    ///
    /// Entries read back from it are promoted into memory; writes go to
    /// both. Its failures never reach `fetch` callers.
    pub fn with_durable(mut self, durable: DiskCache) -> Self {
        self.durable = Some(durable);
        self
    }

    /// Upstream calls consumed from today's budget
    pub fn calls_today(&self) -> u32 {
        self.quota.calls_today()
    }

    /// Fetches `url`, serving from cache whenever possible
    ///
    /// The full decision sequence:
    /// 1. rotate the quota day if it changed;
    /// 2. fresh cache hit: return it, no upstream call, no quota use;
    /// 3. enter the per-key exclusive section;
    /// 4. re-check the cache, another caller may have filled it while we
    ///    waited;
    /// 5. consume quota, or fall back to stale / a 429-shaped payload;
    /// 6. call upstream; store and return the body on success, fall back
    ///    to stale / a 500-shaped payload on an empty body or any failure.
    pub async fn fetch(&self, url: &str, ttl: Duration) -> String {
        self.quota.rotate_if_new_day();

        if let Some(entry) = self.lookup(url) {
            if !entry.is_expired() {
                return entry.body;
            }
        }

        let flight = self.flights.handle(url);
        let _guard = flight.lock().await;

        let stale = match self.lookup(url) {
            Some(entry) if !entry.is_expired() => return entry.body,
            other => other,
        };

        if !self.quota.try_consume() {
            warn!(url, "daily call limit reached, serving degraded response");
            return match stale {
                Some(entry) => entry.body,
                None => quota_payload(),
            };
        }

        info!(url, call = self.quota.calls_today(), "upstream call");

        match self.upstream.get(url).await {
            Ok(body) if body.trim().is_empty() => {
                warn!(url, "upstream returned an empty body");
                degrade(stale, "upstream returned an empty body")
            }
            Ok(body) => {
                self.store(url, &body, ttl);
                body
            }
            Err(err) => {
                error!(url, error = %err, "upstream call failed");
                degrade(stale, &err.to_string())
            }
        }
    }

    /// Cache lookup through both layers
    ///
    /// Memory first; on a miss the durable store is consulted and a hit is
    /// promoted so later lookups stay in-process.
    fn lookup(&self, key: &str) -> Option<CacheEntry> {
        if let Some(entry) = self.memory.get(key) {
            return Some(entry);
        }

        let entry = self.durable.as_ref()?.get(key)?;
        self.memory.insert(key, entry.clone());
        Some(entry)
    }

    fn store(&self, key: &str, body: &str, ttl: Duration) {
        self.memory.set(key, body, ttl);
        if let Some(durable) = &self.durable {
            durable.set(key, body, ttl);
        }
    }
}

/// Serves a stale body when one exists, a 500-shaped payload otherwise
fn degrade(stale: Option<CacheEntry>, reason: &str) -> String {
    match stale {
        Some(entry) => {
            info!("serving stale cache entry after upstream failure");
            entry.body
        }
        None => failure_payload(reason),
    }
}

/// Body returned when the daily ceiling is hit and nothing is cached
fn quota_payload() -> String {
    json!({
        "error": true,
        "status": 429,
        "message": "daily upstream call limit reached",
    })
    .to_string()
}

/// Body returned when the upstream failed and nothing is cached
fn failure_payload(reason: &str) -> String {
    json!({
        "error": true,
        "status": 500,
        "message": reason,
    })
    .to_string()
}
