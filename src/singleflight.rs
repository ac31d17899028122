//! Per-key request coordination ("single-flight")
//!
//! Collapses concurrent fetches of one cache key into a single upstream
//! call: the first caller through a key's mutex does the work, the rest
//! wait and then re-check the cache instead of repeating it.
//!
//! Handles are kept for the lifetime of the group. Removing a handle while
//! a late arrival already holds a reference to it would leave two
//! independent mutexes for the same key and defeat the deduplication. Key
//! cardinality here is the bounded endpoint catalog, so the registry stays
//! small without eviction.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Mutex as AsyncMutex;

/// Registry of per-key coordination handles
#[derive(Debug, Default)]
pub struct FlightGroup {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl FlightGroup {
    /// Creates an empty group
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the coordination handle for `key`, creating it on first use
    ///
    /// Every caller asking for the same key gets a clone of the same
    /// `Arc`, so locking it serializes them.
    pub fn handle(&self, key: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(key.to_string()).or_default().clone()
    }

    /// Number of keys with a registered handle
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no key has a handle yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use futures::future::join_all;

    #[test]
    fn test_same_key_returns_the_same_handle() {
        let group = FlightGroup::new();
        let first = group.handle("k");
        let second = group.handle("k");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn test_distinct_keys_get_distinct_handles() {
        let group = FlightGroup::new();
        let a = group.handle("a");
        let b = group.handle("b");
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn test_handles_are_never_discarded() {
        let group = FlightGroup::new();
        let first = group.handle("k");
        drop(first);

        // A late arrival still attaches to the original handle.
        let second = group.handle("k");
        let third = group.handle("k");
        assert!(Arc::ptr_eq(&second, &third));
        assert_eq!(group.len(), 1);
    }

    #[tokio::test]
    async fn test_critical_sections_for_one_key_never_overlap() {
        let group = Arc::new(FlightGroup::new());
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let group = Arc::clone(&group);
                let in_flight = Arc::clone(&in_flight);
                let max_seen = Arc::clone(&max_seen);
                tokio::spawn(async move {
                    let handle = group.handle("shared");
                    let _guard = handle.lock().await;
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    max_seen.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(2)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        join_all(tasks).await;
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_different_keys_run_concurrently() {
        let group = Arc::new(FlightGroup::new());
        let a = group.handle("a");
        let b = group.handle("b");

        let _guard_a = a.lock().await;
        // Holding "a" must not block "b".
        let guard_b = tokio::time::timeout(Duration::from_millis(50), b.lock()).await;
        assert!(guard_b.is_ok());
    }
}
