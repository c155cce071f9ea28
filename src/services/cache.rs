//! Read replicas of backend lists.
//!
//! Each entry has a single writer: the fetch path. Mutations never write
//! into the cache; they only mark an entry stale and wake the polling loops
//! so the next fetch replaces it.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tokio::sync::Notify;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    fetched_at: Instant,
    stale: bool,
}

pub struct QueryCache<K, V> {
    entries: RwLock<HashMap<K, Entry<V>>>,
    invalidated: Arc<Notify>,
}

impl<K, V> Default for QueryCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            invalidated: Arc::new(Notify::new()),
        }
    }

    /// The cached value if it has not been invalidated and is younger than
    /// `max_age`.
    pub fn fresh(&self, key: &K, max_age: Duration) -> Option<V> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .filter(|entry| !entry.stale && entry.fetched_at.elapsed() < max_age)
            .map(|entry| entry.value.clone())
    }

    /// Last fetched value regardless of freshness.
    pub fn snapshot(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).map(|entry| entry.value.clone())
    }

    pub fn is_stale(&self, key: &K) -> bool {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).map_or(true, |entry| entry.stale)
    }

    pub fn store(&self, key: K, value: V) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key,
            Entry {
                value,
                fetched_at: Instant::now(),
                stale: false,
            },
        );
    }

    /// Forces the next read of `key` to go to the backend.
    pub fn invalidate(&self, key: &K) {
        {
            let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
            if let Some(entry) = entries.get_mut(key) {
                entry.stale = true;
            }
        }
        self.invalidated.notify_waiters();
    }

    /// Handle the polling loops wait on for out-of-band refreshes.
    pub fn invalidation_signal(&self) -> Arc<Notify> {
        Arc::clone(&self.invalidated)
    }
}
