//! In-process cache backend
//!
//! Suitable for a single process. Hosts with a shared key/value store plug
//! in their own [`Cache`] implementation instead.

use dashmap::DashMap;
use polyglot_domain::traits::Cache;
use polyglot_domain::CacheKey;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|expires_at| now < expires_at)
    }
}

/// Hit and miss counters of a [`MemoryCache`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries currently held; expired ones count until read or purged
    pub entries: usize,
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that found nothing live
    pub misses: u64,
}

/// Concurrent cache with per-entry expiry, keyed by [`CacheKey::digest`]
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop expired entries; returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        before.saturating_sub(self.entries.len())
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Current counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Option<String> {
        let digest = key.digest();
        let now = Instant::now();

        if let Some(entry) = self.entries.get(&digest) {
            if entry.is_live(now) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.value.clone());
            }
            // Expired; a concurrent set may have replaced it meanwhile
            drop(entry);
            self.entries.remove_if(&digest, |_, entry| !entry.is_live(now));
            debug!(key = %digest, "Cache entry expired");
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    fn set(&self, key: &CacheKey, value: String, ttl: Option<Duration>) {
        let entry = Entry {
            value,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        self.entries.insert(key.digest(), entry);
    }

    fn delete(&self, key: &CacheKey) -> bool {
        self.entries.remove(&key.digest()).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn key(id: u64) -> CacheKey {
        CacheKey::new("test").field("id", id)
    }

    #[test]
    fn test_set_and_get() {
        let cache = MemoryCache::new();
        cache.set(&key(1), "one".into(), None);

        assert_eq!(cache.get(&key(1)).as_deref(), Some("one"));
        assert_eq!(cache.get(&key(2)), None);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_delete() {
        let cache = MemoryCache::new();
        cache.set(&key(1), "one".into(), None);

        assert!(cache.delete(&key(1)));
        assert!(!cache.delete(&key(1)));
        assert_eq!(cache.get(&key(1)), None);
    }

    #[test]
    fn test_entries_expire() {
        let cache = MemoryCache::new();
        cache.set(&key(1), "short".into(), Some(Duration::from_millis(10)));
        cache.set(&key(2), "forever".into(), None);

        thread::sleep(Duration::from_millis(30));

        assert_eq!(cache.get(&key(1)), None);
        assert_eq!(cache.get(&key(2)).as_deref(), Some("forever"));
        // The expired entry was dropped on read
        assert_eq!(cache.stats().entries, 1);
    }

    #[test]
    fn test_purge_expired() {
        let cache = MemoryCache::new();
        cache.set(&key(1), "a".into(), Some(Duration::from_millis(5)));
        cache.set(&key(2), "b".into(), Some(Duration::from_millis(5)));
        cache.set(&key(3), "c".into(), Some(Duration::from_secs(60)));

        thread::sleep(Duration::from_millis(20));

        assert_eq!(cache.purge_expired(), 2);
        assert_eq!(cache.stats().entries, 1);

        cache.clear();
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_overwrite_replaces_value_and_ttl() {
        let cache = MemoryCache::new();
        cache.set(&key(1), "old".into(), Some(Duration::from_millis(5)));
        cache.set(&key(1), "new".into(), None);

        thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get(&key(1)).as_deref(), Some("new"));
    }

    #[test]
    fn test_concurrent_writers_and_readers() {
        let cache = std::sync::Arc::new(MemoryCache::new());

        let handles: Vec<_> = (0..4u64)
            .map(|worker| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for id in 0..50 {
                        let key = key(worker * 100 + id);
                        cache.set(&key, id.to_string(), None);
                        assert_eq!(cache.get(&key), Some(id.to_string()));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = cache.stats();
        assert_eq!(stats.entries, 200);
        assert_eq!(stats.hits, 200);
        assert_eq!(stats.misses, 0);
    }
}
