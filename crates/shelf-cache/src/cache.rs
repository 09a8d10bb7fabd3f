use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Instant;

use bytes::Bytes;
use shelf_types::AssetId;
use tracing::trace;

use crate::expiry::Expiry;

/// Default number of entries the cache admits before evicting.
pub const DEFAULT_CAPACITY: usize = 50;

struct Entry {
    blob: Bytes,
    deadline: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

#[derive(Default)]
struct Inner {
    entries: HashMap<AssetId, Entry>,
    /// Keys in insertion order; the eviction queue.
    order: VecDeque<AssetId>,
}

impl Inner {
    /// Drop one entry to make room. Expired entries are preferred; failing
    /// that, the oldest insertion goes.
    fn evict_one(&mut self, now: Instant) {
        let victim = self
            .order
            .iter()
            .position(|key| {
                self.entries
                    .get(key)
                    .map_or(true, |entry| entry.is_expired(now))
            })
            .unwrap_or(0);
        if let Some(key) = self.order.remove(victim) {
            self.entries.remove(&key);
            trace!(%key, "cache evicted");
        }
    }

    fn drop_key(&mut self, key: &AssetId) {
        self.entries.remove(key);
        self.order.retain(|k| k != key);
    }
}

/// Bounded, expiring map from asset identity to blob.
///
/// All methods take `&self`; internal mutation is serialized behind a
/// mutex, so one instance can be shared (via `Arc`) between concurrent
/// readers and writers without exceeding capacity or corrupting
/// bookkeeping.
pub struct AssetCache {
    capacity: usize,
    inner: Mutex<Inner>,
}

impl AssetCache {
    /// Create a cache with the default capacity of [`DEFAULT_CAPACITY`].
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a cache bounded to `capacity` entries.
    ///
    /// A zero capacity is clamped to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// The configured entry bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("lock poisoned").entries.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert or overwrite the blob for `key`.
    ///
    /// If `key` is new and the cache is at capacity, one existing entry is
    /// evicted first. Overwriting an existing key refreshes its blob and
    /// deadline but keeps its place in the eviction queue.
    pub fn put(&self, key: AssetId, blob: Bytes, expiry: Expiry) {
        let now = Instant::now();
        let entry = Entry {
            blob,
            deadline: now + expiry.duration(),
        };
        let mut inner = self.inner.lock().expect("lock poisoned");
        if inner.entries.contains_key(&key) {
            inner.entries.insert(key, entry);
            return;
        }
        if inner.entries.len() >= self.capacity {
            inner.evict_one(now);
        }
        inner.entries.insert(key, entry);
        inner.order.push_back(key);
    }

    /// Look up the blob for `key`.
    ///
    /// An expired entry is treated as absent and dropped on the spot.
    pub fn get(&self, key: &AssetId) -> Option<Bytes> {
        let now = Instant::now();
        let mut inner = self.inner.lock().expect("lock poisoned");
        match inner.entries.get(key) {
            Some(entry) if entry.is_expired(now) => {}
            Some(entry) => return Some(entry.blob.clone()),
            None => return None,
        }
        inner.drop_key(key);
        None
    }

    /// Explicitly drop the entry for `key`, if any.
    pub fn remove(&self, key: &AssetId) {
        let mut inner = self.inner.lock().expect("lock poisoned");
        inner.drop_key(key);
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().expect("lock poisoned");
        inner.entries.clear();
        inner.order.clear();
    }
}

impl Default for AssetCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AssetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    fn blob(text: &str) -> Bytes {
        Bytes::copy_from_slice(text.as_bytes())
    }

    #[test]
    fn put_then_get() {
        let cache = AssetCache::new();
        let key = AssetId::new();
        cache.put(key, blob("hello"), Expiry::Short);
        assert_eq!(cache.get(&key), Some(blob("hello")));
    }

    #[test]
    fn miss_is_none() {
        let cache = AssetCache::new();
        assert_eq!(cache.get(&AssetId::new()), None);
    }

    #[test]
    fn capacity_is_never_exceeded() {
        let cache = AssetCache::new();
        let keys: Vec<AssetId> = (0..DEFAULT_CAPACITY + 25).map(|_| AssetId::new()).collect();
        for key in &keys {
            cache.put(*key, blob("x"), Expiry::Short);
        }
        assert!(cache.len() <= DEFAULT_CAPACITY);
        let resolvable = keys.iter().filter(|k| cache.get(k).is_some()).count();
        assert!(resolvable <= DEFAULT_CAPACITY);
    }

    #[test]
    fn eviction_drops_oldest_insertion() {
        let cache = AssetCache::with_capacity(3);
        let keys: Vec<AssetId> = (0..4).map(|_| AssetId::new()).collect();
        for key in &keys {
            cache.put(*key, blob("x"), Expiry::Short);
        }
        assert_eq!(cache.get(&keys[0]), None);
        for key in &keys[1..] {
            assert!(cache.get(key).is_some());
        }
    }

    #[test]
    fn expired_entries_are_evicted_before_live_ones() {
        let cache = AssetCache::with_capacity(2);
        let stale = AssetId::new();
        let fresh = AssetId::new();
        let incoming = AssetId::new();
        cache.put(stale, blob("old"), Expiry::Custom(Duration::ZERO));
        cache.put(fresh, blob("new"), Expiry::Short);
        cache.put(incoming, blob("incoming"), Expiry::Short);
        assert!(cache.get(&fresh).is_some());
        assert!(cache.get(&incoming).is_some());
        assert_eq!(cache.get(&stale), None);
    }

    #[test]
    fn expired_entry_reads_as_absent() {
        let cache = AssetCache::new();
        let key = AssetId::new();
        cache.put(key, blob("gone"), Expiry::Custom(Duration::ZERO));
        assert_eq!(cache.get(&key), None);
        // The lazy expiry also dropped the entry.
        assert!(cache.is_empty());
    }

    #[test]
    fn overwrite_does_not_grow_the_cache() {
        let cache = AssetCache::with_capacity(2);
        let key = AssetId::new();
        cache.put(key, blob("one"), Expiry::Short);
        cache.put(key, blob("two"), Expiry::Short);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key), Some(blob("two")));
    }

    #[test]
    fn remove_is_explicit_eviction() {
        let cache = AssetCache::new();
        let key = AssetId::new();
        cache.put(key, blob("here"), Expiry::Short);
        cache.remove(&key);
        assert_eq!(cache.get(&key), None);
    }

    #[test]
    fn concurrent_puts_hold_the_bound() {
        let cache = Arc::new(AssetCache::with_capacity(10));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let key = AssetId::new();
                        cache.put(key, Bytes::from_static(b"x"), Expiry::Short);
                        let _ = cache.get(&key);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= 10);
    }
}
