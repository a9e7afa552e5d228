//! Bounded cache of each sender's most recent raw message.
//!
//! The host stores the raw text when a chat event arrives and reads it back
//! when rendering the message once per viewer. Entries are removed when the
//! sender leaves, or in bulk when the cache grows past its capacity.
//!
//! Eviction drops the oldest-inserted batch, not the least recently read
//! entry. A reader racing an eviction may miss an entry; that is never an
//! error, just an empty message.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

/// Entry count above which eviction runs.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Entries removed per eviction sweep.
pub const DEFAULT_EVICTION_BATCH: usize = 100;

#[derive(Debug, Clone)]
struct Entry {
    text: Arc<str>,
    seq: u64,
}

/// Concurrent sender → raw message map with coarse size bounding.
#[derive(Debug)]
pub struct RecentMessageCache<K>
where
    K: Eq + Hash,
{
    entries: DashMap<K, Entry>,
    sequence: AtomicU64,
    capacity: usize,
    batch: usize,
}

impl<K> RecentMessageCache<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::bounded(DEFAULT_CACHE_CAPACITY, DEFAULT_EVICTION_BATCH)
    }

    /// A cache holding about `capacity` senders that drops `batch` of the
    /// oldest entries whenever it grows past that. `batch` is clamped to at
    /// least one entry.
    pub fn bounded(capacity: usize, batch: usize) -> Self {
        Self {
            entries: DashMap::new(),
            sequence: AtomicU64::new(0),
            capacity,
            batch: batch.max(1),
        }
    }

    /// Stores `text` as the latest message of `sender`, replacing any
    /// earlier one.
    pub fn put(&self, sender: K, text: impl Into<Arc<str>>) {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(
            sender,
            Entry {
                text: text.into(),
                seq,
            },
        );
        if self.entries.len() > self.capacity {
            self.evict_oldest(seq);
        }
    }

    pub fn get(&self, sender: &K) -> Option<Arc<str>> {
        self.entries.get(sender).map(|entry| Arc::clone(&entry.text))
    }

    pub fn remove(&self, sender: &K) -> Option<Arc<str>> {
        self.entries.remove(sender).map(|(_, entry)| entry.text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Drops the `batch` oldest entries (by insertion sequence). The entry
    /// written as `keep` is never part of the batch.
    fn evict_oldest(&self, keep: u64) {
        let mut seqs: Vec<u64> = self
            .entries
            .iter()
            .map(|entry| entry.seq)
            .filter(|&seq| seq != keep)
            .collect();
        let count = self.batch.min(seqs.len());
        if count == 0 {
            return;
        }
        let (_, cutoff, _) = seqs.select_nth_unstable(count - 1);
        let cutoff = *cutoff;
        self.entries
            .retain(|_, entry| entry.seq > cutoff || entry.seq == keep);
    }
}

impl<K> Default for RecentMessageCache<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_remove() {
        let cache = RecentMessageCache::new();
        cache.put(1u32, "hello");
        assert_eq!(cache.get(&1).as_deref(), Some("hello"));
        assert_eq!(cache.remove(&1).as_deref(), Some("hello"));
        assert_eq!(cache.get(&1), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn put_replaces() {
        let cache = RecentMessageCache::new();
        cache.put("ann", "first");
        cache.put("ann", "second");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"ann").as_deref(), Some("second"));
    }

    #[test]
    fn eviction_drops_oldest_batch() {
        let cache = RecentMessageCache::bounded(10, 4);
        for i in 0..10u32 {
            cache.put(i, format!("m{}", i));
        }
        assert_eq!(cache.len(), 10);

        cache.put(10, "m10");
        assert_eq!(cache.len(), 7);
        for gone in 0..4u32 {
            assert_eq!(cache.get(&gone), None);
        }
        for kept in 4..=10u32 {
            assert!(cache.get(&kept).is_some());
        }
    }

    #[test]
    fn rewritten_entry_counts_as_new() {
        let cache = RecentMessageCache::bounded(3, 1);
        cache.put("a", "1");
        cache.put("b", "1");
        cache.put("c", "1");
        cache.put("a", "2");
        cache.put("d", "1");
        // "b" is now the oldest insertion.
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"a").as_deref(), Some("2"));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn zero_batch_still_evicts() {
        let cache = RecentMessageCache::bounded(1, 0);
        cache.put(1u8, "a");
        cache.put(2u8, "b");
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&2).is_some());
    }

    #[test]
    fn batch_larger_than_cache_keeps_newest() {
        let cache = RecentMessageCache::bounded(2, 10);
        cache.put(1u8, "a");
        cache.put(2u8, "b");
        cache.put(3u8, "c");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&3).as_deref(), Some("c"));
    }
}
