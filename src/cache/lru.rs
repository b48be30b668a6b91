use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::cache::ExpiringCache;

/// Bounded cache evicting the least recently used entry first.
///
/// `add` and `get` (on a hit) both mark the key most recently used. `contains` does not.
#[derive(Debug)]
pub struct LruCache<K, V> {
    max_size: usize,
    entries: HashMap<K, (V, u64)>,
    // recency stamp -> key, oldest first
    order: BTreeMap<u64, K>,
    clock: u64,
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            entries: HashMap::new(),
            order: BTreeMap::new(),
            clock: 0,
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evict least recently used entries until at most `max_size` remain.
    pub fn prune(&mut self) -> usize {
        let mut evicted = 0;
        while self.entries.len() > self.max_size {
            let Some((_, key)) = self.order.pop_first() else {
                break;
            };
            self.entries.remove(&key);
            evicted += 1;
        }
        if evicted > 0 {
            tracing::debug!(evicted, remaining = self.entries.len(), "lru cache prune");
        }
        evicted
    }

    fn next_stamp(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn touch(&mut self, key: &K) -> bool {
        let stamp = self.clock + 1;
        let Some(entry) = self.entries.get_mut(key) else {
            return false;
        };
        self.order.remove(&entry.1);
        entry.1 = stamp;
        self.clock = stamp;
        self.order.insert(stamp, key.clone());
        true
    }
}

impl<K: Eq + Hash + Clone, V> ExpiringCache<K, V> for LruCache<K, V> {
    fn get(&mut self, key: &K) -> Option<&V> {
        if !self.touch(key) {
            return None;
        }
        self.entries.get(key).map(|(v, _)| v)
    }

    fn add(&mut self, key: K, value: V) {
        let stamp = self.next_stamp();
        if let Some((_, old)) = self.entries.insert(key.clone(), (value, stamp)) {
            self.order.remove(&old);
        }
        self.order.insert(stamp, key);
        self.prune();
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let (value, stamp) = self.entries.remove(key)?;
        self.order.remove(&stamp);
        Some(value)
    }

    fn refresh(&mut self, key: &K) -> bool {
        self.touch(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Least recently used first.
    fn iter<'a>(&'a mut self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a,
    {
        let entries = &self.entries;
        self.order
            .values()
            .filter_map(move |k| entries.get(k).map(|(v, _)| (k, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_evicts_least_recently_touched() {
        let mut c = LruCache::new(3);
        c.add("a", 1);
        c.add("b", 2);
        c.add("c", 3);
        assert_eq!(c.get(&"a"), Some(&1));
        c.add("d", 4);
        assert_eq!(c.len(), 3);
        assert!(!c.contains(&"b"));
        assert!(c.contains(&"a") && c.contains(&"c") && c.contains(&"d"));
    }

    #[test]
    fn miss_does_not_change_order() {
        let mut c = LruCache::new(2);
        c.add("a", 1);
        c.add("b", 2);
        assert_eq!(c.get(&"zzz"), None);
        c.add("c", 3);
        assert!(!c.contains(&"a"));
    }

    #[test]
    fn contains_does_not_touch() {
        let mut c = LruCache::new(2);
        c.add("a", 1);
        c.add("b", 2);
        assert!(c.contains(&"a"));
        c.add("c", 3);
        assert!(!c.contains(&"a"));
    }

    #[test]
    fn overwrite_moves_to_front_without_growing() {
        let mut c = LruCache::new(2);
        c.add("a", 1);
        c.add("b", 2);
        c.add("a", 10);
        assert_eq!(c.len(), 2);
        c.add("c", 3);
        assert!(!c.contains(&"b"));
        assert_eq!(c.get(&"a"), Some(&10));
    }

    #[test]
    fn iter_runs_oldest_to_newest() {
        let mut c = LruCache::new(5);
        c.add(1, "x");
        c.add(2, "y");
        c.add(3, "z");
        assert!(c.refresh(&1));
        assert!(!c.refresh(&9));
        let keys: Vec<i32> = c.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![2, 3, 1]);
    }

    #[test]
    fn remove_and_clear() {
        let mut c = LruCache::new(2);
        c.add("a", 1);
        assert_eq!(c.remove(&"a"), Some(1));
        assert_eq!(c.remove(&"a"), None);
        c.add("b", 2);
        c.clear();
        assert!(c.is_empty());
        assert_eq!(c.iter().count(), 0);
    }
}
