use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use crate::cache::ExpiringCache;
use crate::cache::clock::{Clock, MonotonicClock};

/// Operations between two automatic prune passes.
pub const PRUNE_EVERY: u32 = 20;

#[derive(Debug)]
struct Entry<V> {
    value: V,
    inserted_at: Duration,
    seq: u64,
}

/// Time-to-live cache with lazy expiry.
///
/// An entry is visible while `now <= inserted_at + ttl`. Expired entries linger until a
/// prune pass, which runs every [`PRUNE_EVERY`] `get`/`add`/`remove`/`refresh` calls and
/// also trims the oldest survivors beyond `max_size`, in insertion order.
///
/// Not synchronized; wrap it in a lock or keep it on one task.
#[derive(Debug)]
pub struct TtlCache<K, V, C = MonotonicClock> {
    ttl: Duration,
    max_size: Option<usize>,
    entries: HashMap<K, Entry<V>>,
    clock: C,
    ops: u32,
    next_seq: u64,
}

impl<K: Eq + Hash + Clone, V> TtlCache<K, V, MonotonicClock> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, MonotonicClock::new())
    }
}

impl<K: Eq + Hash + Clone, V, C: Clock> TtlCache<K, V, C> {
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            ttl,
            max_size: None,
            entries: HashMap::new(),
            clock,
            ops: 0,
            next_seq: 0,
        }
    }

    /// Cap the number of entries kept by a prune pass.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(max_size);
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Physical entry count, expired-but-unpruned entries included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Delete expired entries, then the oldest ones beyond `max_size`. Returns how many
    /// entries were dropped.
    pub fn prune(&mut self) -> usize {
        let now = self.clock.now();
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, e| now <= e.inserted_at + ttl);
        let expired = before - self.entries.len();

        let mut evicted = 0;
        if let Some(max) = self.max_size
            && self.entries.len() > max
        {
            let mut by_age: Vec<(Duration, u64, K)> = self
                .entries
                .iter()
                .map(|(k, e)| (e.inserted_at, e.seq, k.clone()))
                .collect();
            by_age.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
            evicted = self.entries.len() - max;
            for (_, _, k) in by_age.into_iter().take(evicted) {
                self.entries.remove(&k);
            }
        }

        if expired + evicted > 0 {
            tracing::debug!(expired, evicted, remaining = self.entries.len(), "ttl cache prune");
        }
        expired + evicted
    }

    fn tick(&mut self) {
        self.ops += 1;
        if self.ops >= PRUNE_EVERY {
            self.ops = 0;
            self.prune();
        }
    }

    fn stamp(&mut self) -> (Duration, u64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        (self.clock.now(), seq)
    }

    fn is_live(&self, e: &Entry<V>) -> bool {
        self.clock.now() <= e.inserted_at + self.ttl
    }
}

impl<K: Eq + Hash + Clone, V, C: Clock> ExpiringCache<K, V> for TtlCache<K, V, C> {
    fn get(&mut self, key: &K) -> Option<&V> {
        self.tick();
        let now = self.clock.now();
        let ttl = self.ttl;
        self.entries
            .get(key)
            .filter(|e| now <= e.inserted_at + ttl)
            .map(|e| &e.value)
    }

    fn add(&mut self, key: K, value: V) {
        self.tick();
        let (inserted_at, seq) = self.stamp();
        self.entries.insert(
            key,
            Entry {
                value,
                inserted_at,
                seq,
            },
        );
    }

    /// Removes the entry whether or not it has expired.
    fn remove(&mut self, key: &K) -> Option<V> {
        self.tick();
        self.entries.remove(key).map(|e| e.value)
    }

    /// Restamps any stored entry, reviving one that expired but has not been pruned yet.
    fn refresh(&mut self, key: &K) -> bool {
        self.tick();
        if !self.entries.contains_key(key) {
            return false;
        }
        let (inserted_at, seq) = self.stamp();
        if let Some(e) = self.entries.get_mut(key) {
            e.inserted_at = inserted_at;
            e.seq = seq;
        }
        true
    }

    fn contains(&self, key: &K) -> bool {
        self.entries.get(key).is_some_and(|e| self.is_live(e))
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.ops = 0;
    }

    fn iter<'a>(&'a mut self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a,
    {
        self.prune();
        self.entries.iter().map(|(k, e)| (k, &e.value))
    }
}
