//! Small in-memory caches used to track outstanding replies.
//!
//! None of these types lock internally; share them behind a mutex or keep them on a
//! single task.

/// Injectable monotonic time.
pub mod clock;
/// Least-recently-used bounded cache.
pub mod lru;
/// Request-to-reply tracking for cleanup.
pub mod reply;
/// Time-to-live cache with amortized pruning.
pub mod ttl;

/// Operations shared by [`ttl::TtlCache`] and [`lru::LruCache`].
///
/// Missing keys are never an error: lookups report absence.
pub trait ExpiringCache<K, V> {
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Insert or overwrite.
    fn add(&mut self, key: K, value: V);

    fn remove(&mut self, key: &K) -> Option<V>;

    /// Mark `key` as freshly used. Returns `false` when it is absent.
    fn refresh(&mut self, key: &K) -> bool;

    fn contains(&self, key: &K) -> bool;

    fn clear(&mut self);

    fn iter<'a>(&'a mut self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a;
}
