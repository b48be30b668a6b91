use std::hash::Hash;
use std::time::Duration;

use crate::cache::ExpiringCache;
use crate::cache::clock::{Clock, MonotonicClock};
use crate::cache::ttl::TtlCache;

/// Replies sent on behalf of a request, kept around so they can be cleaned up later.
///
/// `K` identifies the request (message or interaction id), `V` the reply handle.
#[derive(Debug)]
pub struct ReplyCache<K, V, C = MonotonicClock> {
    inner: TtlCache<K, V, C>,
}

impl<K: Eq + Hash + Clone, V> ReplyCache<K, V, MonotonicClock> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: TtlCache::new(ttl),
        }
    }
}

impl<K: Eq + Hash + Clone, V, C: Clock> ReplyCache<K, V, C> {
    pub fn with_cache(inner: TtlCache<K, V, C>) -> Self {
        Self { inner }
    }

    /// Remember `reply` as the prompt sent for `request`, replacing any previous one.
    pub fn register(&mut self, request: K, reply: V) {
        self.inner.add(request, reply);
    }

    /// Forget the reply without handing it back; the request finished normally.
    pub fn unregister(&mut self, request: &K) {
        self.inner.remove(request);
    }

    pub fn get(&mut self, request: &K) -> Option<&V> {
        self.inner.get(request)
    }

    pub fn contains(&self, request: &K) -> bool {
        self.inner.contains(request)
    }

    /// Remove and return the reply so the host can delete it, even if it already expired.
    pub fn take_for_cleanup(&mut self, request: &K) -> Option<V> {
        let reply = self.inner.remove(request);
        if reply.is_some() {
            tracing::debug!("reply handed back for cleanup");
        }
        reply
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
