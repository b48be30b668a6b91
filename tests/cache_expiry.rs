use std::time::Duration;

use sprite_compose::{ExpiringCache, LruCache, ManualClock, ReplyCache, TtlCache};

#[test]
fn ttl_entry_visible_until_deadline() {
    let clock = ManualClock::new();
    let mut cache = TtlCache::with_clock(Duration::from_secs(1), clock.clone());
    cache.add("k", 1);

    clock.set(Duration::from_millis(500));
    assert_eq!(cache.get(&"k"), Some(&1));

    clock.set(Duration::from_millis(1500));
    assert_eq!(cache.get(&"k"), None);
    assert!(!cache.contains(&"k"));
}

#[test]
fn lru_drops_least_recent_past_capacity() {
    let mut cache = LruCache::new(3);
    for i in 0..4 {
        cache.add(i, i * 10);
    }
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.get(&0), None);
    for i in 1..4 {
        assert_eq!(cache.get(&i), Some(&(i * 10)));
    }
}

#[test]
fn reply_tracking_expires_with_ttl() {
    let clock = ManualClock::new();
    let mut replies = ReplyCache::with_cache(TtlCache::with_clock(
        Duration::from_secs(300),
        clock.clone(),
    ));
    replies.register(1u64, 101u64);
    replies.register(2, 202);

    replies.unregister(&2);
    assert_eq!(replies.take_for_cleanup(&1), Some(101));
    assert_eq!(replies.take_for_cleanup(&1), None);

    replies.register(3, 303);
    clock.advance(Duration::from_secs(301));
    assert_eq!(replies.get(&3), None);
}

fn sorted_keys<C: ExpiringCache<u32, &'static str>>(cache: &mut C) -> Vec<u32> {
    let mut keys: Vec<u32> = cache.iter().map(|(k, _)| *k).collect();
    keys.sort_unstable();
    keys
}

#[test]
fn both_caches_iterate_through_the_shared_trait() {
    let clock = ManualClock::new();
    let mut ttl = TtlCache::with_clock(Duration::from_secs(1), clock.clone());
    ttl.add(1, "a");
    clock.advance(Duration::from_millis(600));
    ttl.add(2, "b");
    clock.advance(Duration::from_millis(600));
    assert_eq!(sorted_keys(&mut ttl), vec![2]);

    let mut lru = LruCache::new(2);
    for (k, v) in [(1, "a"), (2, "b"), (3, "c")] {
        lru.add(k, v);
    }
    assert_eq!(sorted_keys(&mut lru), vec![2, 3]);
}
