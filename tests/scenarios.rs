// ==============================================
// END-TO-END CACHE SCENARIOS (integration)
// ==============================================
//
// Observable behavior of the public `Cache` surface: capacity, expiration,
// purge and replacement order. Time-sensitive cases drive a `ManualClock`;
// one case runs against the wall clock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use arcache::prelude::*;

fn eviction_counter<V: 'static>()
-> (Arc<AtomicUsize>, impl Fn(String, Arc<V>) + Send + Sync + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let hook = {
        let count = Arc::clone(&count);
        move |_: String, _: Arc<V>| {
            count.fetch_add(1, Ordering::SeqCst);
        }
    };
    (count, hook)
}

// ==============================================
// Expiration
// ==============================================

mod expiration {
    use super::*;

    #[test]
    fn expired_keys_drop_out_of_live_length() {
        let clock = Arc::new(ManualClock::new());
        let cache = CacheBuilder::new(2)
            .expiration(Duration::from_millis(1))
            .clock(clock.clone())
            .loader(|key: &String| Ok::<_, String>(key.clone()))
            .build()
            .unwrap();

        cache.get(&"test1".to_string()).unwrap();
        cache.get(&"test2".to_string()).unwrap();
        assert_eq!(cache.len(true), 2);

        clock.advance(Duration::from_millis(2));
        cache.get(&"test4".to_string()).unwrap();
        assert_eq!(cache.len(true), 1);
        assert!(cache.has(&"test4".to_string()));
    }

    #[test]
    fn fixed_ttl_expires_even_after_reads() {
        let clock = Arc::new(ManualClock::new());
        let cache: Cache<String, u32> = CacheBuilder::new(4)
            .expiration(Duration::from_millis(1))
            .refresh_on_access(false)
            .clock(clock.clone())
            .build()
            .unwrap();

        cache.set("k".to_string(), 1);
        assert!(cache.get(&"k".to_string()).is_ok());
        clock.advance(Duration::from_millis(2));

        assert!(!cache.has(&"k".to_string()));
        assert_eq!(cache.len(true), 0);
    }

    #[test]
    fn wall_clock_expiration() {
        let cache: Cache<String, u32> = CacheBuilder::new(4)
            .expiration(Duration::from_millis(20))
            .build()
            .unwrap();

        cache.set("k".to_string(), 1);
        assert!(cache.has(&"k".to_string()));
        thread::sleep(Duration::from_millis(40));
        assert!(!cache.has(&"k".to_string()));
        assert_eq!(cache.len(true), 0);
    }

    #[test]
    fn expired_entry_reloads_through_loader() {
        let clock = Arc::new(ManualClock::new());
        let loads = Arc::new(AtomicUsize::new(0));
        let cache = {
            let loads = Arc::clone(&loads);
            CacheBuilder::new(4)
                .expiration(Duration::from_millis(5))
                .clock(clock.clone())
                .loader(move |key: &String| {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(key.len())
                })
                .build()
                .unwrap()
        };

        let key = "abc".to_string();
        assert_eq!(*cache.get(&key).unwrap(), 3);
        clock.advance(Duration::from_millis(6));
        assert_eq!(*cache.get(&key).unwrap(), 3);
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }
}

// ==============================================
// Capacity and eviction
// ==============================================

mod capacity {
    use super::*;

    #[test]
    fn sequential_loads_past_capacity_evict_once() {
        let (evictions, hook) = eviction_counter::<String>();
        let cache = CacheBuilder::new(10)
            .loader(|key: &String| Ok::<_, String>(key.clone()))
            .evicted_func(hook)
            .build()
            .unwrap();

        for i in 0..=10 {
            let key = format!("Key-{i}");
            assert_eq!(*cache.get(&key).unwrap(), key);
        }

        assert_eq!(evictions.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(false), 10);
        assert!(!cache.has(&"Key-0".to_string()));
    }

    #[test]
    fn c_plus_one_sets_fire_exactly_one_eviction() {
        for policy in [CachePolicy::Arc, CachePolicy::Lru] {
            let (evictions, hook) = eviction_counter::<u32>();
            let cache: Cache<String, u32> = CacheBuilder::new(5)
                .policy(policy)
                .evicted_func(hook)
                .build()
                .unwrap();

            for i in 0..6 {
                cache.set(format!("k{i}"), i);
            }
            assert_eq!(evictions.load(Ordering::SeqCst), 1, "{policy:?}");
            assert_eq!(cache.len(false), 5, "{policy:?}");
        }
    }

    #[test]
    fn frequently_used_keys_survive_a_scan() {
        let cache: Cache<String, u32> = CacheBuilder::new(4).build().unwrap();
        for hot in ["a", "b"] {
            cache.set(hot.to_string(), 0);
            cache.get(&hot.to_string()).unwrap();
        }

        for i in 0..20 {
            cache.set(format!("scan-{i}"), i);
        }

        assert!(cache.has(&"a".to_string()));
        assert!(cache.has(&"b".to_string()));
    }

    #[test]
    fn evicted_callback_receives_key_and_value() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let cache = {
            let seen = Arc::clone(&seen);
            CacheBuilder::new(1)
                .evicted_func(move |key: String, value: Arc<u32>| {
                    seen.lock().unwrap().push((key, *value));
                })
                .build()
                .unwrap()
        };
        let cache: Cache<String, u32> = cache;

        cache.set("first".to_string(), 1);
        cache.set("second".to_string(), 2);
        assert_eq!(*seen.lock().unwrap(), vec![("first".to_string(), 1)]);
    }
}

// ==============================================
// Purge and removal
// ==============================================

mod purge {
    use super::*;

    #[test]
    fn purge_visits_each_entry_once() {
        let (visits, hook) = eviction_counter::<u32>();
        let (evictions, evicted) = eviction_counter::<u32>();
        let cache: Cache<String, u32> = CacheBuilder::new(8)
            .purge_visitor_func(hook)
            .evicted_func(evicted)
            .build()
            .unwrap();

        for i in 0..8 {
            cache.set(format!("k{i}"), i);
        }
        cache.purge();

        assert_eq!(visits.load(Ordering::SeqCst), 8);
        assert_eq!(evictions.load(Ordering::SeqCst), 0);
        assert_eq!(cache.len(false), 0);
        assert!(cache.keys(false).is_empty());
    }

    #[test]
    fn cache_is_usable_after_purge() {
        let cache: Cache<String, u32> = CacheBuilder::new(2).build().unwrap();
        cache.set("a".to_string(), 1);
        cache.purge();
        cache.set("b".to_string(), 2);
        assert_eq!(*cache.get(&"b".to_string()).unwrap(), 2);
        assert!(cache.get(&"a".to_string()).unwrap_err().is_not_found());
    }

    #[test]
    fn remove_reports_presence() {
        let cache: Cache<String, u32> = CacheBuilder::new(2).build().unwrap();
        cache.set("a".to_string(), 1);
        assert!(cache.remove(&"a".to_string()));
        assert!(!cache.remove(&"a".to_string()));
        assert!(!cache.remove(&"never".to_string()));
    }

    #[test]
    fn removing_a_ghost_only_key_returns_false() {
        let (evictions, hook) = eviction_counter::<u32>();
        let cache: Cache<String, u32> = CacheBuilder::new(2).evicted_func(hook).build().unwrap();
        cache.set("a".to_string(), 1);
        cache.get(&"a".to_string()).unwrap();
        cache.set("b".to_string(), 2);
        cache.set("c".to_string(), 3); // "b" leaves only a ghost behind
        assert_eq!(evictions.load(Ordering::SeqCst), 1);
        assert!(!cache.has(&"b".to_string()));

        assert!(!cache.remove(&"b".to_string()));
        assert_eq!(cache.len(false), 2);
    }
}

// ==============================================
// Statistics
// ==============================================

mod stats {
    use super::*;

    #[test]
    fn hit_rate_tracks_lookups() {
        let cache = CacheBuilder::new(4)
            .loader(|key: &String| Ok::<_, String>(key.len()))
            .build()
            .unwrap();

        let key = "four".to_string();
        cache.get(&key).unwrap();
        cache.get(&key).unwrap();
        cache.get(&key).unwrap();
        assert!(cache.get_if_present(&"none".to_string()).is_err());

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 2);
        assert_eq!(cache.lookup_count(), 4);
        assert!((cache.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn has_does_not_count_as_lookup() {
        let cache: Cache<String, u32> = CacheBuilder::new(4).build().unwrap();
        cache.set("a".to_string(), 1);
        assert!(cache.has(&"a".to_string()));
        assert!(!cache.has(&"b".to_string()));
        assert_eq!(cache.lookup_count(), 0);
    }
}
