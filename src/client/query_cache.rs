use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::Mutex as AsyncMutex;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

struct CacheEntry<T> {
    data: Option<Arc<T>>,
    data_updated_at: Option<Instant>,
    invalidated: bool,
    error: Option<String>,
    observers: usize,
    unused_since: Option<Instant>,
    gc_time: Duration,
    // Held by the one fetch in flight for this key
    fetch_lock: Arc<AsyncMutex<()>>,
    settled: u64,
}

impl<T> CacheEntry<T> {
    fn new(gc_time: Duration) -> Self {
        Self {
            data: None,
            data_updated_at: None,
            invalidated: false,
            error: None,
            observers: 0,
            unused_since: None,
            gc_time,
            fetch_lock: Arc::new(AsyncMutex::new(())),
            settled: 0,
        }
    }

    fn is_fresh(&self, stale_time: Duration, now: Instant) -> bool {
        match self.data_updated_at {
            Some(updated_at) if self.data.is_some() && !self.invalidated => {
                now.saturating_duration_since(updated_at) < stale_time
            }
            _ => false,
        }
    }
}

/// Keyed store of query results with freshness and eviction metadata.
///
/// Every time-dependent operation takes `now` explicitly. An entry is fresh
/// while it holds data younger than the caller's stale time and has not been
/// invalidated. Entries nobody observes are evicted by `collect_garbage` once
/// they have been unused for their gc time.
pub struct QueryCache<T> {
    entries: Mutex<HashMap<QueryKey, CacheEntry<T>>>,
    default_gc_time: Duration,
}

impl<T> QueryCache<T> {
    pub fn new(default_gc_time: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_gc_time,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, CacheEntry<T>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached data, if it is still fresh.
    pub fn fresh_data(&self, key: &QueryKey, stale_time: Duration, now: Instant) -> Option<Arc<T>> {
        self.lock()
            .get(key)
            .filter(|entry| entry.is_fresh(stale_time, now))
            .and_then(|entry| entry.data.clone())
    }

    /// Cached data regardless of freshness.
    pub fn data(&self, key: &QueryKey) -> Option<Arc<T>> {
        self.lock().get(key).and_then(|entry| entry.data.clone())
    }

    pub fn is_stale(&self, key: &QueryKey, stale_time: Duration, now: Instant) -> bool {
        self.lock()
            .get(key)
            .map_or(true, |entry| !entry.is_fresh(stale_time, now))
    }

    pub fn error(&self, key: &QueryKey) -> Option<String> {
        self.lock().get(key).and_then(|entry| entry.error.clone())
    }

    pub fn set_data(&self, key: &QueryKey, data: T, now: Instant) -> Arc<T> {
        let data = Arc::new(data);
        let mut entries = self.lock();
        let entry = entries
            .entry(key.clone())
            .or_insert_with(|| CacheEntry::new(self.default_gc_time));

        entry.data = Some(data.clone());
        entry.data_updated_at = Some(now);
        entry.invalidated = false;
        entry.error = None;
        entry.settled += 1;
        if entry.observers == 0 && entry.unused_since.is_none() {
            entry.unused_since = Some(now);
        }

        data
    }

    /// Records a failed fetch. Previously cached data is kept.
    pub fn set_error(&self, key: &QueryKey, message: impl Into<String>, now: Instant) {
        let mut entries = self.lock();
        let entry = entries
            .entry(key.clone())
            .or_insert_with(|| CacheEntry::new(self.default_gc_time));

        entry.error = Some(message.into());
        entry.settled += 1;
        if entry.observers == 0 && entry.unused_since.is_none() {
            entry.unused_since = Some(now);
        }
    }

    /// Marks the entry stale so its next read refetches. Returns whether an
    /// entry existed.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        match self.lock().get_mut(key) {
            Some(entry) => {
                entry.invalidated = true;
                true
            }
            None => false,
        }
    }

    /// Lock shared by every fetch of `key`. A caller that had to wait for it
    /// should compare `settled_count` to see whether the fetch it waited on
    /// already produced a result.
    pub fn fetch_lock(&self, key: &QueryKey) -> Arc<AsyncMutex<()>> {
        self.lock()
            .entry(key.clone())
            .or_insert_with(|| CacheEntry::new(self.default_gc_time))
            .fetch_lock
            .clone()
    }

    /// Number of fetches that have finished for `key`, successful or not.
    pub fn settled_count(&self, key: &QueryKey) -> u64 {
        self.lock().get(key).map_or(0, |entry| entry.settled)
    }

    pub fn subscribe(&self, key: &QueryKey, gc_time: Duration) {
        let mut entries = self.lock();
        let entry = entries
            .entry(key.clone())
            .or_insert_with(|| CacheEntry::new(gc_time));

        entry.observers += 1;
        entry.unused_since = None;
        entry.gc_time = gc_time;
    }

    pub fn unsubscribe(&self, key: &QueryKey, now: Instant) {
        if let Some(entry) = self.lock().get_mut(key) {
            entry.observers = entry.observers.saturating_sub(1);
            if entry.observers == 0 {
                entry.unused_since = Some(now);
            }
        }
    }

    pub fn observer_count(&self, key: &QueryKey) -> usize {
        self.lock().get(key).map_or(0, |entry| entry.observers)
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.lock().contains_key(key)
    }

    /// Evicts unobserved entries whose gc time has elapsed. Returns the
    /// number of evicted entries.
    pub fn collect_garbage(&self, now: Instant) -> usize {
        let mut entries = self.lock();
        let before = entries.len();

        entries.retain(|key, entry| {
            let expired = entry.observers == 0
                && entry
                    .unused_since
                    .map_or(false, |since| now.saturating_duration_since(since) >= entry.gc_time);
            if expired {
                tracing::debug!("Evicting query {}", key);
            }
            !expired
        });

        before - entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STALE: Duration = Duration::from_secs(120);
    const GC: Duration = Duration::from_secs(300);

    fn key() -> QueryKey {
        QueryKey::new(["admin-enquiries"])
    }

    #[test]
    fn test_data_is_fresh_inside_stale_window() {
        let cache = QueryCache::new(GC);
        let t0 = Instant::now();
        cache.set_data(&key(), vec![1, 2], t0);

        assert_eq!(
            cache.fresh_data(&key(), STALE, t0 + Duration::from_secs(119)).as_deref(),
            Some(&vec![1, 2])
        );
        assert!(cache
            .fresh_data(&key(), STALE, t0 + Duration::from_secs(120))
            .is_none());
        // Stale data is still served as a fallback
        assert!(cache.data(&key()).is_some());
    }

    #[test]
    fn test_invalidation_overrides_freshness() {
        let cache = QueryCache::new(GC);
        let t0 = Instant::now();
        cache.set_data(&key(), "list", t0);

        assert!(cache.invalidate(&key()));

        assert!(cache.is_stale(&key(), STALE, t0));
        assert!(cache.fresh_data(&key(), STALE, t0).is_none());

        cache.set_data(&key(), "refetched", t0 + Duration::from_secs(1));
        assert!(!cache.is_stale(&key(), STALE, t0 + Duration::from_secs(1)));
    }

    #[test]
    fn test_invalidating_unknown_key_is_a_no_op() {
        let cache: QueryCache<()> = QueryCache::new(GC);
        assert!(!cache.invalidate(&key()));
        assert!(!cache.contains(&key()));
    }

    #[test]
    fn test_failed_fetch_keeps_previous_data() {
        let cache = QueryCache::new(GC);
        let t0 = Instant::now();
        cache.set_data(&key(), 7, t0);
        cache.set_error(&key(), "Failed to fetch enquiries", t0);

        assert_eq!(cache.data(&key()).as_deref(), Some(&7));
        assert_eq!(cache.error(&key()).as_deref(), Some("Failed to fetch enquiries"));

        cache.set_data(&key(), 8, t0);
        assert!(cache.error(&key()).is_none());
    }

    #[test]
    fn test_observed_entries_survive_garbage_collection() {
        let cache = QueryCache::new(GC);
        let t0 = Instant::now();
        cache.subscribe(&key(), GC);
        cache.set_data(&key(), 1, t0);

        assert_eq!(cache.collect_garbage(t0 + Duration::from_secs(3600)), 0);
        assert_eq!(cache.observer_count(&key()), 1);
    }

    #[test]
    fn test_unused_entry_evicted_after_gc_time() {
        let cache = QueryCache::new(GC);
        let t0 = Instant::now();
        cache.subscribe(&key(), GC);
        cache.set_data(&key(), 1, t0);

        let released = t0 + Duration::from_secs(10);
        cache.unsubscribe(&key(), released);

        assert_eq!(cache.collect_garbage(released + Duration::from_secs(299)), 0);
        assert!(cache.contains(&key()));

        assert_eq!(cache.collect_garbage(released + GC), 1);
        assert!(!cache.contains(&key()));
    }

    #[test]
    fn test_resubscribing_cancels_pending_eviction() {
        let cache = QueryCache::new(GC);
        let t0 = Instant::now();
        cache.subscribe(&key(), GC);
        cache.set_data(&key(), 1, t0);
        cache.unsubscribe(&key(), t0);
        cache.subscribe(&key(), GC);

        assert_eq!(cache.collect_garbage(t0 + GC), 0);
        assert!(cache.data(&key()).is_some());
    }

    #[test]
    fn test_settled_count_tracks_finished_fetches() {
        let cache = QueryCache::new(GC);
        let t0 = Instant::now();
        assert_eq!(cache.settled_count(&key()), 0);

        cache.set_data(&key(), 1, t0);
        cache.set_error(&key(), "boom", t0);

        assert_eq!(cache.settled_count(&key()), 2);
        assert!(Arc::ptr_eq(&cache.fetch_lock(&key()), &cache.fetch_lock(&key())));
    }

    #[test]
    fn test_query_key_display() {
        assert_eq!(QueryKey::new(["admin-enquiries"]).to_string(), "[admin-enquiries]");
    }
}
