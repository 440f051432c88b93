//! Stale-while-revalidate cache with single-flight refresh per key.
//!
//! For details, see the [`RegenCache`] struct documentation.

use std::{
    fmt::Debug,
    hash::Hash,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use dashmap::{DashMap, mapref::entry::Entry};
use tokio::{sync::Mutex, time::Instant};

/// Revalidation window used by storefront pages.
pub const DEFAULT_REVALIDATE: Duration = Duration::from_secs(3600);

/// Produces the value cached under a key.
pub trait Loader: Send + Sync + 'static {
    type Key: Clone + Eq + Hash + Debug + Send + Sync + 'static;
    type Value: Send + Sync + 'static;
    type Error: std::error::Error + Send + Sync + 'static;

    fn load(
        &self,
        key: &Self::Key,
    ) -> impl Future<Output = Result<Self::Value, Self::Error>> + Send;
}

struct CacheEntry<V> {
    value: Arc<V>,
    /// When `value` was loaded.
    fetched_at: Instant,
    /// Last load attempt, successful or not. Staleness is measured from here.
    checked_at: Instant,
}

/// Counters describing cache behaviour. Refresh failures are only visible here and in logs.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    stale_hits: AtomicU64,
    misses: AtomicU64,
    refreshes: AtomicU64,
    refresh_failures: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub stale_hits: u64,
    pub misses: u64,
    pub refreshes: u64,
    pub refresh_failures: u64,
}

impl CacheStats {
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            stale_hits: self.stale_hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            refreshes: self.refreshes.load(Ordering::Relaxed),
            refresh_failures: self.refresh_failures.load(Ordering::Relaxed),
        }
    }
}

struct Inner<L: Loader> {
    loader: L,
    window: Duration,
    entries: DashMap<L::Key, Arc<CacheEntry<L::Value>>>,
    refreshing: DashMap<L::Key, ()>,
    cold_locks: DashMap<L::Key, Arc<Mutex<()>>>,
    stats: CacheStats,
}

/// A page-data cache that serves stale values while refreshing them in the background.
///
/// On [`get`](RegenCache::get):
///
/// 1. **Cold key**: the value is loaded in the foreground, stored and returned. Concurrent
///    cold requests for the same key share one load. A load error is returned to the caller.
/// 2. **Fresh** (younger than the window): the cached value is returned, no load happens.
/// 3. **Stale**: the cached value is returned immediately and one background refresh is
///    spawned. Requests arriving while that refresh runs do not spawn another one.
///
/// A refresh replaces the entry as a whole, so readers see either the old or the new
/// value. A failed refresh keeps the old value and waits a full window before the next
/// attempt; the failure is logged and counted in [`CacheStats`], never returned.
///
/// Cloning a `RegenCache` is cheap and shares the underlying storage.
pub struct RegenCache<L: Loader> {
    inner: Arc<Inner<L>>,
}

impl<L: Loader> Clone for RegenCache<L> {
    fn clone(&self) -> Self {
        RegenCache {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L: Loader> RegenCache<L> {
    /// A cache with the default one hour revalidation window.
    pub fn new(loader: L) -> Self {
        Self::with_window(loader, DEFAULT_REVALIDATE)
    }

    pub fn with_window(loader: L, window: Duration) -> Self {
        RegenCache {
            inner: Arc::new(Inner {
                loader,
                window,
                entries: DashMap::new(),
                refreshing: DashMap::new(),
                cold_locks: DashMap::new(),
                stats: CacheStats::default(),
            }),
        }
    }

    pub fn window(&self) -> Duration {
        self.inner.window
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.inner.stats.snapshot()
    }

    pub fn loader(&self) -> &L {
        &self.inner.loader
    }

    /// Serve `key`, loading or refreshing it as needed.
    pub async fn get(&self, key: &L::Key) -> Result<Arc<L::Value>, L::Error> {
        if let Some(entry) = self.inner.lookup(key) {
            if entry.checked_at.elapsed() < self.inner.window {
                self.inner.stats.hits.fetch_add(1, Ordering::Relaxed);
            } else {
                self.inner.stats.stale_hits.fetch_add(1, Ordering::Relaxed);
                self.spawn_refresh(key, &entry.value);
            }
            return Ok(Arc::clone(&entry.value));
        }

        self.load_cold(key).await
    }

    /// The cached value, without loading or refreshing.
    pub fn peek(&self, key: &L::Key) -> Option<Arc<L::Value>> {
        self.inner.lookup(key).map(|entry| Arc::clone(&entry.value))
    }

    /// Age of the cached value, if any.
    pub fn age(&self, key: &L::Key) -> Option<Duration> {
        self.inner.lookup(key).map(|entry| entry.fetched_at.elapsed())
    }

    pub fn is_refreshing(&self, key: &L::Key) -> bool {
        self.inner.refreshing.contains_key(key)
    }

    /// Drop the cached value so the next request loads in the foreground.
    pub fn invalidate(&self, key: &L::Key) {
        self.inner.entries.remove(key);
    }

    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    async fn load_cold(&self, key: &L::Key) -> Result<Arc<L::Value>, L::Error> {
        let lock = Arc::clone(&*self.inner.cold_locks.entry(key.clone()).or_default());
        let _guard = lock.lock().await;

        // Another request may have finished the load while this one waited.
        if let Some(entry) = self.inner.lookup(key) {
            self.inner.stats.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(&entry.value));
        }

        self.inner.stats.misses.fetch_add(1, Ordering::Relaxed);

        #[cfg(feature = "tracing")]
        tracing::debug!("Cold load for {:?}", key);

        // The lock entry goes away on both paths; only waiters already holding it keep it alive.
        match self.inner.loader.load(key).await {
            Ok(value) => {
                let value = self.inner.install(key.clone(), value);
                self.inner.cold_locks.remove(key);
                Ok(value)
            }
            Err(err) => {
                self.inner.cold_locks.remove(key);
                Err(err)
            }
        }
    }

    fn spawn_refresh(&self, key: &L::Key, stale: &Arc<L::Value>) {
        match self.inner.refreshing.entry(key.clone()) {
            Entry::Occupied(_) => return,
            Entry::Vacant(slot) => {
                slot.insert(());
            }
        }

        let inner = Arc::clone(&self.inner);
        let key = key.clone();
        let stale = Arc::clone(stale);

        tokio::spawn(async move {
            inner.stats.refreshes.fetch_add(1, Ordering::Relaxed);

            match inner.loader.load(&key).await {
                Ok(value) => {
                    inner.install(key.clone(), value);

                    #[cfg(feature = "tracing")]
                    tracing::debug!("Refreshed {:?}", key);
                }
                Err(err) => {
                    inner.stats.refresh_failures.fetch_add(1, Ordering::Relaxed);
                    inner.defer_retry(&key, &stale);

                    #[cfg(feature = "tracing")]
                    tracing::warn!("Background refresh of {:?} failed: {err}; serving stale value", key);
                    #[cfg(not(feature = "tracing"))]
                    let _ = err;
                }
            }

            inner.refreshing.remove(&key);
        });
    }
}

impl<L: Loader> Inner<L> {
    fn lookup(&self, key: &L::Key) -> Option<Arc<CacheEntry<L::Value>>> {
        self.entries.get(key).map(|entry| Arc::clone(entry.value()))
    }

    fn install(&self, key: L::Key, value: L::Value) -> Arc<L::Value> {
        let now = Instant::now();
        let value = Arc::new(value);
        self.entries.insert(
            key,
            Arc::new(CacheEntry {
                value: Arc::clone(&value),
                fetched_at: now,
                checked_at: now,
            }),
        );
        value
    }

    /// Keep serving `stale` for another window after a failed refresh.
    fn defer_retry(&self, key: &L::Key, stale: &Arc<L::Value>) {
        if let Some(mut slot) = self.entries.get_mut(key) {
            if Arc::ptr_eq(&slot.value, stale) {
                let deferred = Arc::new(CacheEntry {
                    value: Arc::clone(&slot.value),
                    fetched_at: slot.fetched_at,
                    checked_at: Instant::now(),
                });
                *slot = deferred;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::atomic::{AtomicBool, AtomicUsize},
    };

    use tokio::sync::Semaphore;

    use super::*;

    const KEY: &str = "recently-updated";

    struct TestState {
        calls: AtomicUsize,
        gated: AtomicBool,
        failing: AtomicBool,
        gate: Semaphore,
    }

    impl Default for TestState {
        fn default() -> Self {
            TestState {
                calls: AtomicUsize::new(0),
                gated: AtomicBool::new(false),
                failing: AtomicBool::new(false),
                gate: Semaphore::new(0),
            }
        }
    }

    #[derive(Clone, Default)]
    struct TestLoader(Arc<TestState>);

    impl TestLoader {
        fn calls(&self) -> usize {
            self.0.calls.load(Ordering::SeqCst)
        }

        fn close_gate(&self) {
            self.0.gated.store(true, Ordering::SeqCst);
        }

        fn open_gate(&self) {
            self.0.gated.store(false, Ordering::SeqCst);
            self.0.gate.add_permits(1);
        }

        fn set_failing(&self, failing: bool) {
            self.0.failing.store(failing, Ordering::SeqCst);
        }
    }

    impl Loader for TestLoader {
        type Key = &'static str;
        type Value = String;
        type Error = io::Error;

        async fn load(&self, key: &Self::Key) -> Result<String, io::Error> {
            let call = self.0.calls.fetch_add(1, Ordering::SeqCst) + 1;

            if self.0.gated.load(Ordering::SeqCst) {
                self.0
                    .gate
                    .acquire()
                    .await
                    .expect("gate closed")
                    .forget();
            }
            if self.0.failing.load(Ordering::SeqCst) {
                return Err(io::Error::other("backend unavailable"));
            }

            Ok(format!("{key}#{call}"))
        }
    }

    async fn settle() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_while_revalidate_single_flight() {
        let loader = TestLoader::default();
        let cache = RegenCache::new(loader.clone());

        let first = cache.get(&KEY).await.unwrap();
        assert_eq!(loader.calls(), 1);
        assert_eq!(first.as_str(), "recently-updated#1");

        // t = 3000s: fresh
        tokio::time::advance(Duration::from_secs(3000)).await;
        let fresh = cache.get(&KEY).await.unwrap();
        assert!(Arc::ptr_eq(&first, &fresh));
        assert_eq!(loader.calls(), 1);

        // t = 3601s: stale, served immediately while one refresh starts
        loader.close_gate();
        tokio::time::advance(Duration::from_secs(601)).await;
        let stale = cache.get(&KEY).await.unwrap();
        assert!(Arc::ptr_eq(&first, &stale));
        settle().await;
        assert_eq!(loader.calls(), 2);
        assert!(cache.is_refreshing(&KEY));

        // A request during the refresh triggers nothing new
        let during = cache.get(&KEY).await.unwrap();
        assert!(Arc::ptr_eq(&first, &during));
        settle().await;
        assert_eq!(loader.calls(), 2);

        loader.open_gate();
        settle().await;
        assert!(!cache.is_refreshing(&KEY));

        let refreshed = cache.get(&KEY).await.unwrap();
        assert_eq!(refreshed.as_str(), "recently-updated#2");
        assert_eq!(loader.calls(), 2);

        assert_eq!(
            cache.stats(),
            CacheStatsSnapshot {
                hits: 2,
                stale_hits: 2,
                misses: 1,
                refreshes: 1,
                refresh_failures: 0,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refresh_keeps_last_good_value() {
        let loader = TestLoader::default();
        let cache = RegenCache::new(loader.clone());

        let first = cache.get(&KEY).await.unwrap();

        loader.set_failing(true);
        tokio::time::advance(Duration::from_secs(3601)).await;
        let stale = cache.get(&KEY).await.unwrap();
        assert!(Arc::ptr_eq(&first, &stale));
        settle().await;

        assert_eq!(loader.calls(), 2);
        assert!(!cache.is_refreshing(&KEY));
        assert_eq!(cache.stats().refresh_failures, 1);

        // No immediate retry: the next attempt waits a full window
        let after_failure = cache.get(&KEY).await.unwrap();
        assert!(Arc::ptr_eq(&first, &after_failure));
        settle().await;
        assert_eq!(loader.calls(), 2);

        loader.set_failing(false);
        tokio::time::advance(Duration::from_secs(3600)).await;
        cache.get(&KEY).await.unwrap();
        settle().await;
        assert_eq!(loader.calls(), 3);

        let refreshed = cache.peek(&KEY).unwrap();
        assert_eq!(refreshed.as_str(), "recently-updated#3");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cold_failure_propagates_and_is_not_cached() {
        let loader = TestLoader::default();
        let cache = RegenCache::new(loader.clone());

        loader.set_failing(true);
        assert!(cache.get(&KEY).await.is_err());
        assert!(cache.is_empty());

        loader.set_failing(false);
        let value = cache.get(&KEY).await.unwrap();
        assert_eq!(value.as_str(), "recently-updated#2");
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_cold_loads_leave_no_locks() {
        const KEYS: [&str; 4] = ["search/maps", "search/chess", "developer/gnome", "developer/kde"];

        let loader = TestLoader::default();
        let cache = RegenCache::new(loader.clone());

        loader.set_failing(true);
        for key in KEYS {
            assert!(cache.get(&key).await.is_err());
        }

        assert_eq!(loader.calls(), KEYS.len());
        assert!(cache.is_empty());
        assert!(cache.inner.cold_locks.is_empty());

        loader.set_failing(false);
        cache.get(&KEYS[0]).await.unwrap();
        assert!(cache.inner.cold_locks.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_cold_requests_share_one_load() {
        let loader = TestLoader::default();
        let cache = RegenCache::new(loader.clone());

        loader.close_gate();
        let opener = async {
            settle().await;
            loader.open_gate();
        };

        let (a, b, ()) = tokio::join!(cache.get(&KEY), cache.get(&KEY), opener);
        let (a, b) = (a.unwrap(), b.unwrap());

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(loader.calls(), 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_refresh_independently() {
        let loader = TestLoader::default();
        let cache = RegenCache::with_window(loader.clone(), Duration::from_secs(60));

        cache.get(&"popular").await.unwrap();
        tokio::time::advance(Duration::from_secs(61)).await;
        cache.get(&KEY).await.unwrap();

        cache.get(&"popular").await.unwrap();
        cache.get(&KEY).await.unwrap();
        settle().await;

        // popular: cold + refresh, recently-updated: cold only
        assert_eq!(loader.calls(), 3);
        assert_eq!(cache.stats().refreshes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_forces_foreground_load() {
        let loader = TestLoader::default();
        let cache = RegenCache::new(loader.clone());

        cache.get(&KEY).await.unwrap();
        cache.invalidate(&KEY);
        assert!(cache.peek(&KEY).is_none());

        let value = cache.get(&KEY).await.unwrap();
        assert_eq!(value.as_str(), "recently-updated#2");
    }
}
