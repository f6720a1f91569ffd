//! Keyed, single-flight cache with time-based expiry.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::hash::hash_string;
use crate::options::CacheOptions;
use crate::settlement::Tracked;

/// A value produced by a fetcher, with an optional content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse<T> {
    pub data: T,
    pub hash: Option<String>,
}

impl<T> FetchResponse<T> {
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self { data, hash: None }
    }

    #[must_use]
    pub fn with_hash(data: T, hash: impl Into<String>) -> Self {
        Self {
            data,
            hash: Some(hash.into()),
        }
    }
}

impl FetchResponse<String> {
    /// Wraps `data` with its SHA-1 digest as the hash.
    #[must_use]
    pub fn hashed(data: String) -> Self {
        let hash = hash_string(&data);
        Self {
            data,
            hash: Some(hash),
        }
    }
}

/// The shared computation stored for a key.
pub type Computation<T, E> = Tracked<FetchResponse<T>, E>;

type FetchFn<T, E> = Box<dyn Fn(&str, Option<Computation<T, E>>) -> Computation<T, E> + Send + Sync>;

/// A cache slot as seen by a caller.
#[derive(Debug)]
pub struct CacheEntry<T, E> {
    pub computation: Computation<T, E>,
    pub expires_at: Instant,
    /// Whether this access was served from an existing, unexpired entry.
    pub cache_hit: bool,
}

impl<T, E> CacheEntry<T, E> {
    #[must_use]
    pub fn is_active_at(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

impl<T, E> Clone for CacheEntry<T, E> {
    fn clone(&self) -> Self {
        Self {
            computation: self.computation.clone(),
            expires_at: self.expires_at,
            cache_hit: self.cache_hit,
        }
    }
}

/// An in-memory cache that stores in-flight computations.
///
/// Concurrent fetches of a key share one computation, so the fetcher runs at
/// most once per key per expiry window. Failed computations are cached like
/// successful ones until they expire.
///
/// The fetcher is called while the cache is locked. It must not fetch from
/// the same cache synchronously; doing so inside the returned future is fine.
pub struct TtlCache<T, E> {
    fetcher: FetchFn<T, E>,
    options: CacheOptions,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry<T, E>>>,
}

impl<T, E> TtlCache<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Creates a cache backed by `fetcher`.
    ///
    /// The fetcher receives the key and the previous computation for that
    /// key, if one expired. Returning that previous computation reuses it.
    #[must_use]
    pub fn new<F, Fut>(fetcher: F, options: CacheOptions) -> Self
    where
        F: Fn(&str, Option<Computation<T, E>>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<FetchResponse<T>, E>> + Send + 'static,
    {
        Self {
            fetcher: Box::new(move |key: &str, previous| Tracked::new(fetcher(key, previous))),
            options,
            clock: Arc::new(SystemClock),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Replaces the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Returns the entry for `key`, starting a new computation if there is
    /// no unexpired one.
    #[must_use]
    pub fn fetch(&self, key: &str) -> CacheEntry<T, E> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        let existing = entries.get(key).cloned();
        let entry = match existing {
            Some(mut entry) if entry.is_active_at(now) => {
                entry.cache_hit = true;
                entry
            }
            expired => {
                debug!(key, refresh = expired.is_some(), "Cache miss");
                let previous = expired.map(|entry| entry.computation);
                let entry = CacheEntry {
                    computation: (self.fetcher)(key, previous),
                    expires_at: now + self.options.max_age(),
                    cache_hit: false,
                };
                entries.insert(key.to_string(), entry.clone());
                entry
            }
        };

        self.evict(&mut entries, now, key);
        entry
    }

    fn evict(&self, entries: &mut HashMap<String, CacheEntry<T, E>>, now: Instant, current: &str) {
        let before = entries.len();
        entries.retain(|_, entry| entry.is_active_at(now));

        if let Some(limit) = self.options.item_limit() {
            if entries.len() > limit {
                let mut by_expiry: Vec<(Instant, bool, String)> = entries
                    .iter()
                    .map(|(key, entry)| (entry.expires_at, key == current, key.clone()))
                    .collect();
                // Soonest expiry first; on ties the key just fetched goes last.
                by_expiry.sort_unstable();
                let excess = entries.len() - limit;
                for (_, _, key) in by_expiry.into_iter().take(excess) {
                    entries.remove(&key);
                }
            }
        }

        let evicted = before - entries.len();
        if evicted > 0 {
            debug!(evicted, remaining = entries.len(), "Cache cleanup");
        }
    }
}

impl<T, E> TtlCache<T, E> {
    #[must_use]
    pub const fn options(&self) -> &CacheOptions {
        &self.options
    }

    /// Number of stored entries, expired ones included until the next fetch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns the stored keys in no particular order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<T, E>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T, E> fmt::Debug for TtlCache<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("options", &self.options)
            .field("clock", &self.clock)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
